//! user-portal single-page application and its server.
//!
//! The library is compiled twice: as WebAssembly for the browser (`csr`),
//! where [`start`] bootstraps the application into `#app`, and natively for
//! the axum server (`ssr`), which hosts the shell, the server functions and
//! the login round-trip.

#![allow(non_snake_case)]

pub mod app;
pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod pages;
pub mod routes;
pub mod types;
pub mod user;

#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod server;
#[cfg(feature = "ssr")]
pub mod server_helpers;

#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = bootstrap::mount_app() {
        web_sys::console::error_1(&format!("user-portal failed to start: {e}").into());
    }
}
