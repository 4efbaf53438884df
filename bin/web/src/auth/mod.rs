//! Authentication plugin.
//!
//! This module provides:
//! - The browser-side plugin context and its login/logout links (`client`)
//! - Redirect origin resolution shared by both sides (`redirect`)
//! - OIDC authentication against the Auth0 tenant (`oidc`, server only)
//! - Login, redirect-callback and logout handlers (`routes`, server only)
//!
//! The provider sends the browser back to the page origin itself, not to a
//! dedicated callback path. The callback is therefore handled by a middleware
//! in front of every route that recognises the `code`/`state` pair.

pub mod client;
#[cfg(feature = "ssr")]
pub mod oidc;
pub mod redirect;
#[cfg(feature = "ssr")]
pub mod routes;

#[cfg(feature = "ssr")]
pub use oidc::OidcClient;
#[cfg(feature = "ssr")]
pub use routes::{handle_redirect_callback, login, logout};

#[cfg(feature = "ssr")]
use crate::config::SessionConfig;
#[cfg(feature = "ssr")]
use std::sync::Arc;
#[cfg(feature = "ssr")]
use user_portal_core::Origin;
#[cfg(feature = "ssr")]
use user_portal_identity::SessionStore;

/// Shared application state.
#[cfg(feature = "ssr")]
pub struct AppState {
    /// Session storage.
    pub sessions: Arc<dyn SessionStore>,
    /// OIDC client for authentication.
    pub oidc_client: OidcClient,
    /// Session configuration.
    pub session_config: SessionConfig,
    /// Origins other than the request's own that may be login redirect targets.
    pub allowed_origins: Vec<Origin>,
}

#[cfg(feature = "ssr")]
impl AppState {
    /// Creates a new application state.
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        oidc_client: OidcClient,
        session_config: SessionConfig,
        allowed_origins: Vec<Origin>,
    ) -> Self {
        Self {
            sessions,
            oidc_client,
            session_config,
            allowed_origins,
        }
    }
}
