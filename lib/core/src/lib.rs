//! Core domain types and utilities for the user-portal application.
//!
//! This crate provides the foundational types shared by the identity layer
//! and the web application: the rootcause-backed `Result` alias,
//! strongly-typed identifiers, and the validated page [`Origin`].

pub mod error;
pub mod id;
pub mod origin;

pub use error::Result;
pub use id::{ParseIdError, SessionId};
pub use origin::{Origin, OriginError, Scheme};
