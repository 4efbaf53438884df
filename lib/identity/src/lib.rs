//! Identity-provider configuration and sessions for user-portal.
//!
//! This crate provides:
//! - Authentication plugin configuration (`Auth0Config`, `AuthorizationParams`)
//! - Identity claims extracted from the provider's ID token (`IdentityClaims`)
//! - Session management (`Session`, `UserProfile`)
//! - Session storage (`SessionStore`, `InMemorySessionStore`, behind the
//!   `server` feature)
//!
//! # Example
//!
//! ```
//! use user_portal_core::Origin;
//! use user_portal_identity::Auth0Config;
//!
//! let origin = Origin::parse("https://portal.example.com").unwrap();
//! let config = Auth0Config::default().for_origin(&origin);
//!
//! assert_eq!(config.redirect_uri(), Some("https://portal.example.com"));
//! assert_eq!(
//!     config.issuer_url(),
//!     "https://dev-miyln068b6hrc4ck.us.auth0.com/"
//! );
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod session;
#[cfg(feature = "server")]
pub mod store;

pub use claims::IdentityClaims;
pub use config::{Auth0Config, Auth0ConfigBuilder, AuthorizationParams};
pub use error::{AuthenticationError, ConfigurationError, SessionStoreError};
pub use session::{Session, UserProfile};
#[cfg(feature = "server")]
pub use store::{InMemorySessionStore, SessionStore};
