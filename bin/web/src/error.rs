//! Domain error types for server operations.
//!
//! Server functions log the detailed variant and hand the browser only the
//! user-safe message from `into_server_error`.

use leptos::server_fn::error::ServerFnError;
use std::fmt;

use crate::types::FieldError;

/// Session-related errors.
#[derive(Debug)]
pub enum SessionError {
    /// User is not authenticated (no session cookie).
    NotAuthenticated,
    /// Session was not found in the store.
    NotFound { session_id: String },
    /// Session has expired.
    Expired { session_id: String },
    /// Session store failure.
    Store { details: String },
    /// Server state was not available to the server function.
    Unavailable,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::NotFound { session_id } => {
                write!(f, "session '{}' not found", session_id)
            }
            Self::Expired { session_id } => {
                write!(f, "session '{}' has expired", session_id)
            }
            Self::Store { details } => write!(f, "session store error: {}", details),
            Self::Unavailable => write!(f, "server state unavailable"),
        }
    }
}

impl std::error::Error for SessionError {}

impl SessionError {
    /// Convert to a user-safe ServerFnError.
    pub fn into_server_error(self) -> ServerFnError {
        match &self {
            SessionError::NotAuthenticated => ServerFnError::new("Not authenticated"),
            SessionError::NotFound { .. } => ServerFnError::new("Session not found"),
            SessionError::Expired { .. } => ServerFnError::new("Session expired"),
            SessionError::Store { .. } => ServerFnError::new("Session store error"),
            SessionError::Unavailable => ServerFnError::new("Service unavailable"),
        }
    }
}

/// A submitted form failed validation.
#[derive(Debug)]
pub struct FormError {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "invalid form: {}", details)
    }
}

impl std::error::Error for FormError {}

impl FormError {
    /// Convert to a ServerFnError. Field messages are safe to show.
    pub fn into_server_error(self) -> ServerFnError {
        ServerFnError::new(self.to_string())
    }
}
