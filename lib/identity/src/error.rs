//! Error types for the identity crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `ConfigurationError`: unusable plugin configuration
//! - `AuthenticationError`: failures verifying the user's identity
//! - `SessionStoreError`: session lookup and bookkeeping failures

use std::fmt;

/// Errors from validating the authentication plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The tenant domain is not a bare host.
    InvalidDomain { domain: String, reason: String },
    /// No client identifier was configured.
    MissingClientId,
    /// The client identifier contains characters a provider never issues.
    InvalidClientId { client_id: String },
    /// The requested scopes do not include `openid`.
    MissingOpenIdScope { scope: String },
    /// A fixed redirect URI is not an origin.
    InvalidRedirectUri { uri: String, reason: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { domain, reason } => {
                write!(f, "invalid identity provider domain '{domain}': {reason}")
            }
            Self::MissingClientId => write!(f, "client ID is not configured"),
            Self::InvalidClientId { client_id } => {
                write!(f, "invalid client ID '{client_id}'")
            }
            Self::MissingOpenIdScope { scope } => {
                write!(f, "scope '{scope}' does not request 'openid'")
            }
            Self::InvalidRedirectUri { uri, reason } => {
                write!(f, "invalid redirect URI '{uri}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Errors from authentication operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The provider rejected or failed the login.
    ProviderError { error: String, description: String },
    /// The `state` returned by the provider does not match the one sent.
    CsrfMismatch,
    /// The callback arrived without the state saved at login.
    MissingAuthState,
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderError { error, description } => {
                write!(f, "identity provider returned '{error}': {description}")
            }
            Self::CsrfMismatch => write!(f, "authorization state mismatch"),
            Self::MissingAuthState => write!(f, "missing authorization state"),
        }
    }
}

impl std::error::Error for AuthenticationError {}

/// Errors from session storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    /// A session with this ID is already stored.
    AlreadyExists { session_id: String },
    /// No session with this ID is stored.
    NotFound { session_id: String },
    /// The session exists but is past its expiry.
    Expired { session_id: String },
    /// The store holds its maximum number of live sessions.
    CapacityExceeded { capacity: usize },
}

impl fmt::Display for SessionStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists { session_id } => {
                write!(f, "session '{session_id}' already exists")
            }
            Self::NotFound { session_id } => write!(f, "session '{session_id}' not found"),
            Self::Expired { session_id } => write!(f, "session '{session_id}' has expired"),
            Self::CapacityExceeded { capacity } => {
                write!(f, "session store is full ({capacity} sessions)")
            }
        }
    }
}

impl std::error::Error for SessionStoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_display() {
        let err = ConfigurationError::InvalidDomain {
            domain: "https://x".to_string(),
            reason: "expected a bare host".to_string(),
        };
        assert!(err.to_string().contains("https://x"));
        assert!(err.to_string().contains("bare host"));
    }

    #[test]
    fn provider_error_display() {
        let err = AuthenticationError::ProviderError {
            error: "access_denied".to_string(),
            description: "user cancelled".to_string(),
        };
        assert!(err.to_string().contains("access_denied"));
        assert!(err.to_string().contains("user cancelled"));
    }

    #[test]
    fn login_state_errors_display() {
        assert_eq!(
            AuthenticationError::CsrfMismatch.to_string(),
            "authorization state mismatch"
        );
        assert_eq!(
            AuthenticationError::MissingAuthState.to_string(),
            "missing authorization state"
        );
    }

    #[test]
    fn session_store_error_display() {
        let err = SessionStoreError::CapacityExceeded { capacity: 3 };
        assert!(err.to_string().contains("3 sessions"));

        let err = SessionStoreError::NotFound {
            session_id: "sess_1".to_string(),
        };
        assert!(err.to_string().contains("sess_1"));
    }
}
