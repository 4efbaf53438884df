//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables.
//!
//! See [`Auth0Config`](user_portal_identity::Auth0Config) for the
//! authentication plugin configuration. Every field has a default, so the
//! server starts against the built-in tenant with no environment at all.

use serde::Deserialize;
use std::fmt;
use user_portal_core::{Origin, OriginError};
use user_portal_identity::{Auth0Config, ConfigurationError};

/// Longest session lifetime the server accepts, one week.
pub const MAX_SESSION_MINUTES: i64 = 7 * 24 * 60;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Authentication plugin configuration (`AUTH0__DOMAIN`, `AUTH0__CLIENT_ID`, ...).
    #[serde(default)]
    pub auth0: Auth0Config,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// Comma-separated origins, besides the request's own, that logins may
    /// return to.
    #[serde(default)]
    pub allowed_origins: String,
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session duration in minutes.
    #[serde(default = "default_session_duration_minutes")]
    pub duration_minutes: i64,

    /// Interval between session cleanup runs, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Set to false for local HTTP development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,

    /// Upper bound on concurrently held sessions.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_session_duration_minutes() -> i64 {
    60
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_secure_cookies() -> bool {
    true
}

fn default_max_sessions() -> usize {
    10_000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_session_duration_minutes(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            secure_cookies: default_secure_cookies(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl SessionConfig {
    fn validate(&self) -> Result<(), ServerConfigError> {
        if !(1..=MAX_SESSION_MINUTES).contains(&self.duration_minutes) {
            return Err(ServerConfigError::InvalidSetting {
                key: "session.duration_minutes",
                reason: format!(
                    "{} is outside 1..={MAX_SESSION_MINUTES}",
                    self.duration_minutes
                ),
            });
        }
        if self.cleanup_interval_seconds == 0 {
            return Err(ServerConfigError::InvalidSetting {
                key: "session.cleanup_interval_seconds",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_sessions == 0 {
            return Err(ServerConfigError::InvalidSetting {
                key: "session.max_sessions",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// A loaded configuration the server cannot run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerConfigError {
    /// A setting is out of range or not supported.
    InvalidSetting { key: &'static str, reason: String },
    /// The authentication plugin configuration is invalid.
    Auth0(ConfigurationError),
}

impl fmt::Display for ServerConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { key, reason } => write!(f, "invalid {key}: {reason}"),
            Self::Auth0(e) => write!(f, "invalid auth0 configuration: {e}"),
        }
    }
}

impl std::error::Error for ServerConfigError {}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is present but malformed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(env: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(env.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Checks settings that load but cannot run.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        self.auth0.validate().map_err(ServerConfigError::Auth0)?;
        if let Some(uri) = self.auth0.redirect_uri() {
            return Err(ServerConfigError::InvalidSetting {
                key: "auth0.authorization_params.redirect_uri",
                reason: format!(
                    "{uri} would be ignored; the redirect URI is always the page origin"
                ),
            });
        }
        self.session.validate()
    }

    /// Parses [`allowed_origins`](Self::allowed_origins) into origins.
    pub fn allowed_origins(&self) -> Result<Vec<Origin>, OriginError> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Origin::parse)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use user_portal_identity::config::{DEFAULT_CLIENT_ID, DEFAULT_DOMAIN};

    fn load(vars: &[(&str, &str)]) -> ServerConfig {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_environment(config::Environment::default().source(Some(source)))
            .expect("config loads")
    }

    #[test]
    fn session_config_has_correct_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.duration_minutes, 60);
        assert_eq!(config.cleanup_interval_seconds, 300);
        assert!(config.secure_cookies);
        assert_eq!(config.max_sessions, 10_000);
    }

    #[test]
    fn empty_environment_uses_builtin_tenant() {
        let config = load(&[]);
        assert_eq!(config.auth0.domain(), DEFAULT_DOMAIN);
        assert_eq!(config.auth0.client_id(), DEFAULT_CLIENT_ID);
        assert!(config.allowed_origins().expect("origins").is_empty());
    }

    #[test]
    fn environment_overrides_nested_values() {
        let config = load(&[
            ("AUTH0__DOMAIN", "other.eu.auth0.com"),
            ("AUTH0__CLIENT_ID", "xyz789"),
            ("SESSION__DURATION_MINUTES", "15"),
            ("SESSION__SECURE_COOKIES", "false"),
        ]);
        assert_eq!(config.auth0.domain(), "other.eu.auth0.com");
        assert_eq!(config.auth0.client_id(), "xyz789");
        assert_eq!(config.session.duration_minutes, 15);
        assert!(!config.session.secure_cookies);
        assert_eq!(config.session.cleanup_interval_seconds, 300);
    }

    #[test]
    fn allowed_origins_are_parsed() {
        let config = load(&[(
            "ALLOWED_ORIGINS",
            "https://portal.example.com, http://localhost:8080",
        )]);
        let origins = config.allowed_origins().expect("origins");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0].to_string(), "https://portal.example.com");
        assert_eq!(origins[1].to_string(), "http://localhost:8080");
    }

    #[test]
    fn malformed_allowed_origin_is_an_error() {
        let config = load(&[("ALLOWED_ORIGINS", "https://portal.example.com/path")]);
        assert!(config.allowed_origins().is_err());
    }

    fn invalid_key(vars: &[(&str, &str)]) -> &'static str {
        match load(vars).validate() {
            Err(ServerConfigError::InvalidSetting { key, .. }) => key,
            other => panic!("expected an invalid setting, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(load(&[]).validate(), Ok(()));
    }

    #[test]
    fn zero_cleanup_interval_is_rejected() {
        assert_eq!(
            invalid_key(&[("SESSION__CLEANUP_INTERVAL_SECONDS", "0")]),
            "session.cleanup_interval_seconds"
        );
    }

    #[test]
    fn session_duration_must_be_positive_and_bounded() {
        for minutes in ["-5", "0", "10081", "9223372036854775807"] {
            assert_eq!(
                invalid_key(&[("SESSION__DURATION_MINUTES", minutes)]),
                "session.duration_minutes",
                "{minutes}"
            );
        }
        let config = load(&[("SESSION__DURATION_MINUTES", "10080")]);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_max_sessions_is_rejected() {
        assert_eq!(
            invalid_key(&[("SESSION__MAX_SESSIONS", "0")]),
            "session.max_sessions"
        );
    }

    #[test]
    fn fixed_redirect_uri_is_rejected() {
        assert_eq!(
            invalid_key(&[(
                "AUTH0__AUTHORIZATION_PARAMS__REDIRECT_URI",
                "https://portal.example.com"
            )]),
            "auth0.authorization_params.redirect_uri"
        );
    }

    #[test]
    fn invalid_auth0_settings_are_reported() {
        let config = load(&[("AUTH0__DOMAIN", "https://tenant.auth0.com")]);
        assert!(matches!(
            config.validate(),
            Err(ServerConfigError::Auth0(ConfigurationError::InvalidDomain { .. }))
        ));
    }
}
