//! Authentication plugin configuration.
//!
//! The application authenticates against an Auth0 tenant. The plugin is
//! configured with the tenant domain, the application's client identifier and
//! the authorization parameters sent with every login, of which the redirect
//! URI is the page origin the browser is running on.

use serde::{Deserialize, Serialize};
use user_portal_core::Origin;

use crate::error::ConfigurationError;

/// Tenant host used when no domain is configured.
pub const DEFAULT_DOMAIN: &str = "dev-miyln068b6hrc4ck.us.auth0.com";

/// Application identifier used when no client ID is configured.
pub const DEFAULT_CLIENT_ID: &str = "Mvf2597dHnItZuby1E84LdYuaRDh5bnz";

/// Scopes requested when none are configured.
pub const DEFAULT_SCOPE: &str = "openid profile email";

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.to_string()
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

/// Parameters forwarded to the provider's `/authorize` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationParams {
    /// Where the provider sends the browser back after login.
    /// `None` means "the current page origin", resolved per request.
    #[serde(default)]
    redirect_uri: Option<String>,
    /// Space-separated OAuth2 scopes.
    #[serde(default = "default_scope")]
    scope: String,
    /// API audience to request an access token for.
    #[serde(default)]
    audience: Option<String>,
}

impl Default for AuthorizationParams {
    fn default() -> Self {
        Self {
            redirect_uri: None,
            scope: default_scope(),
            audience: None,
        }
    }
}

impl AuthorizationParams {
    /// Returns the configured redirect URI, if fixed.
    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// Returns the raw scope string.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Returns the requested audience, if any.
    #[must_use]
    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }
}

/// Configuration for the Auth0 authentication plugin.
///
/// Every field has a default, so an empty environment yields the built-in
/// tenant. Overrides come from `AUTH0__DOMAIN`, `AUTH0__CLIENT_ID`,
/// `AUTH0__AUTHORIZATION_PARAMS__SCOPE` and friends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth0Config {
    /// Tenant host, e.g. `example.us.auth0.com`. No scheme, no path.
    #[serde(default = "default_domain")]
    domain: String,
    /// The application's client identifier.
    #[serde(default = "default_client_id")]
    client_id: String,
    /// Parameters sent with each authorization request.
    #[serde(default)]
    authorization_params: AuthorizationParams,
}

impl Default for Auth0Config {
    fn default() -> Self {
        Self::new(default_domain(), default_client_id())
    }
}

impl Auth0Config {
    /// Creates a configuration with default authorization parameters.
    #[must_use]
    pub fn new(domain: String, client_id: String) -> Self {
        Self {
            domain,
            client_id,
            authorization_params: AuthorizationParams::default(),
        }
    }

    /// Creates a configuration builder for more customization.
    #[must_use]
    pub fn builder(domain: String, client_id: String) -> Auth0ConfigBuilder {
        Auth0ConfigBuilder::new(domain, client_id)
    }

    /// Returns this configuration with the redirect URI set to `origin`.
    #[must_use]
    pub fn for_origin(mut self, origin: &Origin) -> Self {
        self.authorization_params.redirect_uri = Some(origin.to_string());
        self
    }

    /// Returns the tenant domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the client identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the authorization parameters.
    #[must_use]
    pub fn authorization_params(&self) -> &AuthorizationParams {
        &self.authorization_params
    }

    /// Returns the configured redirect URI, if fixed.
    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.authorization_params.redirect_uri()
    }

    /// Returns the scopes to request.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.authorization_params.scope.split_whitespace().collect()
    }

    /// Returns the OIDC issuer URL. Auth0 issuers carry a trailing slash.
    #[must_use]
    pub fn issuer_url(&self) -> String {
        format!("https://{}/", self.domain)
    }

    /// Returns the tenant logout URL that sends the browser back to `return_to`.
    #[must_use]
    pub fn logout_url(&self, return_to: &Origin) -> String {
        format!(
            "https://{}/v2/logout?client_id={}&returnTo={}",
            self.domain, self.client_id, return_to
        )
    }

    /// Checks that the configuration can be used to build provider URLs.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let domain = self.domain.as_str();
        if domain.is_empty() {
            return Err(ConfigurationError::InvalidDomain {
                domain: String::new(),
                reason: "domain is empty".to_string(),
            });
        }
        if domain.contains("://") || domain.contains('/') {
            return Err(ConfigurationError::InvalidDomain {
                domain: domain.to_string(),
                reason: "expected a bare host without scheme or path".to_string(),
            });
        }
        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(ConfigurationError::InvalidDomain {
                domain: domain.to_string(),
                reason: "host contains invalid characters".to_string(),
            });
        }

        if self.client_id.trim().is_empty() {
            return Err(ConfigurationError::MissingClientId);
        }
        if !self.client_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigurationError::InvalidClientId {
                client_id: self.client_id.clone(),
            });
        }

        if !self.scopes().contains(&"openid") {
            return Err(ConfigurationError::MissingOpenIdScope {
                scope: self.authorization_params.scope.clone(),
            });
        }

        if let Some(uri) = self.redirect_uri() {
            Origin::parse(uri).map_err(|e| ConfigurationError::InvalidRedirectUri {
                uri: uri.to_string(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }
}

/// Builder for `Auth0Config`.
#[derive(Debug)]
pub struct Auth0ConfigBuilder {
    domain: String,
    client_id: String,
    scopes: Vec<String>,
    audience: Option<String>,
}

impl Auth0ConfigBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(domain: String, client_id: String) -> Self {
        Self {
            domain,
            client_id,
            scopes: DEFAULT_SCOPE.split_whitespace().map(str::to_string).collect(),
            audience: None,
        }
    }

    /// Replaces the scopes to request.
    #[must_use]
    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Adds a scope to the list of scopes to request.
    #[must_use]
    pub fn add_scope(mut self, scope: String) -> Self {
        if !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
        self
    }

    /// Sets the API audience.
    #[must_use]
    pub fn audience(mut self, audience: String) -> Self {
        self.audience = Some(audience);
        self
    }

    /// Builds the `Auth0Config`.
    #[must_use]
    pub fn build(self) -> Auth0Config {
        Auth0Config {
            domain: self.domain,
            client_id: self.client_id,
            authorization_params: AuthorizationParams {
                redirect_uri: None,
                scope: self.scopes.join(" "),
                audience: self.audience,
            },
        }
    }
}
