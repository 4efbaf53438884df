//! Browser side of the authentication plugin.
//!
//! The plugin is installed at bootstrap as a Leptos context holding the
//! configuration resolved from the page origin. Views use it to build the
//! login and logout links; the provider round-trip itself runs on the server.

use leptos::prelude::*;
use user_portal_identity::Auth0Config;

/// Server endpoint that starts the provider login.
pub const LOGIN_PATH: &str = "/auth/login";

/// Server endpoint that ends the session.
pub const LOGOUT_PATH: &str = "/auth/logout";

/// The installed authentication plugin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthClient {
    config: Auth0Config,
}

impl AuthClient {
    /// Creates the plugin from its configuration.
    #[must_use]
    pub fn new(config: Auth0Config) -> Self {
        Self { config }
    }

    /// Returns the plugin configuration.
    #[must_use]
    pub fn config(&self) -> &Auth0Config {
        &self.config
    }

    /// Returns the link that starts a login returning to the page origin.
    #[must_use]
    pub fn login_href(&self) -> String {
        match self.config.redirect_uri() {
            Some(uri) => format!("{LOGIN_PATH}?redirect_uri={uri}"),
            None => LOGIN_PATH.to_string(),
        }
    }

    /// Returns the logout link.
    #[must_use]
    pub fn logout_href(&self) -> &'static str {
        LOGOUT_PATH
    }
}

/// Installs the plugin for every component below the caller.
pub fn provide_auth_client(config: Auth0Config) {
    provide_context(AuthClient::new(config));
}

/// Returns the installed plugin, or one with the default configuration.
#[must_use]
pub fn use_auth_client() -> AuthClient {
    use_context::<AuthClient>().unwrap_or_else(|| AuthClient::new(Auth0Config::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use user_portal_core::Origin;

    #[test]
    fn login_href_carries_page_origin() {
        let origin = Origin::parse("http://localhost:3000").expect("origin");
        let client = AuthClient::new(Auth0Config::default().for_origin(&origin));

        assert_eq!(
            client.login_href(),
            "/auth/login?redirect_uri=http://localhost:3000"
        );
        assert_eq!(client.logout_href(), "/auth/logout");
    }

    #[test]
    fn login_href_without_origin_lets_server_decide() {
        let client = AuthClient::new(Auth0Config::default());
        assert_eq!(client.login_href(), "/auth/login");
    }
}
