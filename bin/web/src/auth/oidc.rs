//! OIDC client implementation using the openidconnect crate.
//!
//! Auth0 application clients for single-page apps are public clients: there
//! is no client secret, and the authorization code is bound to the login by
//! a PKCE S256 challenge instead.

use openidconnect::core::{
    CoreAuthenticationFlow, CoreClient, CoreIdTokenClaims, CoreProviderMetadata,
};
use openidconnect::{
    AuthorizationCode, ClientId, CsrfToken, IssuerUrl, Nonce, OAuth2TokenResponse,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse,
};
use rootcause::prelude::Report;
use std::fmt;
use user_portal_core::Origin;
use user_portal_identity::{Auth0Config, IdentityClaims};

/// OIDC client for authenticating users against the configured tenant.
pub struct OidcClient {
    provider_metadata: CoreProviderMetadata,
    client_id: ClientId,
    http_client: reqwest::Client,
    config: Auth0Config,
}

/// Data needed to complete the provider redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub csrf_token: String,
    pub pkce_verifier: String,
    pub nonce: String,
    pub redirect_uri: String,
}

impl AuthState {
    /// Encodes the state for a cookie.
    ///
    /// The three secrets are base64url and never contain `.`, so they are
    /// joined with dots and the origin takes the remainder.
    #[must_use]
    pub fn to_cookie_value(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.csrf_token, self.pkce_verifier, self.nonce, self.redirect_uri
        )
    }

    /// Decodes a value produced by [`to_cookie_value`](Self::to_cookie_value).
    #[must_use]
    pub fn from_cookie_value(value: &str) -> Option<Self> {
        let mut parts = value.splitn(4, '.');
        let csrf_token = parts.next().filter(|s| !s.is_empty())?;
        let pkce_verifier = parts.next().filter(|s| !s.is_empty())?;
        let nonce = parts.next().filter(|s| !s.is_empty())?;
        let redirect_uri = parts.next().filter(|s| !s.is_empty())?;

        Some(Self {
            csrf_token: csrf_token.to_string(),
            pkce_verifier: pkce_verifier.to_string(),
            nonce: nonce.to_string(),
            redirect_uri: redirect_uri.to_string(),
        })
    }
}

/// Result of a successful token exchange.
pub struct TokenResult {
    pub claims: IdentityClaims,
    pub access_token: String,
}

impl OidcClient {
    /// Creates a new OIDC client by discovering the provider metadata.
    pub async fn discover(config: Auth0Config) -> Result<Self, Report<OidcError>> {
        config
            .validate()
            .map_err(|e| OidcError::Configuration(e.to_string()))?;

        let issuer_url = IssuerUrl::new(config.issuer_url())
            .map_err(|e| OidcError::Configuration(format!("invalid issuer URL: {}", e)))?;

        let http_client = http_client()?;

        let provider_metadata = CoreProviderMetadata::discover_async(issuer_url, &http_client)
            .await
            .map_err(|e| OidcError::Discovery(format!("failed to discover provider: {}", e)))?;

        Ok(Self::from_metadata(config, provider_metadata, http_client))
    }

    /// Creates a client from already-known provider metadata.
    #[must_use]
    pub fn from_metadata(
        config: Auth0Config,
        provider_metadata: CoreProviderMetadata,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            provider_metadata,
            client_id: ClientId::new(config.client_id().to_string()),
            http_client,
            config,
        }
    }

    /// Generates the authorization URL for redirecting the user.
    ///
    /// The provider will send the browser back to `redirect`.
    pub fn authorization_url(
        &self,
        redirect: &Origin,
    ) -> Result<(String, AuthState), Report<OidcError>> {
        let redirect_url = RedirectUrl::new(redirect.to_string())
            .map_err(|e| OidcError::Configuration(format!("invalid redirect URI: {}", e)))?;

        let client = CoreClient::from_provider_metadata(
            self.provider_metadata.clone(),
            self.client_id.clone(),
            None,
        )
        .set_redirect_uri(redirect_url);

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .set_pkce_challenge(pkce_challenge);

        for scope in self.config.scopes() {
            auth_request = auth_request.add_scope(Scope::new(scope.to_string()));
        }
        if let Some(audience) = self.config.authorization_params().audience() {
            auth_request = auth_request.add_extra_param("audience", audience.to_string());
        }

        let (auth_url, csrf_token, nonce) = auth_request.url();

        let state = AuthState {
            csrf_token: csrf_token.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
            nonce: nonce.secret().clone(),
            redirect_uri: redirect.to_string(),
        };

        Ok((auth_url.to_string(), state))
    }

    /// Exchanges the authorization code for tokens and extracts claims.
    pub async fn exchange_code(
        &self,
        code: &str,
        state: &AuthState,
    ) -> Result<TokenResult, Report<OidcError>> {
        let redirect_url = RedirectUrl::new(state.redirect_uri.clone())
            .map_err(|e| OidcError::TokenExchange(format!("invalid redirect URI: {}", e)))?;

        let client = CoreClient::from_provider_metadata(
            self.provider_metadata.clone(),
            self.client_id.clone(),
            None,
        )
        .set_redirect_uri(redirect_url);

        let token_request = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| OidcError::TokenExchange(format!("token endpoint error: {}", e)))?;

        let token_response = token_request
            .set_pkce_verifier(PkceCodeVerifier::new(state.pkce_verifier.clone()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| OidcError::TokenExchange(format!("token exchange failed: {}", e)))?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| OidcError::TokenExchange("no ID token in response".to_string()))?;

        let nonce = Nonce::new(state.nonce.clone());
        let claims = id_token
            .claims(&client.id_token_verifier(), &nonce)
            .map_err(|e| {
                OidcError::TokenValidation(format!("ID token validation failed: {}", e))
            })?;

        Ok(TokenResult {
            claims: identity_from_claims(claims),
            access_token: token_response.access_token().secret().clone(),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Auth0Config {
        &self.config
    }
}

/// Maps verified ID token claims to the identity kept in the session.
///
/// The display name falls back from `name` to `preferred_username` to `nickname`.
fn identity_from_claims(claims: &CoreIdTokenClaims) -> IdentityClaims {
    let name = claims
        .name()
        .and_then(|n| n.get(None))
        .map(|n| n.as_str().to_string())
        .or_else(|| claims.preferred_username().map(|u| u.as_str().to_string()))
        .or_else(|| {
            claims
                .nickname()
                .and_then(|n| n.get(None))
                .map(|n| n.as_str().to_string())
        });

    IdentityClaims::new(claims.subject().to_string(), claims.issuer().to_string())
        .with_email(claims.email().map(|e| e.as_str().to_string()))
        .with_name(name)
        .with_picture(
            claims
                .picture()
                .and_then(|p| p.get(None))
                .map(|p| p.as_str().to_string()),
        )
}

fn http_client() -> Result<reqwest::Client, OidcError> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| OidcError::Configuration(format!("failed to create HTTP client: {}", e)))
}

/// OIDC-related errors.
#[derive(Debug)]
pub enum OidcError {
    /// Configuration error (invalid URLs, etc.)
    Configuration(String),
    /// Failed to discover provider metadata.
    Discovery(String),
    /// Token exchange failed.
    TokenExchange(String),
    /// Token validation failed.
    TokenValidation(String),
}

impl fmt::Display for OidcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "OIDC configuration error: {}", msg),
            Self::Discovery(msg) => write!(f, "OIDC discovery error: {}", msg),
            Self::TokenExchange(msg) => write!(f, "OIDC token exchange error: {}", msg),
            Self::TokenValidation(msg) => write!(f, "OIDC token validation error: {}", msg),
        }
    }
}

impl std::error::Error for OidcError {}

/// Provider metadata for tests, shaped like an Auth0 tenant's discovery document.
#[cfg(test)]
pub(crate) fn test_client(config: Auth0Config) -> OidcClient {
    use openidconnect::core::{
        CoreJwsSigningAlgorithm, CoreResponseType, CoreSubjectIdentifierType,
    };
    use openidconnect::{
        AuthUrl, EmptyAdditionalProviderMetadata, JsonWebKeySetUrl, ResponseTypes, TokenUrl,
    };

    let base = config.issuer_url();
    let metadata = CoreProviderMetadata::new(
        IssuerUrl::new(base.clone()).expect("issuer"),
        AuthUrl::new(format!("{base}authorize")).expect("auth url"),
        JsonWebKeySetUrl::new(format!("{base}.well-known/jwks.json")).expect("jwks url"),
        vec![ResponseTypes::new(vec![CoreResponseType::Code])],
        vec![CoreSubjectIdentifierType::Public],
        vec![CoreJwsSigningAlgorithm::RsaSsaPkcs1V15Sha256],
        EmptyAdditionalProviderMetadata {},
    )
    .set_token_endpoint(Some(
        TokenUrl::new(format!("{base}oauth/token")).expect("token url"),
    ));

    OidcClient::from_metadata(config, metadata, http_client().expect("http client"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use openidconnect::core::CoreGenderClaim;
    use openidconnect::{
        Audience, EmptyAdditionalClaims, EndUserEmail, EndUserName, EndUserPictureUrl,
        EndUserUsername, LocalizedClaim, StandardClaims, SubjectIdentifier,
    };

    fn origin(s: &str) -> Origin {
        Origin::parse(s).expect("origin")
    }

    #[test]
    fn authorization_url_targets_tenant_with_pkce() {
        let config = Auth0Config::builder("tenant.auth0.com".to_string(), "abc123".to_string())
            .audience("https://api.example.com".to_string())
            .build();
        let client = test_client(config);

        let (url, state) = client
            .authorization_url(&origin("http://localhost:3000"))
            .expect("url");

        assert!(url.starts_with("https://tenant.auth0.com/authorize?"));
        assert!(url.contains("client_id=abc123"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000"));
        assert!(url.contains("audience=https%3A%2F%2Fapi.example.com"));
        assert!(url.contains(&format!("state={}", state.csrf_token)));
        assert_eq!(state.redirect_uri, "http://localhost:3000");
    }

    #[test]
    fn each_login_gets_fresh_secrets() {
        let client = test_client(Auth0Config::default());
        let page = origin("https://portal.example.com");

        let (_, a) = client.authorization_url(&page).expect("url");
        let (_, b) = client.authorization_url(&page).expect("url");

        assert_ne!(a.csrf_token, b.csrf_token);
        assert_ne!(a.pkce_verifier, b.pkce_verifier);
        assert_ne!(a.nonce, b.nonce);
    }

    #[test]
    fn auth_state_cookie_value_roundtrips() {
        let client = test_client(Auth0Config::default());
        let (_, state) = client
            .authorization_url(&origin("https://portal.example.com:8443"))
            .expect("url");

        let decoded = AuthState::from_cookie_value(&state.to_cookie_value()).expect("decode");
        assert_eq!(decoded, state);
    }

    fn id_token_claims(standard: StandardClaims<CoreGenderClaim>) -> CoreIdTokenClaims {
        let now = chrono::Utc::now();
        CoreIdTokenClaims::new(
            IssuerUrl::new("https://tenant.auth0.com/".to_string()).expect("issuer"),
            vec![Audience::new("abc123".to_string())],
            now + chrono::Duration::minutes(5),
            now,
            standard,
            EmptyAdditionalClaims {},
        )
    }

    #[test]
    fn identity_carries_profile_claims() {
        let mut name = LocalizedClaim::new();
        name.insert(None, EndUserName::new("Grace Hopper".to_string()));
        let mut picture = LocalizedClaim::new();
        picture.insert(
            None,
            EndUserPictureUrl::new("https://cdn.example.com/grace.png".to_string()),
        );
        let claims = id_token_claims(
            StandardClaims::new(SubjectIdentifier::new("auth0|42".to_string()))
                .set_name(Some(name))
                .set_picture(Some(picture))
                .set_email(Some(EndUserEmail::new("grace@example.com".to_string()))),
        );

        let identity = identity_from_claims(&claims);
        assert_eq!(identity.subject, "auth0|42");
        assert_eq!(identity.issuer, "https://tenant.auth0.com/");
        assert_eq!(identity.name.as_deref(), Some("Grace Hopper"));
        assert_eq!(identity.email.as_deref(), Some("grace@example.com"));
        assert_eq!(
            identity.picture.as_deref(),
            Some("https://cdn.example.com/grace.png")
        );
    }

    #[test]
    fn identity_name_falls_back_to_username() {
        let claims = id_token_claims(
            StandardClaims::new(SubjectIdentifier::new("auth0|7".to_string()))
                .set_preferred_username(Some(EndUserUsername::new("ghopper".to_string()))),
        );

        let identity = identity_from_claims(&claims);
        assert_eq!(identity.name.as_deref(), Some("ghopper"));
        assert_eq!(identity.picture, None);
        assert_eq!(identity.email, None);
    }

    #[test]
    fn malformed_cookie_value_is_rejected() {
        assert!(AuthState::from_cookie_value("").is_none());
        assert!(AuthState::from_cookie_value("a.b.c").is_none());
        assert!(AuthState::from_cookie_value("a..c.http://x").is_none());
    }
}
