//! Authentication routes for login, the provider redirect, and logout.
//!
//! The provider redirects back to the page origin, so there is no callback
//! route. [`handle_redirect_callback`] runs in front of every route instead
//! and only acts when the request carries the provider's parameters and the
//! auth-state cookie set by [`login`].

use axum::{
    extract::{Query, Request, State},
    http::{HeaderMap, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration as ChronoDuration;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use time::Duration as TimeDuration;
use user_portal_core::{Origin, Scheme, SessionId};
use user_portal_identity::{AuthenticationError, Session};

use super::{
    AppState,
    oidc::AuthState,
    redirect::{request_origin, resolve_redirect_origin},
};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Auth state cookie name (for CSRF protection during the provider redirect).
pub const AUTH_STATE_COOKIE: &str = "auth_state";

/// Query parameters for the login route.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    redirect_uri: Option<String>,
}

/// Query parameters the provider appends when redirecting back.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// What a request's query says about the provider redirect.
#[derive(Debug, PartialEq, Eq)]
enum Callback {
    Complete { code: String, state: String },
    Failed(AuthenticationError),
    NotACallback,
}

impl CallbackParams {
    fn classify(self) -> Callback {
        if let Some(error) = self.error {
            return Callback::Failed(AuthenticationError::ProviderError {
                error,
                description: self.error_description.unwrap_or_default(),
            });
        }
        match (self.code, self.state) {
            (Some(code), Some(state)) if !code.is_empty() && !state.is_empty() => {
                Callback::Complete { code, state }
            }
            _ => Callback::NotACallback,
        }
    }
}

/// Initiates the login flow by redirecting to the identity provider.
///
/// The provider will return the browser to `redirect_uri` when that is an
/// acceptable origin, otherwise to the origin the request was sent to.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthError> {
    let own_origin = origin_of(&headers, &state);
    let redirect = resolve_redirect_origin(
        query.redirect_uri.as_deref(),
        own_origin.as_ref(),
        &state.allowed_origins,
    )
    .map_err(|_| AuthError::NoRedirectOrigin)?;

    let (auth_url, auth_state) = state
        .oidc_client
        .authorization_url(&redirect)
        .map_err(|e| AuthError::Login(e.to_string()))?;

    tracing::debug!(redirect = %redirect, "Starting provider login");

    let cookie = Cookie::build((AUTH_STATE_COOKIE, auth_state.to_cookie_value()))
        .path("/")
        .http_only(true)
        .secure(state.session_config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(10));

    Ok((jar.add(cookie), Redirect::to(&auth_url)))
}

/// Completes a login when the provider redirects back to the page origin.
///
/// Requests that are not provider redirects pass through untouched.
pub async fn handle_redirect_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }
    let Some(auth_cookie) = jar.get(AUTH_STATE_COOKIE).map(|c| c.value().to_string()) else {
        return next.run(request).await;
    };
    let params = Query::<CallbackParams>::try_from_uri(request.uri())
        .map(|Query(params)| params)
        .unwrap_or_default();

    match params.classify() {
        Callback::NotACallback => next.run(request).await,
        Callback::Failed(err) => {
            tracing::warn!(error = %err, "Identity provider reported a failed login");
            (jar.add(expired_cookie(AUTH_STATE_COOKIE)), Redirect::to("/")).into_response()
        }
        Callback::Complete { code, state: csrf } => {
            match complete_login(&state, &auth_cookie, &code, &csrf).await {
                Ok(session) => {
                    let session_cookie = Cookie::build((SESSION_COOKIE, session.id().to_string()))
                        .path("/")
                        .http_only(true)
                        .secure(state.session_config.secure_cookies)
                        .same_site(SameSite::Lax)
                        .max_age(TimeDuration::minutes(
                            state.session_config.duration_minutes,
                        ));
                    let jar = jar
                        .add(session_cookie)
                        .add(expired_cookie(AUTH_STATE_COOKIE));
                    (jar, Redirect::to("/")).into_response()
                }
                Err(err) => (jar.add(expired_cookie(AUTH_STATE_COOKIE)), err).into_response(),
            }
        }
    }
}

async fn complete_login(
    state: &AppState,
    auth_cookie: &str,
    code: &str,
    csrf: &str,
) -> Result<Session, AuthError> {
    let auth_state = AuthState::from_cookie_value(auth_cookie)
        .ok_or(AuthError::Authentication(AuthenticationError::MissingAuthState))?;

    if csrf != auth_state.csrf_token {
        return Err(AuthError::Authentication(AuthenticationError::CsrfMismatch));
    }

    let token_result = state
        .oidc_client
        .exchange_code(code, &auth_state)
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let session = Session::new(
        SessionId::new(),
        token_result.claims,
        ChronoDuration::minutes(state.session_config.duration_minutes),
    )
    .with_access_token(token_result.access_token);

    state
        .sessions
        .create(session.clone())
        .await
        .map_err(|e| AuthError::SessionStore(e.to_string()))?;

    tracing::info!(
        session_id = %session.id(),
        subject = %session.claims().subject,
        "User logged in"
    );

    Ok(session)
}

/// Logs out the user by deleting their session and ending the provider session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Some(session_id) = jar
        .get(SESSION_COOKIE)
        .and_then(|c| SessionId::from_str(c.value()).ok())
    {
        match state.sessions.delete(session_id).await {
            Ok(true) => tracing::info!(session_id = %session_id, "User logged out"),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, session_id = %session_id, "Failed to delete session"),
        }
    }

    let own_origin = origin_of(&headers, &state);
    let target = resolve_redirect_origin(None, own_origin.as_ref(), &state.allowed_origins)
        .map(|origin| state.oidc_client.config().logout_url(&origin))
        .unwrap_or_else(|_| "/".to_string());

    (jar.add(expired_cookie(SESSION_COOKIE)), Redirect::to(&target))
}

fn origin_of(headers: &HeaderMap, state: &AppState) -> Option<Origin> {
    let default_scheme = if state.session_config.secure_cookies {
        Scheme::Https
    } else {
        Scheme::Http
    };
    request_origin(
        headers.get(header::HOST).and_then(|v| v.to_str().ok()),
        headers.get("x-forwarded-proto").and_then(|v| v.to_str().ok()),
        default_scheme,
    )
}

fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .max_age(TimeDuration::ZERO)
        .build()
}

/// Authentication errors.
#[derive(Debug)]
pub enum AuthError {
    Authentication(AuthenticationError),
    NoRedirectOrigin,
    Login(String),
    TokenExchange(String),
    SessionStore(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Authentication(err) => {
                tracing::warn!(error = %err, "Rejected provider redirect");
                (StatusCode::BAD_REQUEST, "Invalid login state")
            }
            Self::NoRedirectOrigin => (StatusCode::BAD_REQUEST, "Cannot determine page origin"),
            Self::Login(msg) => {
                tracing::error!("Failed to start login: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
            }
            Self::TokenExchange(msg) => {
                tracing::error!("Token exchange failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
            }
            Self::SessionStore(msg) => {
                tracing::error!("Session store error: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Unable to create session")
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(code: Option<&str>, state: Option<&str>, error: Option<&str>) -> CallbackParams {
        CallbackParams {
            code: code.map(str::to_string),
            state: state.map(str::to_string),
            error: error.map(str::to_string),
            error_description: None,
        }
    }

    #[test]
    fn code_and_state_complete_the_login() {
        assert_eq!(
            params(Some("abc"), Some("xyz"), None).classify(),
            Callback::Complete {
                code: "abc".to_string(),
                state: "xyz".to_string()
            }
        );
    }

    #[test]
    fn provider_error_takes_precedence() {
        let callback = params(Some("abc"), Some("xyz"), Some("access_denied")).classify();
        assert_eq!(
            callback,
            Callback::Failed(AuthenticationError::ProviderError {
                error: "access_denied".to_string(),
                description: String::new(),
            })
        );
    }

    #[test]
    fn partial_parameters_are_not_a_callback() {
        assert_eq!(params(Some("abc"), None, None).classify(), Callback::NotACallback);
        assert_eq!(params(None, Some("xyz"), None).classify(), Callback::NotACallback);
        assert_eq!(params(Some(""), Some("xyz"), None).classify(), Callback::NotACallback);
        assert_eq!(CallbackParams::default().classify(), Callback::NotACallback);
    }

    #[test]
    fn expired_cookie_clears_value() {
        let cookie = expired_cookie(AUTH_STATE_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(TimeDuration::ZERO));
        assert_eq!(cookie.path(), Some("/"));
    }
}
