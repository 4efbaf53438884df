//! Helper functions for server functions with proper error handling and logging.

use crate::auth::{AppState, routes::SESSION_COOKIE};
use crate::error::SessionError;
use axum::Extension;
use axum_extra::extract::CookieJar;
use std::str::FromStr;
use std::sync::Arc;
use user_portal_core::SessionId;
use user_portal_identity::Session;

/// Gets the shared application state from the request.
pub async fn get_app_state() -> Result<Arc<AppState>, SessionError> {
    let Extension(state): Extension<Arc<AppState>> =
        leptos_axum::extract().await.map_err(|e| {
            tracing::error!(error = %e, "Application state missing from request");
            SessionError::Unavailable
        })?;
    Ok(state)
}

/// Reads the session id from the request's session cookie, if any.
pub async fn session_id_from_cookie() -> Result<Option<SessionId>, SessionError> {
    let jar = leptos_axum::extract::<CookieJar>().await.map_err(|e| {
        tracing::debug!(error = %e, "Failed to extract cookie jar");
        SessionError::NotAuthenticated
    })?;

    Ok(jar.get(SESSION_COOKIE).and_then(|c| {
        SessionId::from_str(c.value())
            .inspect_err(|e| tracing::debug!(error = %e, "Ignoring malformed session cookie"))
            .ok()
    }))
}

/// Extracts and validates the current session from the request.
///
/// This function:
/// 1. Gets the session cookie
/// 2. Looks up the session in the store
/// 3. Validates the session is not expired
///
/// Logs structured errors for debugging while returning user-safe error types.
pub async fn get_authenticated_session() -> Result<(Arc<AppState>, Session), SessionError> {
    let session_id = session_id_from_cookie()
        .await?
        .ok_or(SessionError::NotAuthenticated)?;
    let state = get_app_state().await?;

    let session = state
        .sessions
        .find_by_id(session_id)
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                session_id = %session_id,
                "Store error looking up session"
            );
            SessionError::Store {
                details: e.to_string(),
            }
        })?
        .ok_or_else(|| {
            tracing::debug!(session_id = %session_id, "Session not found in store");
            SessionError::NotFound {
                session_id: session_id.to_string(),
            }
        })?;

    if !session.is_valid() {
        tracing::debug!(session_id = %session_id, "Session expired");
        return Err(SessionError::Expired {
            session_id: session_id.to_string(),
        });
    }

    Ok((state, session))
}
