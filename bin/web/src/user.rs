//! User-related server functions for identity, entry, and profile updates.

use crate::error::FormError;
use crate::types::{EntryReceipt, UserForm, UserInfo};
use leptos::prelude::*;

/// Server function to get the current user info.
///
/// Returns `None` when there is no live session.
#[server]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    use crate::error::SessionError;
    use crate::server_helpers::get_authenticated_session;

    match get_authenticated_session().await {
        Ok((_, session)) => Ok(Some(UserInfo::from(&session))),
        Err(
            SessionError::NotAuthenticated
            | SessionError::NotFound { .. }
            | SessionError::Expired { .. },
        ) => Ok(None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve current user");
            Err(e.into_server_error())
        }
    }
}

/// Server function to accept a new user entry.
///
/// Entries are acknowledged and logged, not stored.
#[server]
pub async fn submit_user_entry(form: UserForm) -> Result<EntryReceipt, ServerFnError> {
    let receipt = accept_entry(&form).map_err(|e| {
        tracing::debug!(error = %e, "Rejected user entry");
        e.into_server_error()
    })?;

    tracing::info!(
        entry_id = %receipt.id,
        name = %receipt.name,
        email = %receipt.email,
        "User entry submitted"
    );

    Ok(receipt)
}

/// Server function to update the signed-in user's profile.
#[server]
pub async fn update_profile(form: UserForm) -> Result<UserInfo, ServerFnError> {
    use crate::error::SessionError;
    use crate::server_helpers::get_authenticated_session;

    let form = form.validate().map_err(|errors| {
        let e = FormError { errors };
        tracing::debug!(error = %e, "Rejected profile update");
        e.into_server_error()
    })?;

    let (state, session) = get_authenticated_session()
        .await
        .map_err(SessionError::into_server_error)?;

    let updated = state
        .sessions
        .update_profile(session.id(), profile_from_form(form))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, session_id = %session.id(), "Failed to update profile");
            SessionError::Store {
                details: e.to_string(),
            }
            .into_server_error()
        })?;

    tracing::info!(session_id = %updated.id(), "Profile updated");

    Ok(UserInfo::from(&updated))
}

/// Validates a user entry and issues its receipt.
pub fn accept_entry(form: &UserForm) -> Result<EntryReceipt, FormError> {
    let form = form.validate().map_err(|errors| FormError { errors })?;
    Ok(EntryReceipt {
        id: ulid::Ulid::new().to_string(),
        name: form.name,
        email: form.email,
    })
}

#[cfg(feature = "ssr")]
fn profile_from_form(form: UserForm) -> user_portal_identity::UserProfile {
    user_portal_identity::UserProfile {
        display_name: Some(form.name),
        email: Some(form.email),
    }
}
