//! Session management for authenticated users.
//!
//! A session is created after the provider redirects back with an
//! authorization code that exchanges successfully. It carries the verified
//! identity claims plus the profile the user can edit from the update view.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use user_portal_core::SessionId;

use crate::claims::IdentityClaims;

/// Profile details shown and edited in the user views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl UserProfile {
    /// Seeds a profile from the provider's claims.
    #[must_use]
    pub fn from_claims(claims: &IdentityClaims) -> Self {
        Self {
            display_name: claims.name.clone(),
            email: claims.email.clone(),
        }
    }
}

/// Represents an active authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    claims: IdentityClaims,
    profile: UserProfile,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    access_token: Option<String>,
}

impl Session {
    /// Creates a new session valid for `duration`.
    #[must_use]
    pub fn new(id: SessionId, claims: IdentityClaims, duration: Duration) -> Self {
        let now = Utc::now();
        let profile = UserProfile::from_claims(&claims);
        Self {
            id,
            claims,
            profile,
            created_at: now,
            expires_at: now + duration,
            access_token: None,
        }
    }

    /// Attaches the provider access token.
    #[must_use]
    pub fn with_access_token(mut self, access_token: String) -> Self {
        self.access_token = Some(access_token);
        self
    }

    /// Returns the session ID.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the verified identity claims.
    #[must_use]
    pub fn claims(&self) -> &IdentityClaims {
        &self.claims
    }

    /// Returns the editable profile.
    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Replaces the editable profile.
    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = profile;
    }

    /// Returns when the session was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the session expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns the provider access token, if present.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Returns true if the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if the session is expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns true if the session is still valid (not expired).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_expired()
    }
}
