//! Session storage.
//!
//! Sessions live in process memory: the application has no persistence layer
//! and a restart simply signs everyone out.

use async_trait::async_trait;
use chrono::Utc;
use rootcause::prelude::Report;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use user_portal_core::SessionId;

use crate::error::SessionStoreError;
use crate::session::{Session, UserProfile};

/// Storage for authenticated sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session.
    async fn create(&self, session: Session) -> Result<(), Report<SessionStoreError>>;

    /// Looks up a session by ID. Expired sessions are still returned.
    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, Report<SessionStoreError>>;

    /// Replaces the profile of a live session and returns the updated session.
    async fn update_profile(
        &self,
        id: SessionId,
        profile: UserProfile,
    ) -> Result<Session, Report<SessionStoreError>>;

    /// Removes a session. Returns whether it existed.
    async fn delete(&self, id: SessionId) -> Result<bool, Report<SessionStoreError>>;

    /// Removes every expired session. Returns how many were removed.
    async fn delete_expired(&self) -> Result<usize, Report<SessionStoreError>>;
}

/// A `SessionStore` backed by a shared `HashMap`.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    capacity: usize,
}

impl InMemorySessionStore {
    /// Creates an empty store holding at most `capacity` sessions.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Returns the number of stored sessions, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns true if no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: Session) -> Result<(), Report<SessionStoreError>> {
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&session.id()) {
            return Err(SessionStoreError::AlreadyExists {
                session_id: session.id().to_string(),
            }
            .into());
        }

        if sessions.len() >= self.capacity {
            // Make room from expired sessions before refusing
            let now = Utc::now();
            sessions.retain(|_, s| !s.is_expired_at(now));
            if sessions.len() >= self.capacity {
                tracing::warn!(capacity = self.capacity, "Session store is full");
                return Err(SessionStoreError::CapacityExceeded {
                    capacity: self.capacity,
                }
                .into());
            }
        }

        tracing::debug!(session_id = %session.id(), "Created session");
        sessions.insert(session.id(), session);
        Ok(())
    }

    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, Report<SessionStoreError>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn update_profile(
        &self,
        id: SessionId,
        profile: UserProfile,
    ) -> Result<Session, Report<SessionStoreError>> {
        let mut sessions = self.sessions.write().await;

        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| SessionStoreError::NotFound {
                session_id: id.to_string(),
            })?;

        if session.is_expired() {
            return Err(SessionStoreError::Expired {
                session_id: id.to_string(),
            }
            .into());
        }

        session.set_profile(profile);
        Ok(session.clone())
    }

    async fn delete(&self, id: SessionId) -> Result<bool, Report<SessionStoreError>> {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "Deleted session");
        }
        Ok(removed)
    }

    async fn delete_expired(&self) -> Result<usize, Report<SessionStoreError>> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::IdentityClaims;
    use chrono::Duration;

    fn session(duration: Duration) -> Session {
        let claims = IdentityClaims::new("auth0|7".to_string(), "https://tenant/".to_string())
            .with_name(Some("Grace".to_string()));
        Session::new(SessionId::new(), claims, duration)
    }

    #[tokio::test]
    async fn create_then_find() {
        let store = InMemorySessionStore::new(10);
        let session = session(Duration::minutes(5));
        let id = session.id();

        store.create(session.clone()).await.expect("create");

        let found = store.find_by_id(id).await.expect("find");
        assert_eq!(found, Some(session));
        assert!(store.find_by_id(SessionId::new()).await.expect("find").is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let store = InMemorySessionStore::new(10);
        let session = session(Duration::minutes(5));

        store.create(session.clone()).await.expect("create");
        let err = store.create(session).await.expect_err("duplicate");
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn full_store_evicts_expired_before_refusing() {
        let store = InMemorySessionStore::new(1);
        store
            .create(session(Duration::zero()))
            .await
            .expect("create expired");

        store
            .create(session(Duration::minutes(5)))
            .await
            .expect("expired session makes room");
        assert_eq!(store.len().await, 1);

        let err = store
            .create(session(Duration::minutes(5)))
            .await
            .expect_err("store is full");
        assert!(err.to_string().contains("full"));
    }

    #[tokio::test]
    async fn update_profile_replaces_profile() {
        let store = InMemorySessionStore::new(10);
        let session = session(Duration::minutes(5));
        let id = session.id();
        store.create(session).await.expect("create");

        let profile = UserProfile {
            display_name: Some("Admiral".to_string()),
            email: Some("grace@example.com".to_string()),
        };
        let updated = store
            .update_profile(id, profile.clone())
            .await
            .expect("update");

        assert_eq!(updated.profile(), &profile);
        let stored = store.find_by_id(id).await.expect("find").expect("present");
        assert_eq!(stored.profile(), &profile);
    }

    #[tokio::test]
    async fn update_profile_requires_live_session() {
        let store = InMemorySessionStore::new(10);

        let err = store
            .update_profile(SessionId::new(), UserProfile::default())
            .await
            .expect_err("missing");
        assert!(err.to_string().contains("not found"));

        let expired = session(Duration::zero());
        let id = expired.id();
        store.create(expired).await.expect("create");
        let err = store
            .update_profile(id, UserProfile::default())
            .await
            .expect_err("expired");
        assert!(err.to_string().contains("expired"));
    }

    #[tokio::test]
    async fn delete_and_delete_expired() {
        let store = InMemorySessionStore::new(10);
        let live = session(Duration::minutes(5));
        let live_id = live.id();
        store.create(live).await.expect("create");
        store.create(session(Duration::zero())).await.expect("create");
        store.create(session(Duration::zero())).await.expect("create");

        assert_eq!(store.delete_expired().await.expect("sweep"), 2);
        assert_eq!(store.len().await, 1);

        assert!(store.delete(live_id).await.expect("delete"));
        assert!(!store.delete(live_id).await.expect("delete again"));
        assert!(store.is_empty().await);
    }
}
