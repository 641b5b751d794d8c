//! In-memory implementation of SessionStore for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::session::Session;
use crate::domain::entities::token::{RefreshTokenRecord, RefreshTokenStatus};
use crate::errors::DomainError;

use super::r#trait::SessionStore;

/// In-memory session store
///
/// Both maps live behind a single `RwLock`, so every trait method is one
/// atomic step with respect to the others; in particular the
/// `consume_refresh_record` check-and-set happens entirely under the write
/// lock, which gives the same one-winner guarantee the SQL adapter gets from
/// a conditional `UPDATE`.
pub struct MockSessionStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<Uuid, Session>,
    records: HashMap<String, RefreshTokenRecord>,
}

impl MockSessionStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Look up a record by hash in constant time (test helper)
    pub async fn record_status(&self, token_hash: &str) -> Option<RefreshTokenStatus> {
        let inner = self.inner.read().await;
        inner
            .records
            .iter()
            .find(|(hash, _)| constant_time_eq(hash.as_bytes(), token_hash.as_bytes()))
            .map(|(_, record)| record.status)
    }

    /// Total number of stored records (test helper)
    pub async fn record_count(&self) -> usize {
        self.inner.read().await.records.len()
    }
}

impl Default for MockSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn create_session(&self, session: Session) -> Result<Session, DomainError> {
        let mut inner = self.inner.write().await;

        if inner.sessions.contains_key(&session.id) {
            return Err(DomainError::Validation {
                message: "Session already exists".to_string(),
            });
        }

        inner.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_session(&self, session_id: Uuid) -> Result<Option<Session>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.sessions.get(&session_id).cloned())
    }

    async fn find_sessions_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, DomainError> {
        let inner = self.inner.read().await;
        let mut sessions: Vec<Session> = inner
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.created_at);
        Ok(sessions)
    }

    async fn extend_session(
        &self,
        session_id: Uuid,
        last_refreshed_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut inner = self.inner.write().await;

        match inner.sessions.get_mut(&session_id) {
            Some(session) => {
                session.last_refreshed_at = last_refreshed_at;
                session.expires_at = expires_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_session(
        &self,
        session_id: Uuid,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut inner = self.inner.write().await;

        match inner.sessions.get_mut(&session_id) {
            Some(session) if session.revoked_at.is_none() => {
                session.revoked_at = Some(revoked_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_refresh_record(
        &self,
        record: RefreshTokenRecord,
    ) -> Result<RefreshTokenRecord, DomainError> {
        let mut inner = self.inner.write().await;

        if inner.records.contains_key(&record.token_hash) {
            return Err(DomainError::Validation {
                message: "Refresh token record already exists".to_string(),
            });
        }

        inner
            .records
            .insert(record.token_hash.clone(), record.clone());
        Ok(record)
    }

    async fn find_refresh_record(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(token_hash).cloned())
    }

    async fn consume_refresh_record(&self, token_hash: &str) -> Result<bool, DomainError> {
        let mut inner = self.inner.write().await;

        match inner.records.get_mut(token_hash) {
            Some(record) if record.status == RefreshTokenStatus::Active => {
                record.status = RefreshTokenStatus::Rotated;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_record_expired(&self, token_hash: &str) -> Result<bool, DomainError> {
        let mut inner = self.inner.write().await;

        match inner.records.get_mut(token_hash) {
            Some(record) if record.status == RefreshTokenStatus::Active => {
                record.status = RefreshTokenStatus::Expired;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_session_records(&self, session_id: Uuid) -> Result<usize, DomainError> {
        let mut inner = self.inner.write().await;
        let mut count = 0;

        for record in inner.records.values_mut() {
            if record.session_id == session_id && !record.status.is_terminal() {
                record.status = RefreshTokenStatus::Revoked;
                count += 1;
            }
        }

        Ok(count)
    }

    async fn count_active_records(&self, session_id: Uuid) -> Result<usize, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .values()
            .filter(|r| r.session_id == session_id && r.status == RefreshTokenStatus::Active)
            .count())
    }
}
