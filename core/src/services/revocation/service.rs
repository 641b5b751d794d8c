//! Cascading revocation of sessions and their refresh-token chains.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::audit::{SecurityEvent, SecurityEventKind};
use crate::errors::DomainError;
use crate::repositories::audit::AuditSink;
use crate::repositories::session::SessionStore;

/// Service revoking sessions and cascading to their refresh-token state
///
/// After a revocation returns successfully, no refresh attempt against the
/// affected sessions can ever succeed again. Outstanding access tokens are
/// untouched and die at their natural expiry; that residual window is the
/// accepted cost of store-free access-token verification, bounded by the
/// short access-token lifetime.
pub struct RevocationService<S: SessionStore, A: AuditSink> {
    store: Arc<S>,
    audit: Arc<A>,
}

impl<S: SessionStore, A: AuditSink> RevocationService<S, A> {
    /// Creates a new revocation service
    pub fn new(store: Arc<S>, audit: Arc<A>) -> Self {
        Self { store, audit }
    }

    /// Revokes one session and every non-terminal record in its chain
    ///
    /// Idempotent: revoking an already-revoked session is a no-op success,
    /// and no duplicate audit event is emitted.
    ///
    /// # Returns
    /// * `Ok(())` - The session is revoked (now or previously)
    /// * `Err(DomainError::NotFound)` - No such session
    pub async fn revoke_session(&self, session_id: Uuid) -> Result<(), DomainError> {
        let session = self
            .store
            .find_session(session_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("session {session_id}"),
            })?;

        // Records first: a crash between the two writes leaves the chain
        // dead and the session marked live, which still refuses refreshes.
        self.store.revoke_session_records(session_id).await?;
        let changed = self.store.revoke_session(session_id, Utc::now()).await?;

        if changed {
            tracing::info!(session_id = %session_id, user_id = %session.user_id, "session revoked");

            let event = SecurityEvent::new(SecurityEventKind::SessionRevoked)
                .with_session(session_id)
                .with_user(session.user_id);
            if let Err(error) = self.audit.record(event).await {
                tracing::error!(%error, "failed to report revocation to audit sink");
            }
        }

        Ok(())
    }

    /// Revokes every session owned by a user
    ///
    /// Used for "log out everywhere" and compromise response. Returns the
    /// number of sessions this call actually transitioned.
    pub async fn revoke_all_sessions_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<usize, DomainError> {
        let sessions = self.store.find_sessions_by_user(user_id).await?;
        let mut revoked = 0;

        for session in &sessions {
            self.store.revoke_session_records(session.id).await?;
            if self.store.revoke_session(session.id, Utc::now()).await? {
                revoked += 1;
            }
        }

        if revoked > 0 {
            tracing::info!(user_id = %user_id, count = revoked, "all user sessions revoked");

            let event = SecurityEvent::new(SecurityEventKind::UserSessionsRevoked)
                .with_user(user_id)
                .with_detail(format!("{revoked} sessions revoked"));
            if let Err(error) = self.audit.record(event).await {
                tracing::error!(%error, "failed to report revocation to audit sink");
            }
        }

        Ok(revoked)
    }
}
