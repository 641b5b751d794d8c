//! The refresh protocol: validate, detect reuse, rotate, extend.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::audit::{SecurityEvent, SecurityEventKind};
use crate::domain::entities::token::{RefreshTokenRecord, RefreshTokenStatus};
use crate::domain::value_objects::token_grant::TokenGrant;
use crate::errors::{DomainError, TokenError};
use crate::repositories::audit::AuditSink;
use crate::repositories::session::SessionStore;
use crate::services::token::{TokenIssuer, TokenPolicy};

/// Engine executing refresh-token rotation against the session store
///
/// All coordination lives in the store's compare-and-swap: for one stored
/// record, exactly one `active -> rotated` transition ever succeeds, no
/// matter how many instances race. The engine holds no mutable state of its
/// own.
///
/// Reuse handling is strict: a caller losing the CAS race is handled
/// exactly like a replayed token, so the session is revoked. A legitimate
/// client that double-submits pays with a forced re-login; a thief replaying
/// a captured token gets the whole session burned. That trade is deliberate.
pub struct RotationEngine<S: SessionStore, A: AuditSink> {
    store: Arc<S>,
    audit: Arc<A>,
    issuer: Arc<TokenIssuer>,
    policy: TokenPolicy,
}

impl<S: SessionStore, A: AuditSink> RotationEngine<S, A> {
    /// Creates a new rotation engine
    pub fn new(store: Arc<S>, audit: Arc<A>, issuer: Arc<TokenIssuer>, policy: TokenPolicy) -> Self {
        Self {
            store,
            audit,
            issuer,
            policy,
        }
    }

    /// Rotates a presented refresh token into a fresh token pair
    ///
    /// # Arguments
    ///
    /// * `presented_token` - The cleartext refresh token from the client
    ///
    /// # Returns
    ///
    /// * `Ok(TokenGrant)` - New access/refresh pair; the presented token is
    ///   now consumed
    /// * `Err(DomainError)` - `InvalidToken`, `ExpiredToken`,
    ///   `SessionRevoked`, or `ReuseDetected` (which has already revoked
    ///   the owning session by the time it is returned)
    pub async fn refresh(&self, presented_token: &str) -> Result<TokenGrant, DomainError> {
        let token_hash = TokenIssuer::hash_token(presented_token);

        let record = self
            .store
            .find_refresh_record(&token_hash)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidToken))?;

        match record.status {
            RefreshTokenStatus::Revoked => Err(DomainError::Token(TokenError::SessionRevoked)),
            RefreshTokenStatus::Expired => Err(DomainError::Token(TokenError::ExpiredToken)),
            RefreshTokenStatus::Rotated => self.handle_reuse(&record).await,
            RefreshTokenStatus::Active => self.rotate(record).await,
        }
    }

    /// The normal path: consume the active record and mint its successor
    async fn rotate(&self, record: RefreshTokenRecord) -> Result<TokenGrant, DomainError> {
        if record.is_expired() {
            // Lazily reflect reality in the store; no session-wide action
            self.store.mark_record_expired(&record.token_hash).await?;
            return Err(DomainError::Token(TokenError::ExpiredToken));
        }

        let mut session = self
            .store
            .find_session(record.session_id)
            .await?
            .ok_or_else(|| DomainError::Internal {
                message: format!("refresh record {} has no session", record.token_hash),
            })?;

        if session.is_revoked() {
            return Err(DomainError::Token(TokenError::SessionRevoked));
        }
        if session.is_expired() {
            return Err(DomainError::Token(TokenError::ExpiredToken));
        }

        // The linchpin: exactly one caller wins this transition. Losing it
        // means someone else consumed the record since our lookup, which is
        // indistinguishable from replay.
        if !self.store.consume_refresh_record(&record.token_hash).await? {
            return self.handle_reuse(&record).await;
        }

        let issued = self.issuer.issue(&session)?;

        let successor = RefreshTokenRecord::rotated_from(
            session.id,
            issued.refresh_token_hash.clone(),
            record.token_hash.clone(),
            self.policy.refresh_token_ttl(),
        );
        self.store.insert_refresh_record(successor).await?;

        session.extend(
            Utc::now(),
            self.policy.session_sliding_window(),
            self.policy.max_session_age(),
        );
        self.store
            .extend_session(session.id, session.last_refreshed_at, session.expires_at)
            .await?;

        tracing::debug!(session_id = %session.id, "refresh token rotated");

        Ok(TokenGrant::new(
            issued.access_token,
            issued.refresh_token,
            session.id,
            issued.access_expires_in,
            issued.refresh_expires_in,
        ))
    }

    /// The reuse path: burn the session, then tell the audit pipeline
    ///
    /// Revocation happens before the audit write so a failing sink can
    /// never leave a compromised session alive.
    async fn handle_reuse(&self, record: &RefreshTokenRecord) -> Result<TokenGrant, DomainError> {
        tracing::warn!(
            session_id = %record.session_id,
            "rotated refresh token presented again; revoking session"
        );

        let session = self.store.find_session(record.session_id).await?;

        self.store.revoke_session_records(record.session_id).await?;
        self.store
            .revoke_session(record.session_id, Utc::now())
            .await?;

        let mut event = SecurityEvent::new(SecurityEventKind::ReuseDetected)
            .with_session(record.session_id)
            .with_token_hash(record.token_hash.clone())
            .with_detail("rotated refresh token presented again");
        if let Some(session) = session {
            event = event.with_user(session.user_id);
        }

        if let Err(error) = self.audit.record(event).await {
            // The session is already dead; a deaf sink must not change the
            // outcome of the request.
            tracing::error!(%error, "failed to report reuse event to audit sink");
        }

        Err(DomainError::Token(TokenError::ReuseDetected))
    }
}
