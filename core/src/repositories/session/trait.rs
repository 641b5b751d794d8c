//! Session store trait defining the interface for session and
//! refresh-token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::session::Session;
use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Repository trait for session and refresh-token persistence
///
/// This is the only shared mutable state in the system. Every operation must
/// be safe under concurrent callers from multiple process instances: the
/// refresh protocol's correctness rests entirely on
/// [`consume_refresh_record`](Self::consume_refresh_record) being a true
/// compare-and-swap at the storage layer, never on in-process locking.
///
/// # Security Considerations
/// - Refresh tokens are hashed before storage; the store never sees cleartext
/// - Sessions are never deleted, only marked revoked; retention is owned by
///   an external cleanup policy
/// - Operations must fail within a bounded timeout; an uncertain write is an
///   error, not a success
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a newly created session
    ///
    /// # Returns
    /// * `Ok(Session)` - The saved session
    /// * `Err(DomainError)` - Save failed (e.g., duplicate id)
    async fn create_session(&self, session: Session) -> Result<Session, DomainError>;

    /// Point lookup of a session by id
    async fn find_session(&self, session_id: Uuid) -> Result<Option<Session>, DomainError>;

    /// All sessions belonging to a user, revoked ones included
    async fn find_sessions_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, DomainError>;

    /// Advance a session's sliding expiry
    ///
    /// # Returns
    /// * `Ok(true)` - Session found and updated
    /// * `Ok(false)` - No such session
    async fn extend_session(
        &self,
        session_id: Uuid,
        last_refreshed_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Set `revoked_at` on a session, conditional on it not being revoked yet
    ///
    /// # Returns
    /// * `Ok(true)` - This call revoked the session
    /// * `Ok(false)` - Session missing or already revoked
    async fn revoke_session(
        &self,
        session_id: Uuid,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Append a refresh-token record to a session's chain
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - The saved record
    /// * `Err(DomainError)` - Save failed (e.g., duplicate hash)
    async fn insert_refresh_record(
        &self,
        record: RefreshTokenRecord,
    ) -> Result<RefreshTokenRecord, DomainError>;

    /// Point lookup of a refresh-token record by token hash
    async fn find_refresh_record(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Compare-and-swap transition of a record from `active` to `rotated`
    ///
    /// When two callers race on the same hash, exactly one observes `true`;
    /// the loser must re-read the record and take the reuse path rather than
    /// retrying the write.
    ///
    /// # Returns
    /// * `Ok(true)` - This call performed the transition
    /// * `Ok(false)` - Record missing or no longer `active`
    async fn consume_refresh_record(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Transition a record from `active` to `expired`
    ///
    /// # Returns
    /// * `Ok(true)` - This call performed the transition
    /// * `Ok(false)` - Record missing or not `active`
    async fn mark_record_expired(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Transition every non-terminal record of a session to `revoked`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records transitioned
    async fn revoke_session_records(&self, session_id: Uuid) -> Result<usize, DomainError>;

    /// Count of `active` records for a session
    ///
    /// For any non-revoked session this is 0 or 1; the rotation protocol
    /// exists to keep it that way.
    async fn count_active_records(&self, session_id: Uuid) -> Result<usize, DomainError>;
}
