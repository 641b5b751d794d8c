//! Session entity: the long-lived authorization context behind token rotation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A login session owning a chain of refresh-token records.
///
/// Sessions are created once at login, extended by the rotation engine on
/// each legitimate refresh, and closed by the revocation service. They are
/// never physically deleted; a revoked session is retained (with
/// `revoked_at` set) for audit and reuse-detection purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (the `sid` claim of access tokens)
    pub id: Uuid,

    /// User owning the session
    pub user_id: Uuid,

    /// Hash of user-agent plus coarse network origin; advisory only
    pub device_fingerprint: Option<String>,

    /// Scope string captured from the credential verifier at login
    pub scope: String,

    /// Role names captured from the credential verifier at login
    pub roles: Vec<String>,

    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the most recent successful refresh
    pub last_refreshed_at: DateTime<Utc>,

    /// Sliding expiry, capped by `created_at + max_session_age`
    pub expires_at: DateTime<Utc>,

    /// Set when the session is revoked; revocation is terminal
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a new session starting now.
    ///
    /// The initial expiry is `now + sliding_window`, already clamped by
    /// `max_age` so the invariant `expires_at <= created_at + max_age`
    /// holds from the first instant.
    pub fn new(
        user_id: Uuid,
        device_fingerprint: Option<String>,
        scope: String,
        roles: Vec<String>,
        sliding_window: Duration,
        max_age: Duration,
    ) -> Self {
        let now = Utc::now();
        let expires_at = std::cmp::min(now + sliding_window, now + max_age);

        Self {
            id: Uuid::new_v4(),
            user_id,
            device_fingerprint,
            scope,
            roles,
            created_at: now,
            last_refreshed_at: now,
            expires_at,
            revoked_at: None,
        }
    }

    /// Whether the session has been revoked
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Whether the session has passed its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// A session is live when it is neither revoked nor expired
    pub fn is_live(&self) -> bool {
        !self.is_revoked() && !self.is_expired()
    }

    /// The hard ceiling no extension may push `expires_at` past
    pub fn max_expires_at(&self, max_age: Duration) -> DateTime<Utc> {
        self.created_at + max_age
    }

    /// Slides the expiry forward from `now`, capped by the maximum age.
    ///
    /// Invariant: `expires_at <= created_at + max_age` after every call,
    /// no matter how many rotations the session survives.
    pub fn extend(&mut self, now: DateTime<Utc>, sliding_window: Duration, max_age: Duration) {
        self.last_refreshed_at = now;
        self.expires_at = std::cmp::min(now + sliding_window, self.max_expires_at(max_age));
    }

    /// Marks the session revoked at `now`. Revoking twice keeps the
    /// original timestamp.
    pub fn revoke(&mut self, now: DateTime<Utc>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(now);
        }
    }
}
