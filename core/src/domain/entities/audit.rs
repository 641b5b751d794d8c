//! Security event entity forwarded to the external audit collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of security events this service emits
///
/// Reuse detection and revocation are the only conditions requiring
/// side-channel reporting; everything else surfaces as a plain request
/// outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityEventKind {
    /// An already-rotated refresh token was presented
    ReuseDetected,

    /// A single session was revoked
    SessionRevoked,

    /// Every session of a user was revoked
    UserSessionsRevoked,
}

impl SecurityEventKind {
    /// Convert to string representation for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReuseDetected => "REUSE_DETECTED",
            Self::SessionRevoked => "SESSION_REVOKED",
            Self::UserSessionsRevoked => "USER_SESSIONS_REVOKED",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "REUSE_DETECTED" => Some(Self::ReuseDetected),
            "SESSION_REVOKED" => Some(Self::SessionRevoked),
            "USER_SESSIONS_REVOKED" => Some(Self::UserSessionsRevoked),
            _ => None,
        }
    }
}

/// A security event emitted to the audit sink
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityEvent {
    /// Unique identifier for the event
    pub id: Uuid,

    /// Kind of event
    pub kind: SecurityEventKind,

    /// Session involved, if the event concerns a single session
    pub session_id: Option<Uuid>,

    /// User involved, if known
    pub user_id: Option<Uuid>,

    /// Hash of the refresh token that triggered the event, if any
    pub token_hash: Option<String>,

    /// Free-form context for the alerting pipeline
    pub detail: Option<String>,

    /// Timestamp when the event occurred
    pub occurred_at: DateTime<Utc>,
}

impl SecurityEvent {
    /// Creates a new event occurring now
    pub fn new(kind: SecurityEventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            session_id: None,
            user_id: None,
            token_hash: None,
            detail: None,
            occurred_at: Utc::now(),
        }
    }

    /// Attach the session the event concerns
    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Attach the user the event concerns
    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Attach the refresh-token hash that triggered the event
    pub fn with_token_hash(mut self, token_hash: impl Into<String>) -> Self {
        self.token_hash = Some(token_hash.into());
        self
    }

    /// Attach free-form context
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
