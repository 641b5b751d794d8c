//! Token entities: access-token claims and stored refresh-token records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims structure for the access-token JWT payload
///
/// Access tokens are self-contained: verification needs only the signature
/// and the temporal claims, never a storage lookup. The signing key id
/// travels in the JWT header (`kid`), not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Session ID owning this token
    pub sid: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Scope string
    pub scope: String,

    /// Role names
    pub roles: Vec<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a fresh access token with a new `jti`
    pub fn new_access_token(
        user_id: Uuid,
        session_id: Uuid,
        scope: String,
        roles: Vec<String>,
        issuer: &str,
        audience: &str,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + lifetime;

        Self {
            sub: user_id.to_string(),
            sid: session_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            scope,
            roles,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.exp
    }

    /// Checks temporal validity (`nbf <= now < exp`)
    pub fn is_valid(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.nbf && now < self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Gets the session ID from the claims
    pub fn session_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sid)
    }
}

/// Lifecycle state of a stored refresh-token record
///
/// Records move through a one-way lattice: `Active` is the only state that
/// can refresh, `Rotated` means the token was consumed by a successful
/// rotation, and `Revoked`/`Expired` are terminal failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshTokenStatus {
    Active,
    Rotated,
    Revoked,
    Expired,
}

impl RefreshTokenStatus {
    /// String form used for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Rotated => "rotated",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        }
    }

    /// Parse from the database string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "rotated" => Some(Self::Rotated),
            "revoked" => Some(Self::Revoked),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    /// Terminal states never transition again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revoked | Self::Expired)
    }
}

/// Stored record of one refresh token
///
/// The cleartext token is never persisted; only its SHA-256 hash. Records
/// form an append-only chain per session via `rotated_from_hash`, and for a
/// non-revoked session at most one record is `Active` at any instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// SHA-256 hex hash of the token; primary lookup key
    pub token_hash: String,

    /// Session owning this record
    pub session_id: Uuid,

    /// Hash of the direct predecessor in the rotation chain, if any
    pub rotated_from_hash: Option<String>,

    /// Current lifecycle state
    pub status: RefreshTokenStatus,

    /// Timestamp when the token was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Creates the first record of a session's chain
    pub fn new(session_id: Uuid, token_hash: String, lifetime: Duration) -> Self {
        let now = Utc::now();

        Self {
            token_hash,
            session_id,
            rotated_from_hash: None,
            status: RefreshTokenStatus::Active,
            issued_at: now,
            expires_at: now + lifetime,
        }
    }

    /// Creates a successor record chained to the consumed predecessor
    pub fn rotated_from(
        session_id: Uuid,
        token_hash: String,
        predecessor_hash: String,
        lifetime: Duration,
    ) -> Self {
        let mut record = Self::new(session_id, token_hash, lifetime);
        record.rotated_from_hash = Some(predecessor_hash);
        record
    }

    /// Whether the record is past its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Whether the record can still be used to refresh
    pub fn is_active(&self) -> bool {
        self.status == RefreshTokenStatus::Active && !self.is_expired()
    }
}
