//! Token grant value object returned by login and refresh.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The pair of credentials handed to a client after a successful login or
/// rotation
///
/// The refresh token is cleartext here and nowhere else: this value crosses
/// the wire exactly once and only its hash is ever persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenGrant {
    /// Signed access token (JWT)
    pub access_token: String,

    /// Opaque refresh token, shown to the client exactly once
    pub refresh_token: String,

    /// Session the grant belongs to
    pub session_id: Uuid,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

impl TokenGrant {
    /// Creates a new grant
    pub fn new(
        access_token: String,
        refresh_token: String,
        session_id: Uuid,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            session_id,
            access_expires_in,
            refresh_expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_grant_serialization() {
        let grant = TokenGrant::new(
            "at".to_string(),
            "rt".to_string(),
            Uuid::new_v4(),
            900,
            604800,
        );

        let json = serde_json::to_string(&grant).unwrap();
        let parsed: TokenGrant = serde_json::from_str(&json).unwrap();

        assert_eq!(grant, parsed);
        assert_eq!(parsed.access_expires_in, 900);
    }
}
