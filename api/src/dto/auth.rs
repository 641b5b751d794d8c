use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use sentra_core::domain::entities::session::Session;
use sentra_core::domain::value_objects::token_grant::TokenGrant;
use sentra_core::services::key::PublicKeyEntry;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255))]
    pub username: String,

    #[validate(length(min = 1, max = 1024))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub session_id: Uuid,
}

impl From<TokenGrant> for AuthResponse {
    fn from(grant: TokenGrant) -> Self {
        Self {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: grant.access_expires_in,
            session_id: grant.session_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// One session in the "active sessions" listing
///
/// Deliberately excludes scope/roles and any token material; this surface
/// is for device management, not authorization introspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub device_fingerprint: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_refreshed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub current: bool,
}

impl SessionResponse {
    pub fn from_session(session: &Session, current_session_id: Uuid) -> Self {
        Self {
            session_id: session.id,
            device_fingerprint: session.device_fingerprint.clone(),
            created_at: session.created_at,
            last_refreshed_at: session.last_refreshed_at,
            expires_at: session.expires_at,
            current: session.id == current_session_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeyResponse {
    pub key_id: String,
    pub algorithm: String,
    pub public_key: String,
    pub retired_at: Option<DateTime<Utc>>,
}

impl From<PublicKeyEntry> for PublicKeyResponse {
    fn from(entry: PublicKeyEntry) -> Self {
        Self {
            key_id: entry.key_id,
            algorithm: entry.algorithm,
            public_key: entry.public_key,
            retired_at: entry.retired_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeysResponse {
    pub keys: Vec<PublicKeyResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_from_grant() {
        let session_id = Uuid::new_v4();
        let grant = TokenGrant::new(
            "at".to_string(),
            "rt".to_string(),
            session_id,
            900,
            604800,
        );

        let response = AuthResponse::from(grant);
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 900);
        assert_eq!(response.session_id, session_id);
    }

    #[test]
    fn test_login_request_validation() {
        use validator::Validate;

        let valid = LoginRequest {
            username: "alice".to_string(),
            password: "secret".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = LoginRequest {
            username: String::new(),
            password: "secret".to_string(),
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_session_response_marks_current() {
        let session = Session::new(
            Uuid::new_v4(),
            None,
            "session".to_string(),
            vec![],
            chrono::Duration::days(7),
            chrono::Duration::days(30),
        );

        let current = SessionResponse::from_session(&session, session.id);
        assert!(current.current);

        let other = SessionResponse::from_session(&session, Uuid::new_v4());
        assert!(!other.current);
    }
}
