//! Unit tests for the auth service

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenStatus;
use crate::errors::DomainError;
use crate::repositories::session::{MockSessionStore, SessionStore};
use crate::services::auth::{AuthService, MockCredentialVerifier, VerifiedIdentity};
use crate::services::key::KeyManager;
use crate::services::token::{TokenIssuer, TokenPolicy};

struct Fixture {
    store: Arc<MockSessionStore>,
    issuer: Arc<TokenIssuer>,
    service: AuthService<MockSessionStore, MockCredentialVerifier>,
    user_id: Uuid,
}

fn fixture() -> Fixture {
    let policy = TokenPolicy::default();
    let store = Arc::new(MockSessionStore::new());
    let keys = Arc::new(KeyManager::new(policy.key_overlap_window()).unwrap());
    let issuer = Arc::new(TokenIssuer::new(keys, policy.clone()));

    let user_id = Uuid::new_v4();
    let verifier = Arc::new(MockCredentialVerifier::new().with_account(
        "alice",
        "correct-horse",
        VerifiedIdentity {
            user_id,
            scope: "session".to_string(),
            roles: vec!["user".to_string()],
        },
    ));

    let service = AuthService::new(store.clone(), verifier, issuer.clone(), policy);

    Fixture {
        store,
        issuer,
        service,
        user_id,
    }
}

#[tokio::test]
async fn test_login_creates_session_and_grant() {
    let fx = fixture();

    let grant = fx
        .service
        .login("alice", "correct-horse", Some("fp".to_string()))
        .await
        .unwrap();

    let session = fx
        .store
        .find_session(grant.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.user_id, fx.user_id);
    assert_eq!(session.device_fingerprint.as_deref(), Some("fp"));

    // Exactly one active record, holding the hash of the issued token
    assert_eq!(fx.store.count_active_records(session.id).await.unwrap(), 1);
    let hash = TokenIssuer::hash_token(&grant.refresh_token);
    assert_eq!(
        fx.store.record_status(&hash).await,
        Some(RefreshTokenStatus::Active)
    );
}

#[tokio::test]
async fn test_login_token_carries_identity() {
    let fx = fixture();

    let grant = fx
        .service
        .login("alice", "correct-horse", None)
        .await
        .unwrap();

    let claims = fx.issuer.verify_access_token(&grant.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), fx.user_id);
    assert_eq!(claims.session_id().unwrap(), grant.session_id);
    assert_eq!(claims.scope, "session");
    assert_eq!(claims.roles, vec!["user".to_string()]);
}

#[tokio::test]
async fn test_wrong_password_is_uniform_failure() {
    let fx = fixture();

    let result = fx.service.login("alice", "wrong", None).await;
    assert!(matches!(result, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_unknown_user_is_uniform_failure() {
    let fx = fixture();

    let result = fx.service.login("mallory", "whatever", None).await;
    assert!(matches!(result, Err(DomainError::Unauthorized)));

    // Failure leaves no session behind
    let sessions = fx.store.find_sessions_by_user(fx.user_id).await.unwrap();
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_two_logins_are_independent_sessions() {
    let fx = fixture();

    let first = fx
        .service
        .login("alice", "correct-horse", None)
        .await
        .unwrap();
    let second = fx
        .service
        .login("alice", "correct-horse", None)
        .await
        .unwrap();

    assert_ne!(first.session_id, second.session_id);
    assert_ne!(first.refresh_token, second.refresh_token);

    let sessions = fx.store.find_sessions_by_user(fx.user_id).await.unwrap();
    assert_eq!(sessions.len(), 2);
}
