//! Unit tests for the revocation service

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::domain::entities::audit::SecurityEventKind;
use crate::domain::entities::session::Session;
use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;
use crate::repositories::audit::MockAuditSink;
use crate::repositories::session::{MockSessionStore, SessionStore};
use crate::services::revocation::RevocationService;

struct Fixture {
    store: Arc<MockSessionStore>,
    audit: Arc<MockAuditSink>,
    service: RevocationService<MockSessionStore, MockAuditSink>,
}

fn fixture() -> Fixture {
    let store = Arc::new(MockSessionStore::new());
    let audit = Arc::new(MockAuditSink::new());
    let service = RevocationService::new(store.clone(), audit.clone());

    Fixture {
        store,
        audit,
        service,
    }
}

impl Fixture {
    async fn session_with_chain(&self, user_id: Uuid, chain_len: usize) -> Session {
        let session = Session::new(
            user_id,
            None,
            "session".to_string(),
            vec!["user".to_string()],
            Duration::days(7),
            Duration::days(30),
        );
        let session = self.store.create_session(session).await.unwrap();

        let mut previous: Option<String> = None;
        for i in 0..chain_len {
            let hash = format!("{}-hash-{i}", session.id);
            let record = match previous.take() {
                None => RefreshTokenRecord::new(session.id, hash.clone(), Duration::days(7)),
                Some(prev) => RefreshTokenRecord::rotated_from(
                    session.id,
                    hash.clone(),
                    prev,
                    Duration::days(7),
                ),
            };
            self.store.insert_refresh_record(record).await.unwrap();
            if i + 1 < chain_len {
                self.store.consume_refresh_record(&hash).await.unwrap();
            }
            previous = Some(hash);
        }

        session
    }
}

#[tokio::test]
async fn test_revoke_session_cascades() {
    let fx = fixture();
    let session = fx.session_with_chain(Uuid::new_v4(), 3).await;

    fx.service.revoke_session(session.id).await.unwrap();

    let stored = fx.store.find_session(session.id).await.unwrap().unwrap();
    assert!(stored.is_revoked());
    assert_eq!(fx.store.count_active_records(session.id).await.unwrap(), 0);
    assert_eq!(fx.audit.count_of(SecurityEventKind::SessionRevoked).await, 1);
}

#[tokio::test]
async fn test_revoke_session_is_idempotent() {
    let fx = fixture();
    let session = fx.session_with_chain(Uuid::new_v4(), 1).await;

    fx.service.revoke_session(session.id).await.unwrap();
    // Second call: no-op success, no duplicate audit event
    fx.service.revoke_session(session.id).await.unwrap();

    assert_eq!(fx.audit.count_of(SecurityEventKind::SessionRevoked).await, 1);
}

#[tokio::test]
async fn test_revoke_unknown_session_is_not_found() {
    let fx = fixture();

    let result = fx.service.revoke_session(Uuid::new_v4()).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
    assert_eq!(fx.audit.events().await.len(), 0);
}

#[tokio::test]
async fn test_revoke_all_sessions_for_user() {
    let fx = fixture();
    let user_id = Uuid::new_v4();

    let a = fx.session_with_chain(user_id, 2).await;
    let b = fx.session_with_chain(user_id, 1).await;
    let other = fx.session_with_chain(Uuid::new_v4(), 1).await;

    let revoked = fx
        .service
        .revoke_all_sessions_for_user(user_id)
        .await
        .unwrap();
    assert_eq!(revoked, 2);

    for id in [a.id, b.id] {
        let stored = fx.store.find_session(id).await.unwrap().unwrap();
        assert!(stored.is_revoked());
        assert_eq!(fx.store.count_active_records(id).await.unwrap(), 0);
    }

    // Unrelated user is untouched
    let stored = fx.store.find_session(other.id).await.unwrap().unwrap();
    assert!(!stored.is_revoked());
    assert_eq!(fx.store.count_active_records(other.id).await.unwrap(), 1);

    assert_eq!(
        fx.audit.count_of(SecurityEventKind::UserSessionsRevoked).await,
        1
    );
}

#[tokio::test]
async fn test_revoke_all_counts_only_transitions() {
    let fx = fixture();
    let user_id = Uuid::new_v4();

    let a = fx.session_with_chain(user_id, 1).await;
    fx.session_with_chain(user_id, 1).await;

    fx.service.revoke_session(a.id).await.unwrap();

    // Only the still-live session transitions on the account-wide pass
    let revoked = fx
        .service
        .revoke_all_sessions_for_user(user_id)
        .await
        .unwrap();
    assert_eq!(revoked, 1);
}

#[tokio::test]
async fn test_revoke_all_for_user_without_sessions() {
    let fx = fixture();

    let revoked = fx
        .service
        .revoke_all_sessions_for_user(Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(revoked, 0);
    assert_eq!(fx.audit.events().await.len(), 0);
}
