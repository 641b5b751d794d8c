//! Tests for the in-memory session store

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::session::Session;
use crate::domain::entities::token::{RefreshTokenRecord, RefreshTokenStatus};
use crate::repositories::session::{MockSessionStore, SessionStore};

fn sample_session(user_id: Uuid) -> Session {
    Session::new(
        user_id,
        None,
        "session".to_string(),
        vec!["user".to_string()],
        Duration::days(7),
        Duration::days(30),
    )
}

fn sample_record(session_id: Uuid, hash: &str) -> RefreshTokenRecord {
    RefreshTokenRecord::new(session_id, hash.to_string(), Duration::days(7))
}

#[tokio::test]
async fn test_create_and_find_session() {
    let store = MockSessionStore::new();
    let session = sample_session(Uuid::new_v4());

    let saved = store.create_session(session.clone()).await.unwrap();
    assert_eq!(saved, session);

    let found = store.find_session(session.id).await.unwrap();
    assert_eq!(found, Some(session));
}

#[tokio::test]
async fn test_duplicate_session_rejected() {
    let store = MockSessionStore::new();
    let session = sample_session(Uuid::new_v4());

    store.create_session(session.clone()).await.unwrap();
    let result = store.create_session(session).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_find_sessions_by_user() {
    let store = MockSessionStore::new();
    let user_id = Uuid::new_v4();

    store.create_session(sample_session(user_id)).await.unwrap();
    store.create_session(sample_session(user_id)).await.unwrap();
    store
        .create_session(sample_session(Uuid::new_v4()))
        .await
        .unwrap();

    let sessions = store.find_sessions_by_user(user_id).await.unwrap();
    assert_eq!(sessions.len(), 2);
}

#[tokio::test]
async fn test_revoke_session_is_conditional() {
    let store = MockSessionStore::new();
    let session = sample_session(Uuid::new_v4());
    store.create_session(session.clone()).await.unwrap();

    let now = Utc::now();
    assert!(store.revoke_session(session.id, now).await.unwrap());
    // Second revocation reports no state change
    assert!(!store.revoke_session(session.id, now).await.unwrap());
    // Unknown session reports no state change
    assert!(!store.revoke_session(Uuid::new_v4(), now).await.unwrap());
}

#[tokio::test]
async fn test_consume_refresh_record_single_winner() {
    let store = MockSessionStore::new();
    let session_id = Uuid::new_v4();
    store
        .insert_refresh_record(sample_record(session_id, "hash-1"))
        .await
        .unwrap();

    assert!(store.consume_refresh_record("hash-1").await.unwrap());
    // Already rotated: the CAS must fail now
    assert!(!store.consume_refresh_record("hash-1").await.unwrap());

    let record = store.find_refresh_record("hash-1").await.unwrap().unwrap();
    assert_eq!(record.status, RefreshTokenStatus::Rotated);
}

#[tokio::test]
async fn test_concurrent_consume_has_one_winner() {
    let store = std::sync::Arc::new(MockSessionStore::new());
    let session_id = Uuid::new_v4();
    store
        .insert_refresh_record(sample_record(session_id, "hash-race"))
        .await
        .unwrap();

    let a = {
        let store = store.clone();
        tokio::spawn(async move { store.consume_refresh_record("hash-race").await.unwrap() })
    };
    let b = {
        let store = store.clone();
        tokio::spawn(async move { store.consume_refresh_record("hash-race").await.unwrap() })
    };

    let (won_a, won_b) = (a.await.unwrap(), b.await.unwrap());
    assert!(won_a ^ won_b, "exactly one concurrent caller must win");
}

#[tokio::test]
async fn test_revoke_session_records_skips_terminal() {
    let store = MockSessionStore::new();
    let session_id = Uuid::new_v4();

    store
        .insert_refresh_record(sample_record(session_id, "h-active"))
        .await
        .unwrap();
    store
        .insert_refresh_record(sample_record(session_id, "h-rotated"))
        .await
        .unwrap();
    store.consume_refresh_record("h-rotated").await.unwrap();

    let mut expired = sample_record(session_id, "h-expired");
    expired.status = RefreshTokenStatus::Expired;
    store.insert_refresh_record(expired).await.unwrap();

    // active + rotated transition, expired does not
    let count = store.revoke_session_records(session_id).await.unwrap();
    assert_eq!(count, 2);

    assert_eq!(
        store.record_status("h-expired").await,
        Some(RefreshTokenStatus::Expired)
    );
    assert_eq!(
        store.record_status("h-active").await,
        Some(RefreshTokenStatus::Revoked)
    );
}

#[tokio::test]
async fn test_mark_record_expired() {
    let store = MockSessionStore::new();
    let session_id = Uuid::new_v4();
    store
        .insert_refresh_record(sample_record(session_id, "h-1"))
        .await
        .unwrap();

    assert!(store.mark_record_expired("h-1").await.unwrap());
    assert!(!store.mark_record_expired("h-1").await.unwrap());
    assert_eq!(
        store.record_status("h-1").await,
        Some(RefreshTokenStatus::Expired)
    );
}

#[tokio::test]
async fn test_count_active_records() {
    let store = MockSessionStore::new();
    let session_id = Uuid::new_v4();

    assert_eq!(store.count_active_records(session_id).await.unwrap(), 0);

    store
        .insert_refresh_record(sample_record(session_id, "h-1"))
        .await
        .unwrap();
    assert_eq!(store.count_active_records(session_id).await.unwrap(), 1);

    store.consume_refresh_record("h-1").await.unwrap();
    store
        .insert_refresh_record(RefreshTokenRecord::rotated_from(
            session_id,
            "h-2".to_string(),
            "h-1".to_string(),
            Duration::days(7),
        ))
        .await
        .unwrap();
    assert_eq!(store.count_active_records(session_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_extend_session_updates_timestamps() {
    let store = MockSessionStore::new();
    let session = sample_session(Uuid::new_v4());
    store.create_session(session.clone()).await.unwrap();

    let now = Utc::now() + Duration::hours(1);
    let expires = now + Duration::days(7);
    assert!(store.extend_session(session.id, now, expires).await.unwrap());

    let stored = store.find_session(session.id).await.unwrap().unwrap();
    assert_eq!(stored.last_refreshed_at, now);
    assert_eq!(stored.expires_at, expires);
}
