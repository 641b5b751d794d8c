//! Unit tests for the key manager

use chrono::Duration;

use crate::errors::{DomainError, TokenError};
use crate::services::key::KeyManager;

#[test]
fn test_new_manager_has_current_key() {
    let manager = KeyManager::new(Duration::hours(1)).unwrap();

    let (key_id, _) = manager.current_signing_key().unwrap();
    assert!(!key_id.is_empty());
    assert_eq!(manager.current_key_id().unwrap(), key_id);

    // The current key verifies
    assert!(manager.decoding_key(&key_id).is_ok());
}

#[test]
fn test_unknown_key_id_is_invalid_token() {
    let manager = KeyManager::new(Duration::hours(1)).unwrap();

    let result = manager.decoding_key("no-such-key");
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidToken))
    ));
}

#[test]
fn test_rotation_changes_current_key() {
    let manager = KeyManager::new(Duration::hours(1)).unwrap();
    let old_id = manager.current_key_id().unwrap();

    let new_id = manager.rotate_key().unwrap();

    assert_ne!(old_id, new_id);
    assert_eq!(manager.current_key_id().unwrap(), new_id);
}

#[test]
fn test_retired_key_verifies_during_overlap() {
    let manager = KeyManager::new(Duration::hours(1)).unwrap();
    let old_id = manager.current_key_id().unwrap();

    manager.rotate_key().unwrap();

    // Old key stays usable for verification inside the window
    assert!(manager.decoding_key(&old_id).is_ok());
}

#[test]
fn test_retired_key_unavailable_after_overlap() {
    // Zero-length window: retirement is immediate
    let manager = KeyManager::new(Duration::zero()).unwrap();
    let old_id = manager.current_key_id().unwrap();

    manager.rotate_key().unwrap();

    let result = manager.decoding_key(&old_id);
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::KeyUnavailable { key_id })) if key_id == old_id
    ));
}

#[test]
fn test_pruning_drops_over_retired_keys() {
    let manager = KeyManager::new(Duration::zero()).unwrap();
    let first_id = manager.current_key_id().unwrap();

    manager.rotate_key().unwrap();
    // The second rotation prunes the first key entirely
    manager.rotate_key().unwrap();

    let result = manager.decoding_key(&first_id);
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidToken))
    ));
}

#[test]
fn test_public_keys_lists_current_and_overlap() {
    let manager = KeyManager::new(Duration::hours(1)).unwrap();
    let first_id = manager.current_key_id().unwrap();
    let second_id = manager.rotate_key().unwrap();

    let keys = manager.public_keys().unwrap();
    assert_eq!(keys.len(), 2);

    let first = keys.iter().find(|k| k.key_id == first_id).unwrap();
    assert!(first.retired_at.is_some());
    assert_eq!(first.algorithm, "EdDSA");
    assert!(!first.public_key.is_empty());

    let second = keys.iter().find(|k| k.key_id == second_id).unwrap();
    assert!(second.retired_at.is_none());
}

#[test]
fn test_public_keys_excludes_pruned() {
    let manager = KeyManager::new(Duration::zero()).unwrap();
    manager.rotate_key().unwrap();

    let keys = manager.public_keys().unwrap();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].retired_at.is_none());
}
