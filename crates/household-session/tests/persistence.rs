//! Integration tests: the session store over real file storage.
//!
//! These exercise the "survives a reload" promise end to end: one store
//! writes, a brand-new store over the same file reads.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use household_protocol::Role;
use household_session::{
    FileStorage, InvalidationReason, SessionConfig, SessionError, SessionEvent, SessionStore,
};
use tempfile::TempDir;

/// A session file in its own temp dir, removed when the guard drops.
fn session_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("session.json");
    (dir, path)
}

fn open(path: &Path) -> SessionStore {
    SessionStore::open(FileStorage::new(path), SessionConfig::default()).expect("should open")
}

#[test]
fn test_file_session_survives_reopen() {
    let (_dir, path) = session_file();
    open(&path).login(Role::Admin, "t1").unwrap();

    let reopened = open(&path);

    assert!(reopened.is_authenticated());
    assert_eq!(reopened.role(), Some(Role::Admin));
    assert_eq!(reopened.token().as_deref(), Some("t1"));
}

#[test]
fn test_file_session_logout_survives_reopen() {
    let (_dir, path) = session_file();
    let store = open(&path);
    store.login(Role::Customer, "t1").unwrap();
    store.logout().unwrap();

    let reopened = open(&path);

    assert!(!reopened.is_authenticated());
}

#[test]
fn test_file_session_invalidation_survives_reopen() {
    let (_dir, path) = session_file();
    let store = open(&path);
    store.login(Role::Professional, "t1").unwrap();
    assert!(store.invalidate("t1", InvalidationReason::Unauthorized));

    let reopened = open(&path);

    assert!(!reopened.is_authenticated());
}

#[test]
fn test_file_session_custom_keys_are_used() {
    let (_dir, path) = session_file();
    let config = SessionConfig {
        token_key: "hs_token".into(),
        user_key: "hs_user".into(),
        ..SessionConfig::default()
    };
    SessionStore::open(FileStorage::new(&path), config)
        .unwrap()
        .login(Role::Admin, "t1")
        .unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();

    assert!(raw.contains("hs_token"));
    assert!(raw.contains("hs_user"));
    assert!(!raw.contains(r#""token""#));
}

#[test]
fn test_file_session_corrupt_file_fails_to_open() {
    let (_dir, path) = session_file();
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let result = SessionStore::open(FileStorage::new(&path), SessionConfig::default());

    assert!(matches!(result, Err(SessionError::Corrupt(_))));
}

#[test]
fn test_concurrent_invalidations_consume_once() {
    // Eight "requests" that all got a 401 with the same token race to
    // invalidate it. Exactly one wins and exactly one event goes out.
    let store = Arc::new(SessionStore::in_memory());
    store.login(Role::Customer, "t1").unwrap();
    let mut rx = store.subscribe();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.invalidate("t1", InvalidationReason::Unauthorized))
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|cleared| *cleared)
        .count();

    assert_eq!(winners, 1);
    assert!(matches!(
        rx.try_recv(),
        Ok(SessionEvent::Invalidated { .. })
    ));
    assert!(rx.try_recv().is_err());
}
