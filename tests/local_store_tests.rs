// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local file backend: document round-trips and a full session over
//! the simpler deployment variant.

mod common;

use std::sync::Arc;

use nikki_diary::db::{LocalFileStore, SnapshotStore};
use nikki_diary::models::DiaryDocument;
use nikki_diary::session::Session;

use common::{activity, settle, test_config};

#[tokio::test]
async fn test_get_returns_none_for_absent_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new(dir.path());
    assert!(store.get("ana").await.unwrap().is_none());
}

#[tokio::test]
async fn test_write_then_get_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new(dir.path());

    let doc = DiaryDocument {
        activities: vec![activity("a", "2024-01-10", "09:00", "10:00", "Gym")],
        last_updated: Some("2024-01-10T12:00:00Z".to_string()),
    };
    store.write("ana", &doc).await.unwrap();

    let loaded = store.get("ana").await.unwrap().expect("document exists");
    assert_eq!(loaded, doc);
}

#[tokio::test]
async fn test_awkward_usernames_map_to_distinct_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new(dir.path());

    let doc = DiaryDocument::default();
    store.write("ana/../ben", &doc).await.unwrap();
    store.write("ana", &doc).await.unwrap();

    assert!(store.get("ana/../ben").await.unwrap().is_some());
    assert!(store.get("ana").await.unwrap().is_some());
    // Both files live inside the data dir; the encoded name cannot
    // escape it.
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 2);
}

#[tokio::test]
async fn test_subscription_delivers_initial_snapshot_only() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new(dir.path());

    let mut sub = store.subscribe("ana").await.unwrap();
    let snapshot = sub.recv().await.unwrap();
    assert!(!snapshot.exists);
    assert!(sub.recv().await.is_none());
}

#[tokio::test]
async fn test_session_persists_across_logins() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SnapshotStore> = Arc::new(LocalFileStore::new(dir.path()));
    let config = test_config();

    let session = Session::login(store.clone(), &config, "ana").await.unwrap();
    settle().await;
    session
        .add_activity("2024-01-10", "09:00", "10:00", "Gym")
        .unwrap();
    settle().await;
    session.logout();

    // A fresh session under the same name sees the persisted diary.
    let session = Session::login(store, &config, "ana").await.unwrap();
    settle().await;
    let records = session.activities();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].description, "Gym");
    session.logout();
}
