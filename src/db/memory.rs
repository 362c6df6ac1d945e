// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory snapshot store for tests and offline use.
//!
//! Mirrors the remote store's observable behavior: every write is
//! echoed to all subscribers of that key, including the session that
//! issued it. Writes can be counted and made to fail, which is what the
//! sync tests lean on.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::db::{Snapshot, SnapshotStore, Subscription};
use crate::error::{AppError, Result};
use crate::models::DiaryDocument;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, DiaryDocument>>,
    subscribers: Mutex<HashMap<String, Vec<mpsc::Sender<Snapshot>>>>,
    write_count: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes across all keys.
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail (failure injection for tests).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current document for a key, if any.
    pub fn document(&self, key: &str) -> Option<DiaryDocument> {
        self.documents.lock().unwrap().get(key).cloned()
    }

    /// Preload a document without counting a write or notifying
    /// subscribers, to model state that existed before the session.
    pub fn seed(&self, key: &str, doc: DiaryDocument) {
        self.documents.lock().unwrap().insert(key.to_string(), doc);
    }

    fn current_snapshot(&self, key: &str) -> Snapshot {
        match self.documents.lock().unwrap().get(key) {
            Some(doc) => Snapshot::of(doc.clone()),
            None => Snapshot::absent(),
        }
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn subscribe(&self, key: &str) -> Result<Subscription> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let initial = self.current_snapshot(key);
        tx.send(initial)
            .await
            .map_err(|_| AppError::SyncSubscribe("subscriber channel closed".to_string()))?;

        self.subscribers
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push(tx);

        Ok(Subscription::new(rx, Vec::new()))
    }

    async fn write(&self, key: &str, doc: &DiaryDocument) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::SyncWrite("injected write failure".to_string()));
        }

        self.documents
            .lock()
            .unwrap()
            .insert(key.to_string(), doc.clone());
        self.write_count.fetch_add(1, Ordering::SeqCst);

        // Echo the new state to every live subscriber of this key.
        let senders: Vec<mpsc::Sender<Snapshot>> = {
            let mut subscribers = self.subscribers.lock().unwrap();
            if let Some(list) = subscribers.get_mut(key) {
                list.retain(|tx| !tx.is_closed());
                list.clone()
            } else {
                Vec::new()
            }
        };

        let snapshot = Snapshot::of(doc.clone());
        for tx in senders {
            let _ = tx.send(snapshot.clone()).await;
        }

        Ok(())
    }
}
