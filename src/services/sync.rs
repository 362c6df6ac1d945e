// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync bridge between the in-memory store and a snapshot store.
//!
//! Reconciliation rules:
//! - Inbound snapshots are remote-origin replacements: they overwrite
//!   the whole store (dedup + re-sort), cancel any still-pending
//!   debounced write, and never schedule one. The remote copy just
//!   became truth.
//! - Local mutations are local-origin: each one schedules an outbound
//!   write of the full snapshot after a debounce window, superseding
//!   any write still waiting out its window. Rapid edits coalesce into
//!   one write.
//! - A write already in flight is never interrupted by supersession or
//!   by an inbound snapshot; the store's own write semantics decide the
//!   durable winner (last-writer-wins).
//! - Write failures are logged and not retried; the in-memory store
//!   stays authoritative until the next successful write or inbound
//!   snapshot.
//!
//! The origin of every store replacement is explicit in the control
//! flow (which function ran), not a "skip the next write" flag, so the
//! state machine is testable without timing races. Cancellation of a
//! pending write is a generation bump: a write task re-checks the
//! generation after its debounce sleep and exits quietly when it has
//! been superseded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::db::{Snapshot, SnapshotStore};
use crate::error::Result;
use crate::models::DiaryDocument;
use crate::services::diary::ActivityStore;
use crate::time_utils;

/// Per-session sync lifecycle.
///
/// `Dirty` is entered by a local mutation and left by a successful
/// write, by a superseding mutation, or by a remote replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Unsubscribed,
    Subscribing,
    Synced,
    Dirty,
}

/// State shared between the bridge, its listener task, and write tasks.
struct Shared {
    state: Mutex<SyncState>,
    /// Latest scheduled write task, aborted only on shutdown.
    pending: Mutex<Option<JoinHandle<()>>>,
    /// Write generation; a bump invalidates every write task still
    /// waiting out its debounce window.
    generation: AtomicU64,
}

impl Shared {
    fn set_state(&self, state: SyncState) {
        *self.state.lock().unwrap() = state;
    }

    /// Invalidate any write still in its debounce window.
    fn cancel_pending(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

/// Keeps one user's [`ActivityStore`] consistent with one snapshot-store
/// key, last-writer-wins, without write feedback loops.
pub struct SyncBridge {
    store: Arc<dyn SnapshotStore>,
    key: String,
    debounce: Duration,
    activities: Arc<Mutex<ActivityStore>>,
    shared: Arc<Shared>,
    listener: JoinHandle<()>,
}

impl SyncBridge {
    /// Subscribe to the snapshot stream for `key` and start applying
    /// inbound snapshots to `activities`.
    pub async fn subscribe(
        store: Arc<dyn SnapshotStore>,
        key: String,
        activities: Arc<Mutex<ActivityStore>>,
        debounce: Duration,
    ) -> Result<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(SyncState::Subscribing),
            pending: Mutex::new(None),
            generation: AtomicU64::new(0),
        });

        let mut subscription = store.subscribe(&key).await?;

        let listener = {
            let activities = activities.clone();
            let shared = shared.clone();
            let key = key.clone();
            tokio::spawn(async move {
                while let Some(snapshot) = subscription.recv().await {
                    apply_remote(&activities, &shared, &key, snapshot);
                }
                tracing::debug!(key = %key, "Snapshot stream ended");
            })
        };

        Ok(Self {
            store,
            key,
            debounce,
            activities,
            shared,
            listener,
        })
    }

    /// Schedule a debounced outbound write of the current snapshot.
    ///
    /// Call after every successful local mutation. A write still in its
    /// debounce window is superseded; the store contents are captured
    /// when the window elapses, not when the mutation happened, so the
    /// coalesced write always carries the newest state.
    pub fn schedule_write(&self) {
        let generation = self.shared.cancel_pending();
        self.shared.set_state(SyncState::Dirty);

        let store = self.store.clone();
        let key = self.key.clone();
        let activities = self.activities.clone();
        let shared = self.shared.clone();
        let debounce = self.debounce;

        let task = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !shared.is_current(generation) {
                // Superseded or remote-replaced while debouncing.
                return;
            }

            let doc = DiaryDocument {
                activities: activities.lock().unwrap().records().to_vec(),
                last_updated: Some(time_utils::now_rfc3339()),
            };

            match store.write(&key, &doc).await {
                Ok(()) => {
                    if shared.is_current(generation) {
                        shared.set_state(SyncState::Synced);
                    }
                    tracing::debug!(key = %key, count = doc.activities.len(), "Diary persisted");
                }
                Err(e) => {
                    // Stays Dirty; the user keeps working against local
                    // state until the next write or inbound snapshot.
                    tracing::error!(key = %key, error = %e, "Diary write failed");
                }
            }
        });

        // Only the newest handle is kept; an older task either already
        // exited via the generation check or is in flight and runs to
        // completion.
        *self.shared.pending.lock().unwrap() = Some(task);
    }

    pub fn state(&self) -> SyncState {
        *self.shared.state.lock().unwrap()
    }

    /// Cancel any pending write and tear down the inbound listener.
    ///
    /// Aborting the listener drops the subscription, which aborts any
    /// backend tasks behind it.
    pub fn shutdown(&self) {
        self.shared.cancel_pending();
        if let Some(task) = self.shared.pending.lock().unwrap().take() {
            task.abort();
        }
        self.listener.abort();
        self.shared.set_state(SyncState::Unsubscribed);
    }
}

impl Drop for SyncBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Remote-origin replacement of the whole store.
fn apply_remote(
    activities: &Arc<Mutex<ActivityStore>>,
    shared: &Shared,
    key: &str,
    snapshot: Snapshot,
) {
    shared.cancel_pending();

    let count = snapshot.data.activities.len();
    activities
        .lock()
        .unwrap()
        .replace_all(snapshot.data.activities);
    shared.set_state(SyncState::Synced);

    tracing::debug!(key = %key, count, exists = snapshot.exists, "Applied remote snapshot");
}
