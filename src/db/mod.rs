//! Storage layer: one addressable snapshot per session key.

pub mod firestore;
pub mod local;
pub mod memory;

pub use firestore::FirestoreStore;
pub use local::LocalFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::models::DiaryDocument;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// State of one persisted diary document at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Whether the document exists in the store at all
    pub exists: bool,
    pub data: DiaryDocument,
}

impl Snapshot {
    /// Snapshot of a key with no persisted document yet.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn of(data: DiaryDocument) -> Self {
        Self { exists: true, data }
    }
}

/// Cancellable handle on an inbound snapshot stream.
///
/// Yields snapshots in delivery order, starting with the current state
/// of the key. Dropping the subscription aborts any backend listener
/// tasks, so no listeners outlive the session that opened them.
pub struct Subscription {
    receiver: mpsc::Receiver<Snapshot>,
    tasks: Vec<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(receiver: mpsc::Receiver<Snapshot>, tasks: Vec<JoinHandle<()>>) -> Self {
        Self { receiver, tasks }
    }

    /// Next inbound snapshot; `None` once the stream is closed.
    pub async fn recv(&mut self) -> Option<Snapshot> {
        self.receiver.recv().await
    }

    /// Stop the stream and abort backend listener tasks.
    pub fn cancel(&mut self) {
        self.receiver.close();
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A store holding one diary document per key.
///
/// Backends differ in transport only; the sync bridge is agnostic to
/// how a key maps onto the underlying storage.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Open an inbound snapshot stream for `key`.
    async fn subscribe(&self, key: &str) -> Result<Subscription>;

    /// Persist the full document for `key`, replacing the previous copy.
    async fn write(&self, key: &str, doc: &DiaryDocument) -> Result<()>;
}
