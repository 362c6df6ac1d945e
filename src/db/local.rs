// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local file-backed snapshot store.
//!
//! The simpler deployment variant: one JSON document per key under a
//! data directory. Single-process, so the subscription stream carries
//! only the initial snapshot; there is no other writer to observe.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::db::{Snapshot, SnapshotStore, Subscription};
use crate::error::{AppError, Result};
use crate::models::DiaryDocument;

pub struct LocalFileStore {
    dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default data directory under the platform's data dir.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nikki-diary")
    }

    /// Keys are URL-encoded so arbitrary usernames map to safe file names.
    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }

    /// Read the stored document for a key, or `None` if absent.
    pub async fn get(&self, key: &str) -> Result<Option<DiaryDocument>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => {
                let doc = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::Storage(format!("corrupt document for {:?}: {}", key, e))
                })?;
                Ok(Some(doc))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(e.to_string())),
        }
    }

    async fn set(&self, key: &str, doc: &DiaryDocument) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let bytes = serde_json::to_vec_pretty(doc)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        tokio::fs::write(self.path_for(key), bytes)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SnapshotStore for LocalFileStore {
    async fn subscribe(&self, key: &str) -> Result<Subscription> {
        let snapshot = match self
            .get(key)
            .await
            .map_err(|e| AppError::SyncSubscribe(e.to_string()))?
        {
            Some(doc) => Snapshot::of(doc),
            None => Snapshot::absent(),
        };

        let (tx, rx) = mpsc::channel(1);
        tx.send(snapshot)
            .await
            .map_err(|_| AppError::SyncSubscribe("subscriber channel closed".to_string()))?;

        Ok(Subscription::new(rx, Vec::new()))
    }

    async fn write(&self, key: &str, doc: &DiaryDocument) -> Result<()> {
        self.set(key, doc)
            .await
            .map_err(|e| AppError::SyncWrite(e.to_string()))
    }
}
