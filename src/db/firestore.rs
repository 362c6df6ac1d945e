// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed snapshot store.
//!
//! One diary document per user in the `users` collection. Reads and
//! writes go through the fluent API; the subscription stream is driven
//! by a change-polling task so the bridge sees the same
//! snapshot-in-delivery-order contract as with any other backend.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::db::{collections, Snapshot, SnapshotStore, Subscription};
use crate::error::{AppError, Result};
use crate::models::DiaryDocument;

const CHANNEL_CAPACITY: usize = 16;

/// Firestore client wrapper.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
    poll_interval: Duration,
}

impl FirestoreStore {
    /// Connect to Firestore.
    ///
    /// For local development with the emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn connect(project_id: &str, poll_interval: Duration) -> Result<Self> {
        // If the emulator environment variable is set, use an unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::connect_emulator(project_id, poll_interval).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client,
            poll_interval,
        })
    }

    /// Connect to the emulator with unauthenticated access.
    async fn connect_emulator(project_id: &str, poll_interval: Duration) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Storage(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client,
            poll_interval,
        })
    }

    /// Keys are URL-encoded so arbitrary usernames map to safe document ids.
    fn document_id(key: &str) -> String {
        urlencoding::encode(key).into_owned()
    }

    async fn read_document(&self, key: &str) -> Result<Option<DiaryDocument>> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&Self::document_id(key))
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }
}

#[async_trait]
impl SnapshotStore for FirestoreStore {
    async fn subscribe(&self, key: &str) -> Result<Subscription> {
        let initial = self
            .read_document(key)
            .await
            .map_err(|e| AppError::SyncSubscribe(e.to_string()))?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let snapshot = match &initial {
            Some(doc) => Snapshot::of(doc.clone()),
            None => Snapshot::absent(),
        };
        tx.send(snapshot)
            .await
            .map_err(|_| AppError::SyncSubscribe("subscriber channel closed".to_string()))?;

        let store = self.clone();
        let key = key.to_string();
        let poll = tokio::spawn(async move {
            let mut last = initial;
            loop {
                tokio::time::sleep(store.poll_interval).await;

                let current = match store.read_document(&key).await {
                    Ok(doc) => doc,
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Snapshot poll failed");
                        continue;
                    }
                };

                if current == last {
                    continue;
                }

                let snapshot = match &current {
                    Some(doc) => Snapshot::of(doc.clone()),
                    None => Snapshot::absent(),
                };
                if tx.send(snapshot).await.is_err() {
                    // Subscriber gone; stop polling.
                    break;
                }
                last = current;
            }
        });

        Ok(Subscription::new(rx, vec![poll]))
    }

    async fn write(&self, key: &str, doc: &DiaryDocument) -> Result<()> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(Self::document_id(key))
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::SyncWrite(e.to_string()))?;

        tracing::debug!(key, count = doc.activities.len(), "Snapshot written");
        Ok(())
    }
}
