// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user session: owns the in-memory store and the sync bridge.
//!
//! A session is constructed at login and consumed at logout; switching
//! users means ending one session and starting another, which discards
//! the in-memory diary and re-subscribes under the new key. The
//! persisted copy always survives logout.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Config;
use crate::db::SnapshotStore;
use crate::error::{AppError, Result};
use crate::models::Activity;
use crate::services::diary::{self, ActivityStore, DateFilter};
use crate::services::export::{build_export_rows, ExportRow};
use crate::services::sync::{SyncBridge, SyncState};
use crate::time_utils;

pub struct Session {
    username: String,
    activities: Arc<Mutex<ActivityStore>>,
    bridge: SyncBridge,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Start a session for `username` against the given snapshot store.
    ///
    /// The username doubles as the storage key; it is trimmed and must
    /// be non-empty. The bridge's first inbound snapshot populates the
    /// store.
    pub async fn login(
        store: Arc<dyn SnapshotStore>,
        config: &Config,
        username: &str,
    ) -> Result<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::Validation("username must not be empty".to_string()));
        }

        let activities = Arc::new(Mutex::new(ActivityStore::new()));
        let bridge = SyncBridge::subscribe(
            store,
            username.to_string(),
            activities.clone(),
            Duration::from_millis(config.debounce_ms),
        )
        .await?;

        tracing::info!(user = username, "Session started");

        Ok(Self {
            username: username.to_string(),
            activities,
            bridge,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Add a new activity and schedule the debounced write.
    pub fn add_activity(
        &self,
        date: &str,
        start_time: &str,
        end_time: &str,
        description: &str,
    ) -> Result<Activity> {
        let activity = self
            .activities
            .lock()
            .unwrap()
            .add(date, start_time, end_time, description)?;
        self.bridge.schedule_write();
        Ok(activity)
    }

    /// Edit an existing activity and schedule the debounced write.
    pub fn update_activity(
        &self,
        id: &str,
        date: &str,
        start_time: &str,
        end_time: &str,
        description: &str,
    ) -> Result<Activity> {
        let activity = self
            .activities
            .lock()
            .unwrap()
            .update(id, date, start_time, end_time, description)?;
        self.bridge.schedule_write();
        Ok(activity)
    }

    /// Delete an activity and schedule the debounced write.
    ///
    /// Confirmation is the caller's concern; by the time this runs the
    /// user already said yes.
    pub fn delete_activity(&self, id: &str) -> Result<()> {
        self.activities.lock().unwrap().delete(id)?;
        self.bridge.schedule_write();
        Ok(())
    }

    /// Snapshot of the current records, in store order.
    pub fn activities(&self) -> Vec<Activity> {
        self.activities.lock().unwrap().records().to_vec()
    }

    pub fn activity(&self, id: &str) -> Option<Activity> {
        self.activities.lock().unwrap().get(id).cloned()
    }

    pub fn filtered(&self, filter: &DateFilter) -> Vec<Activity> {
        diary::filter_by_date(&self.activities(), filter)
    }

    pub fn unique_dates(&self) -> Vec<String> {
        diary::unique_dates(&self.activities())
    }

    /// Rows for the tabular export sink, honoring the date filter.
    pub fn export_rows(&self, filter: &DateFilter) -> Vec<ExportRow> {
        let records = self.filtered(filter);
        build_export_rows(&records, time_utils::format_date_label)
    }

    pub fn sync_state(&self) -> SyncState {
        self.bridge.state()
    }

    /// End the session: cancel pending sync work, unsubscribe, and
    /// discard the in-memory diary.
    pub fn logout(self) {
        self.bridge.shutdown();
        tracing::info!(user = %self.username, "Session ended");
    }
}
