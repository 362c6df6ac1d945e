// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;

use nikki_diary::config::Config;
use nikki_diary::db::MemoryStore;
use nikki_diary::models::Activity;
use nikki_diary::session::Session;

/// Debounce window used by the sync tests. Long enough to observe
/// coalescing, short enough to keep the suite fast.
#[allow(dead_code)]
pub const TEST_DEBOUNCE_MS: u64 = 50;

/// Sleep long enough for a scheduled debounced write to have fired.
#[allow(dead_code)]
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(TEST_DEBOUNCE_MS * 4)).await;
}

/// Config with the test debounce window.
#[allow(dead_code)]
pub fn test_config() -> Config {
    Config {
        debounce_ms: TEST_DEBOUNCE_MS,
        ..Config::default()
    }
}

/// Log in against a shared in-memory store.
#[allow(dead_code)]
pub async fn login(store: &Arc<MemoryStore>, username: &str) -> Session {
    let shared: Arc<dyn nikki_diary::db::SnapshotStore> = store.clone();
    Session::login(shared, &test_config(), username)
        .await
        .expect("login should succeed")
}

/// A well-formed activity record for seeding stores directly.
#[allow(dead_code)]
pub fn activity(id: &str, date: &str, start: &str, end: &str, desc: &str) -> Activity {
    Activity {
        id: id.to_string(),
        date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        description: desc.to_string(),
    }
}
