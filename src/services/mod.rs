// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod diary;
pub mod export;
pub mod sync;

pub use diary::{ActivityStore, DateFilter};
pub use export::{build_export_rows, ExportRow};
pub use sync::{SyncBridge, SyncState};
