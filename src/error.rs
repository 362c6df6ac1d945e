// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

/// Application error type shared by the store, sync, and storage layers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Time conflict: {0}")]
    TimeConflict(String),

    #[error("Activity not found: {0}")]
    NotFound(String),

    #[error("Sync write failed: {0}")]
    SyncWrite(String),

    #[error("Sync subscribe failed: {0}")]
    SyncSubscribe(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
