// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use crate::db::LocalFileStore;

/// Which snapshot-store backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Firestore,
    Local,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Snapshot-store backend selection
    pub backend: StorageBackend,
    /// GCP project ID (Firestore backend)
    pub gcp_project_id: String,
    /// Data directory (local backend)
    pub data_dir: PathBuf,
    /// Outbound-write debounce window in milliseconds
    pub debounce_ms: u64,
    /// Firestore change-poll interval in seconds
    pub poll_interval_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            gcp_project_id: "test-project".to_string(),
            data_dir: PathBuf::from("data"),
            debounce_ms: 400,
            poll_interval_secs: 2,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let backend =
            parse_backend(&env::var("DIARY_BACKEND").unwrap_or_else(|_| "local".to_string()))?;

        Ok(Self {
            backend,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            data_dir: env::var("DIARY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| LocalFileStore::default_dir()),
            debounce_ms: env::var("DIARY_DEBOUNCE_MS")
                .unwrap_or_else(|_| "400".to_string())
                .parse()
                .unwrap_or(400),
            poll_interval_secs: env::var("DIARY_POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),
        })
    }
}

fn parse_backend(value: &str) -> Result<StorageBackend, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "firestore" => Ok(StorageBackend::Firestore),
        "local" => Ok(StorageBackend::Local),
        other => Err(ConfigError::Invalid("DIARY_BACKEND", other.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("DIARY_BACKEND", "local");
        env::set_var("DIARY_DEBOUNCE_MS", "250");
        env::set_var("DIARY_DATA_DIR", "/tmp/diary-test");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.backend, StorageBackend::Local);
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/diary-test"));

        env::remove_var("DIARY_BACKEND");
        env::remove_var("DIARY_DEBOUNCE_MS");
        env::remove_var("DIARY_DATA_DIR");
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = parse_backend("cloud-spanner").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("DIARY_BACKEND", _)));
        assert_eq!(parse_backend("Firestore").unwrap(), StorageBackend::Firestore);
    }
}
