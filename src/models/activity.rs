// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Diary activity model for storage and sync.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::TimeRange;

/// A single diary entry: one time-ranged activity on one calendar day.
///
/// Field names follow the persisted document layout
/// (`{id, date, startTime, endTime, description}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Opaque stable identifier, unique within a user's diary
    pub id: String,
    /// Calendar day, ISO 8601 (`YYYY-MM-DD`)
    pub date: String,
    /// Start of the activity, `"HH:MM"`
    pub start_time: String,
    /// End of the activity, `"HH:MM"` (exclusive)
    pub end_time: String,
    /// Free-text description
    pub description: String,
}

impl Activity {
    /// Parse the stored clock strings into a validated [`TimeRange`].
    pub fn range(&self) -> Result<TimeRange> {
        TimeRange::parse(&self.start_time, &self.end_time)
    }
}

/// Per-user persisted document: the full activity list plus a
/// last-write stamp.
///
/// `lastUpdated` is stamped on every outbound write; documents written
/// by older deployments may not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryDocument {
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_serializes_with_document_field_names() {
        let activity = Activity {
            id: "a1".to_string(),
            date: "2024-01-10".to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            description: "Gym".to_string(),
        };

        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["id"], "a1");
        assert_eq!(json["date"], "2024-01-10");
        assert_eq!(json["startTime"], "09:00");
        assert_eq!(json["endTime"], "10:00");
        assert_eq!(json["description"], "Gym");
    }

    #[test]
    fn test_document_tolerates_missing_fields() {
        let doc: DiaryDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.activities.is_empty());
        assert!(doc.last_updated.is_none());
    }

    #[test]
    fn test_document_round_trip() {
        let doc = DiaryDocument {
            activities: vec![Activity {
                id: "a1".to_string(),
                date: "2024-01-10".to_string(),
                start_time: "09:00".to_string(),
                end_time: "10:00".to_string(),
                description: "Gym".to_string(),
            }],
            last_updated: Some("2024-01-10T12:00:00Z".to_string()),
        };

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: DiaryDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }
}
