// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export formatter.
//!
//! Reshapes an ordered, already-filtered activity sequence into the
//! flat row layout the tabular sink consumes: per date group, a header
//! row carrying only the formatted date label, one row per activity,
//! and a blank separator row. No computation, and idempotent: the same
//! input always yields the identical row sequence.

use serde::Serialize;

use crate::models::Activity;
use crate::services::diary::group_by_date;

/// One row for the tabular sink; field names are the sink's column
/// headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time")]
    pub end_time: String,
    #[serde(rename = "Activity")]
    pub activity: String,
}

impl ExportRow {
    fn header(label: String) -> Self {
        Self {
            date: label,
            ..Self::default()
        }
    }

    fn entry(activity: &Activity) -> Self {
        Self {
            date: String::new(),
            start_time: activity.start_time.clone(),
            end_time: activity.end_time.clone(),
            activity: activity.description.clone(),
        }
    }

    fn blank() -> Self {
        Self::default()
    }
}

/// Flatten `records` into sink rows.
///
/// `label` formats an ISO date for the group header (the locale-aware
/// collaborator; see [`crate::time_utils::format_date_label`]).
pub fn build_export_rows(records: &[Activity], label: impl Fn(&str) -> String) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for (date, group) in group_by_date(records) {
        rows.push(ExportRow::header(label(&date)));
        for activity in &group {
            rows.push(ExportRow::entry(activity));
        }
        rows.push(ExportRow::blank());
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(date: &str, start: &str, end: &str, desc: &str) -> Activity {
        Activity {
            id: format!("{date}-{start}"),
            date: date.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            description: desc.to_string(),
        }
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        let rows = build_export_rows(&[], |d| d.to_string());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_header_carries_only_the_label() {
        let records = vec![activity("2024-01-10", "09:00", "10:00", "Gym")];
        let rows = build_export_rows(&records, |d| format!("label({d})"));

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, "label(2024-01-10)");
        assert_eq!(rows[0].start_time, "");
        assert_eq!(rows[0].end_time, "");
        assert_eq!(rows[0].activity, "");
        assert_eq!(rows[1].date, "");
        assert_eq!(rows[1].start_time, "09:00");
        assert_eq!(rows[2], ExportRow::blank());
    }

    #[test]
    fn test_serialized_column_names_match_sink_contract() {
        let rows = build_export_rows(
            &[activity("2024-01-10", "09:00", "10:00", "Gym")],
            |d| d.to_string(),
        );
        let json = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(json["Date"], "");
        assert_eq!(json["Start Time"], "09:00");
        assert_eq!(json["End Time"], "10:00");
        assert_eq!(json["Activity"], "Gym");
    }
}
