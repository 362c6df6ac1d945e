// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory activity store.
//!
//! Holds one user's diary as an ordered sequence of activities and owns
//! all mutation rules:
//! - field validation and time-range parsing
//! - same-day overlap rejection
//! - the order invariant: ascending by `(date, start)` after every
//!   mutation and every inbound replace
//!
//! Grouping, filtering, and distinct-date listing are derived views over
//! the stored order; the rendering layer and the export formatter both
//! consume them.

use std::collections::HashSet;

use crate::error::{AppError, Result};
use crate::models::time_range::parse_clock;
use crate::models::{Activity, TimeRange};

/// Date filter for list and export views.
///
/// `All` is the sentinel for "no filtering".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFilter {
    All,
    Date(String),
}

impl DateFilter {
    /// Parse a user-supplied filter argument; `"all"` selects everything.
    pub fn from_arg(arg: &str) -> Self {
        if arg.eq_ignore_ascii_case("all") {
            DateFilter::All
        } else {
            DateFilter::Date(arg.to_string())
        }
    }
}

/// One user's in-memory diary.
#[derive(Debug, Default)]
pub struct ActivityStore {
    records: Vec<Activity>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current records, always sorted ascending by `(date, start)`.
    pub fn records(&self) -> &[Activity] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.records.iter().find(|a| a.id == id)
    }

    /// Validate and insert a new activity.
    ///
    /// The conflict check excludes no record: any overlap with an
    /// existing same-day activity rejects the insert.
    pub fn add(
        &mut self,
        date: &str,
        start_time: &str,
        end_time: &str,
        description: &str,
    ) -> Result<Activity> {
        let range = validate_fields(date, start_time, end_time, description)?;
        self.check_conflict(date, &range, None)?;

        let activity = Activity {
            id: uuid::Uuid::new_v4().to_string(),
            date: date.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            description: description.to_string(),
        };

        self.records.push(activity.clone());
        sort_records(&mut self.records);

        tracing::debug!(id = %activity.id, date = %activity.date, "Activity added");
        Ok(activity)
    }

    /// Validate and replace an existing activity in place.
    ///
    /// Same rules as [`add`](Self::add), except the record being updated
    /// is excluded from the conflict check, so re-saving an unchanged
    /// range succeeds.
    pub fn update(
        &mut self,
        id: &str,
        date: &str,
        start_time: &str,
        end_time: &str,
        description: &str,
    ) -> Result<Activity> {
        let index = self
            .records
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        let range = validate_fields(date, start_time, end_time, description)?;
        self.check_conflict(date, &range, Some(id))?;

        let activity = Activity {
            id: id.to_string(),
            date: date.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            description: description.to_string(),
        };

        self.records[index] = activity.clone();
        sort_records(&mut self.records);

        tracing::debug!(id, date, "Activity updated");
        Ok(activity)
    }

    /// Remove an activity by id.
    ///
    /// Any user-facing confirmation happens in the caller; the store
    /// performs no confirmation I/O.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let index = self
            .records
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        self.records.remove(index);
        tracing::debug!(id, "Activity deleted");
        Ok(())
    }

    /// Replace the whole diary with an inbound snapshot.
    ///
    /// Deduplicates by id (first occurrence wins) and re-establishes the
    /// sort invariant. Inbound records are accepted as-is otherwise:
    /// the remote copy is authoritative.
    pub fn replace_all(&mut self, records: Vec<Activity>) {
        let mut seen = HashSet::new();
        self.records = records
            .into_iter()
            .filter(|a| seen.insert(a.id.clone()))
            .collect();
        sort_records(&mut self.records);
    }

    /// Reject any same-day record whose range overlaps `range`,
    /// excluding at most one record by id (for updates).
    fn check_conflict(&self, date: &str, range: &TimeRange, exclude_id: Option<&str>) -> Result<()> {
        for existing in &self.records {
            if existing.date != date {
                continue;
            }
            if exclude_id == Some(existing.id.as_str()) {
                continue;
            }
            // Records that arrived with unparseable times cannot conflict.
            let Ok(existing_range) = existing.range() else {
                continue;
            };
            if range.overlaps(&existing_range) {
                return Err(AppError::TimeConflict(format!(
                    "overlaps {}-{} ({}) on {}",
                    existing.start_time, existing.end_time, existing.description, date
                )));
            }
        }
        Ok(())
    }
}

/// Field validation shared by add and update.
///
/// Returns the parsed range so the conflict check does not re-parse.
fn validate_fields(
    date: &str,
    start_time: &str,
    end_time: &str,
    description: &str,
) -> Result<TimeRange> {
    if date.trim().is_empty()
        || start_time.trim().is_empty()
        || end_time.trim().is_empty()
        || description.trim().is_empty()
    {
        return Err(AppError::Validation("all fields are required".to_string()));
    }

    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date {:?}, expected YYYY-MM-DD", date)))?;

    TimeRange::parse(start_time, end_time)
}

/// Sort ascending by `(date, start)`.
///
/// Start times that fail to parse sort after valid ones on the same day;
/// the sort is stable so equal keys keep their relative order.
fn sort_records(records: &mut [Activity]) {
    records.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| sort_minutes(a).cmp(&sort_minutes(b)))
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
}

fn sort_minutes(activity: &Activity) -> u16 {
    parse_clock(&activity.start_time).unwrap_or(u16::MAX)
}

/// Group records by date, preserving the ascending store order within
/// each group; group order follows the first occurrence of each date.
pub fn group_by_date(records: &[Activity]) -> Vec<(String, Vec<Activity>)> {
    let mut groups: Vec<(String, Vec<Activity>)> = Vec::new();
    for activity in records {
        match groups.iter_mut().find(|(date, _)| *date == activity.date) {
            Some((_, group)) => group.push(activity.clone()),
            None => groups.push((activity.date.clone(), vec![activity.clone()])),
        }
    }
    groups
}

/// Keep only records matching the filter; `DateFilter::All` is the
/// identity.
pub fn filter_by_date(records: &[Activity], filter: &DateFilter) -> Vec<Activity> {
    match filter {
        DateFilter::All => records.to_vec(),
        DateFilter::Date(date) => records
            .iter()
            .filter(|a| a.date == *date)
            .cloned()
            .collect(),
    }
}

/// Ascending sorted distinct dates present in the records.
pub fn unique_dates(records: &[Activity]) -> Vec<String> {
    let mut dates: Vec<String> = records.iter().map(|a| a.date.clone()).collect();
    dates.sort();
    dates.dedup();
    dates
}
