// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{NaiveDate, SecondsFormat, Utc};

/// Current UTC time as RFC3339 using a `Z` suffix (document stamps).
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Long-form display label for an ISO date,
/// e.g. "Wednesday, January 10, 2024".
///
/// Unparseable input is echoed back unchanged; a garbled date from an
/// old document should not break a view or an export.
pub fn format_date_label(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%A, %B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}
