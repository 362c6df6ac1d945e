// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Time-of-day range on a single calendar day.

use crate::error::{AppError, Result};

/// Half-open range `[start, end)` in minutes since midnight.
///
/// Immutable once constructed; `start < end` is guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeRange {
    start: u16,
    end: u16,
}

impl TimeRange {
    /// Build a range from two `"HH:MM"` clock strings.
    ///
    /// Fails on malformed input, out-of-range clock values, and
    /// zero-length or inverted ranges.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_clock(start)?;
        let end = parse_clock(end)?;
        if start >= end {
            return Err(AppError::Validation(
                "end time must be after start time".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Start of the range, in minutes since midnight.
    pub fn start(&self) -> u16 {
        self.start
    }

    /// End of the range, in minutes since midnight (exclusive).
    pub fn end(&self) -> u16 {
        self.end
    }

    /// Half-open interval intersection test.
    ///
    /// Touching endpoints (`self.end == other.start`) do not overlap, so
    /// back-to-back activities are allowed.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Parse an `"HH:MM"` clock string into minutes since midnight (0-1439).
pub fn parse_clock(s: &str) -> Result<u16> {
    let invalid = || AppError::Validation(format!("invalid time {:?}, expected HH:MM", s));

    let (hours, minutes) = s.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }

    let hours: u16 = hours.parse().map_err(|_| invalid())?;
    let minutes: u16 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end).expect("valid range")
    }

    #[test]
    fn test_parse_clock_valid() {
        assert_eq!(parse_clock("00:00").unwrap(), 0);
        assert_eq!(parse_clock("09:30").unwrap(), 570);
        assert_eq!(parse_clock("23:59").unwrap(), 1439);
    }

    #[test]
    fn test_parse_clock_rejects_malformed() {
        for s in ["", "9:30", "0930", "09:3", "24:00", "12:60", "ab:cd", "09:30:00"] {
            assert!(
                matches!(parse_clock(s), Err(AppError::Validation(_))),
                "expected {:?} to be rejected",
                s
            );
        }
    }

    #[test]
    fn test_parse_rejects_inverted_and_zero_length() {
        assert!(matches!(
            TimeRange::parse("10:00", "10:00"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            TimeRange::parse("11:00", "10:00"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_overlapping_ranges() {
        let a = range("09:00", "10:00");
        let b = range("09:30", "10:30");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        // Containment counts as overlap
        let inner = range("09:15", "09:45");
        assert!(a.overlaps(&inner));
        assert!(inner.overlaps(&a));
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        let a = range("09:00", "10:00");
        let b = range("10:00", "11:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_disjoint_ranges_do_not_overlap() {
        let a = range("09:00", "10:00");
        let b = range("13:00", "14:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }
}
