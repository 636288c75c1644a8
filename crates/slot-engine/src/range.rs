//! Inclusive calendar-date ranges.
//!
//! Bookings are day-granular: a range `[start, end]` occupies every date from
//! `start` through `end`, both included. A one-night stay on June 1st is the
//! range `[2024-06-01, 2024-06-01]`.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SlotError;

/// An inclusive range of calendar dates with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawRange> for DateRange {
    type Error = SlotError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidRange`] if `end` is before `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use slot_engine::DateRange;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
    /// let range = DateRange::new(d(1), d(5)).unwrap();
    /// assert_eq!(range.days(), 5);
    /// assert!(DateRange::new(d(5), d(1)).is_err());
    /// ```
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SlotError> {
        if start > end {
            return Err(SlotError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The range of `days` consecutive dates beginning at `start`.
    ///
    /// Returns `None` when `days` is zero or the end date falls outside the
    /// calendar chrono can represent.
    pub fn starting_at(start: NaiveDate, days: u32) -> Option<Self> {
        let span = days.checked_sub(1)?;
        let end = start.checked_add_days(Days::new(u64::from(span)))?;
        Some(Self { start, end })
    }

    /// A single-day range.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of dates covered, counting both ends.
    pub fn days(&self) -> u32 {
        // Bounded by the chrono calendar (~262k years), fits in u32.
        (self.end - self.start).num_days() as u32 + 1
    }

    /// Inclusive-bound intersection test.
    ///
    /// Ranges that merely touch (one ends the day before the other starts)
    /// do not overlap.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The first date after this range, or `None` at the end of the calendar.
    pub fn day_after(&self) -> Option<NaiveDate> {
        self.end.succ_opt()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn r(a: (u32, u32), b: (u32, u32)) -> DateRange {
        DateRange::new(d(a.0, a.1), d(b.0, b.1)).unwrap()
    }

    // ── construction tests ──────────────────────────────────────────────

    #[test]
    fn test_new_rejects_inverted_range() {
        let err = DateRange::new(d(6, 5), d(6, 1)).unwrap_err();
        assert!(err.to_string().contains("Invalid range"), "got: {err}");
    }

    #[test]
    fn test_new_accepts_single_day() {
        let range = DateRange::new(d(6, 1), d(6, 1)).unwrap();
        assert_eq!(range, DateRange::single(d(6, 1)));
        assert_eq!(range.days(), 1);
    }

    #[test]
    fn test_starting_at_counts_inclusive_days() {
        let range = DateRange::starting_at(d(6, 1), 5).unwrap();
        assert_eq!(range.start(), d(6, 1));
        assert_eq!(range.end(), d(6, 5));
        assert_eq!(range.days(), 5);
    }

    #[test]
    fn test_starting_at_crosses_month_boundary() {
        let range = DateRange::starting_at(d(6, 29), 4).unwrap();
        assert_eq!(range.end(), d(7, 2));
    }

    #[test]
    fn test_starting_at_zero_days_is_none() {
        assert!(DateRange::starting_at(d(6, 1), 0).is_none());
    }

    #[test]
    fn test_starting_at_calendar_overflow_is_none() {
        assert!(DateRange::starting_at(NaiveDate::MAX, 2).is_none());
        assert!(DateRange::starting_at(NaiveDate::MAX, 1).is_some());
    }

    // ── overlap tests ───────────────────────────────────────────────────

    #[test]
    fn test_overlap_partial() {
        assert!(r((6, 1), (6, 5)).overlaps(&r((6, 4), (6, 8))));
        assert!(r((6, 4), (6, 8)).overlaps(&r((6, 1), (6, 5))));
    }

    #[test]
    fn test_overlap_shared_boundary_day() {
        // Ending and starting on the same day is a collision: both hold that date.
        assert!(r((6, 1), (6, 5)).overlaps(&r((6, 5), (6, 9))));
    }

    #[test]
    fn test_overlap_containment() {
        assert!(r((6, 1), (6, 30)).overlaps(&r((6, 10), (6, 12))));
        assert!(r((6, 10), (6, 12)).overlaps(&r((6, 1), (6, 30))));
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        assert!(!r((6, 1), (6, 5)).overlaps(&r((6, 6), (6, 9))));
        assert!(!r((6, 6), (6, 9)).overlaps(&r((6, 1), (6, 5))));
    }

    #[test]
    fn test_disjoint_ranges_do_not_overlap() {
        assert!(!r((6, 1), (6, 2)).overlaps(&r((7, 1), (7, 2))));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = r((6, 1), (6, 5));
        assert!(range.contains(d(6, 1)));
        assert!(range.contains(d(6, 5)));
        assert!(!range.contains(d(6, 6)));
        assert!(!range.contains(d(5, 31)));
    }

    #[test]
    fn test_day_after() {
        assert_eq!(r((6, 1), (6, 30)).day_after(), Some(d(7, 1)));
        assert_eq!(DateRange::single(NaiveDate::MAX).day_after(), None);
    }

    // ── serde tests ─────────────────────────────────────────────────────

    #[test]
    fn test_deserialize_rejects_inverted_range() {
        let json = r#"{"start":"2024-06-05","end":"2024-06-01"}"#;
        let result: std::result::Result<DateRange, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_uses_iso_dates() {
        let json = serde_json::to_string(&r((6, 1), (6, 5))).unwrap();
        assert_eq!(json, r#"{"start":"2024-06-01","end":"2024-06-05"}"#);
    }

    #[test]
    fn test_display() {
        assert_eq!(r((6, 1), (6, 5)).to_string(), "2024-06-01..=2024-06-05");
    }
}
