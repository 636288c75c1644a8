//! Calendar-date inputs for slot requests.
//!
//! Booking forms hand over either an explicit date or something relative to
//! "today". Which day is today depends on where the caller is, so every
//! function here takes an explicit anchor instant and an IANA timezone
//! instead of reading the system clock.
//!
//! # Functions
//!
//! - [`parse_date`] — Strict ISO 8601 `YYYY-MM-DD` parsing
//! - [`today_in`] — The local calendar date of an instant in a timezone
//! - [`resolve_start`] — Resolve `"today"`, `"tomorrow"`, `"+3d"`, or a date

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};

/// Parse a strict ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns [`SlotError::InvalidRequest`] if the input is not a valid calendar
/// date, such as `"2024-02-30"` or `"June 1st"`.
///
/// # Examples
///
/// ```
/// use slot_engine::temporal::parse_date;
///
/// let date = parse_date("2024-06-01").unwrap();
/// assert_eq!(date.to_string(), "2024-06-01");
/// assert!(parse_date("2024-02-30").is_err());
/// ```
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|e| SlotError::InvalidRequest(format!("invalid date '{}': {}", trimmed, e)))
}

/// The calendar date at `anchor` as seen from `timezone`.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTimezone`] if `timezone` is not a valid IANA
/// timezone name.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use slot_engine::temporal::today_in;
///
/// // 23:30 UTC on May 31 is already June 1 in Tokyo.
/// let anchor = Utc.with_ymd_and_hms(2024, 5, 31, 23, 30, 0).unwrap();
/// assert_eq!(today_in(anchor, "UTC").unwrap().to_string(), "2024-05-31");
/// assert_eq!(today_in(anchor, "Asia/Tokyo").unwrap().to_string(), "2024-06-01");
/// ```
pub fn today_in(anchor: DateTime<Utc>, timezone: &str) -> Result<NaiveDate> {
    let tz = parse_timezone(timezone)?;
    Ok(anchor.with_timezone(&tz).date_naive())
}

/// Resolve an earliest-start expression to a local calendar date.
///
/// # Supported Expressions
///
/// - `"today"`, `"tomorrow"` — relative to [`today_in`]
/// - `"+Nd"` / `"+Nw"` — N days or weeks after today
/// - Any ISO 8601 date (`"2024-06-01"`)
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTimezone`] for an unknown timezone and
/// [`SlotError::InvalidRequest`] for anything that is not one of the forms
/// above. Nothing is guessed.
pub fn resolve_start(
    expression: &str,
    anchor: DateTime<Utc>,
    timezone: &str,
) -> Result<NaiveDate> {
    let today = today_in(anchor, timezone)?;
    let normalized = expression.trim().to_lowercase();

    match normalized.as_str() {
        "" | "today" => return Ok(today),
        "tomorrow" => return add_days(today, 1, expression),
        _ => {}
    }

    if let Some(offset) = normalized.strip_prefix('+') {
        let days = parse_day_offset(offset).ok_or_else(|| {
            SlotError::InvalidRequest(format!(
                "cannot parse start offset: '{}'",
                expression.trim()
            ))
        })?;
        return add_days(today, days, expression);
    }

    parse_date(&normalized)
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Parse an IANA timezone string into `Tz`.
fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| SlotError::InvalidTimezone(format!("'{}'", s)))
}

/// Parse `"3d"` or `"2w"` into a day count.
fn parse_day_offset(s: &str) -> Option<u64> {
    let unit = s.chars().last()?;
    let digits = &s[..s.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u64 = digits.parse().ok()?;
    match unit {
        'd' => Some(n),
        'w' => n.checked_mul(7),
        _ => None,
    }
}

fn add_days(date: NaiveDate, days: u64, expression: &str) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days)).ok_or_else(|| {
        SlotError::InvalidRequest(format!(
            "start offset out of range: '{}'",
            expression.trim()
        ))
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
