//! Earliest-fit slot resolution.
//!
//! Given a resource's confirmed reservations, find the earliest range of the
//! requested length that starts on or after a preferred date and collides
//! with none of them.
//!
//! # Algorithm
//!
//! The candidate starts at `earliest_start`. Each scan collects every
//! reservation the candidate overlaps and pushes the candidate start to the
//! day after the latest of their ends, then scans again from scratch. A full
//! scan without a collision yields the answer.
//!
//! Every start up to that latest end would still overlap the same
//! reservation, so a push never skips a valid start and the first clean
//! candidate is the unique earliest fit. The sequence of candidates depends
//! only on the set of reservations, never on their order in `existing`, so
//! the number of advancements does not either.
//!
//! Each push moves the start past at least one reservation for good, so a
//! search that finds a slot makes at most `existing.len()` advancements. The
//! [`SearchHorizon`] caps that count and optionally the latest acceptable
//! start.

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::range::DateRange;
use crate::reservation::{normalize_duration, Reservation, SearchHorizon, SlotRequest, SlotResult};

/// Propose the earliest non-overlapping range for `request`.
///
/// Pure: no I/O, no clock reads, `request.existing` is left untouched.
/// Running out of room is reported as [`SlotResult::NoSlotFound`], never as
/// an error.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use slot_engine::{resolve, DateRange, Reservation, SlotRequest, SlotResult};
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
/// let existing = vec![Reservation::new("room-7", DateRange::new(d(1), d(5)).unwrap())];
///
/// let result = resolve(&SlotRequest::new(3, d(1), existing));
/// assert_eq!(result, SlotResult::Found(DateRange::new(d(6), d(8)).unwrap()));
/// ```
pub fn resolve(request: &SlotRequest) -> SlotResult {
    search(
        &request.existing,
        request.duration(),
        request.earliest_start,
        &request.horizon,
    )
}

/// [`resolve`] without building a [`SlotRequest`] first.
///
/// `duration` below one day is treated as one day.
pub fn resolve_parts(
    existing: &[Reservation],
    duration: i64,
    earliest_start: NaiveDate,
    horizon: &SearchHorizon,
) -> SlotResult {
    search(existing, normalize_duration(duration), earliest_start, horizon)
}

/// Reservations in `existing` that collide with `range`.
pub fn overlapping<'a>(
    existing: &'a [Reservation],
    range: &DateRange,
) -> impl Iterator<Item = &'a Reservation> + 'a {
    let range = *range;
    existing.iter().filter(move |r| r.range.overlaps(&range))
}

fn search(
    existing: &[Reservation],
    duration: u32,
    earliest_start: NaiveDate,
    horizon: &SearchHorizon,
) -> SlotResult {
    let limit = horizon.advance_limit(existing.len());
    let mut advances = 0usize;
    let mut start = earliest_start;

    loop {
        if horizon.latest_start.is_some_and(|latest| start > latest) {
            debug!(%start, "candidate start beyond latest acceptable start");
            return SlotResult::NoSlotFound;
        }

        let Some(candidate) = DateRange::starting_at(start, duration) else {
            debug!(%start, duration, "candidate range runs past the calendar");
            return SlotResult::NoSlotFound;
        };

        let blockers = overlapping(existing, &candidate).map(|r| r.range);
        let Some(last_blocker) = blockers.max_by_key(DateRange::end) else {
            trace!(%candidate, advances, "candidate is free");
            return SlotResult::Found(candidate);
        };

        if advances >= limit {
            debug!(limit, "advancement budget exhausted");
            return SlotResult::NoSlotFound;
        }

        let Some(next) = last_blocker.day_after() else {
            return SlotResult::NoSlotFound;
        };
        trace!(%candidate, blocked_by = %last_blocker, %next, "advancing past reservations");
        start = next;
        advances += 1;
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
