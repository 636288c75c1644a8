//! Detect overlapping reservations.
//!
//! The resolver assumes the reservations it is handed are pairwise disjoint
//! per resource. This module checks that assumption for data coming from
//! files or seeds, where nothing enforced it at write time.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::reservation::{Reservation, ResourceId};

/// Two reservations on the same resource that share at least one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub resource_id: ResourceId,
    pub first: Reservation,
    pub second: Reservation,
    /// Number of dates both reservations hold.
    pub overlap_days: u32,
}

/// Find every overlapping pair of reservations, grouped by resource.
///
/// Within each resource the reservations are sorted by start date and swept
/// once; a pair is reported with the earlier-starting reservation first.
/// Output is ordered by resource id, then by the first reservation's start.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use slot_engine::{find_conflicts, DateRange, Reservation};
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
/// let reservations = vec![
///     Reservation::new("room-7", DateRange::new(d(1), d(5)).unwrap()),
///     Reservation::new("room-7", DateRange::new(d(5), d(8)).unwrap()),
///     Reservation::new("room-9", DateRange::new(d(1), d(8)).unwrap()),
/// ];
/// let conflicts = find_conflicts(&reservations);
/// assert_eq!(conflicts.len(), 1);
/// assert_eq!(conflicts[0].overlap_days, 1);
/// ```
pub fn find_conflicts(reservations: &[Reservation]) -> Vec<Conflict> {
    let mut by_resource: BTreeMap<&ResourceId, Vec<&Reservation>> = BTreeMap::new();
    for r in reservations {
        by_resource.entry(&r.resource_id).or_default().push(r);
    }

    let mut conflicts = Vec::new();
    for (resource_id, mut group) in by_resource {
        group.sort_by_key(|r| (r.start(), r.end()));

        for (i, a) in group.iter().enumerate() {
            // Sorted by start: once b starts after a ends, no later b overlaps a.
            for b in group[i + 1..].iter().take_while(|b| b.start() <= a.end()) {
                conflicts.push(Conflict {
                    resource_id: resource_id.clone(),
                    first: (*a).clone(),
                    second: (*b).clone(),
                    overlap_days: overlap_days(a, b),
                });
            }
        }
    }

    conflicts
}

fn overlap_days(a: &Reservation, b: &Reservation) -> u32 {
    let start = a.start().max(b.start());
    let end = a.end().min(b.end());
    (end - start).num_days() as u32 + 1
}

// ── Tests ───────────────────────────────────────────────────────────────────
