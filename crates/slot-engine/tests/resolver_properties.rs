//! Property tests for the availability resolver.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use slot_engine::{resolve, DateRange, Reservation, SearchHorizon, SlotRequest, SlotResult};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    base() + Days::new(offset)
}

fn reservation(start: u64, len: u64) -> Reservation {
    let range = DateRange::new(day(start), day(start + len - 1)).unwrap();
    Reservation::new("room-7", range)
}

/// Arbitrary reservations, possibly overlapping each other.
fn arb_reservations() -> impl Strategy<Value = Vec<Reservation>> {
    prop::collection::vec((0u64..120, 1u64..15), 0..12).prop_map(|spans| {
        spans
            .into_iter()
            .map(|(start, len)| reservation(start, len))
            .collect()
    })
}

/// Pairwise-disjoint reservations, as a store would hold them, in random order.
fn arb_disjoint_reservations() -> impl Strategy<Value = Vec<Reservation>> {
    prop::collection::vec((0u64..6, 1u64..10), 0..12)
        .prop_map(|spans| {
            let mut cursor = 0u64;
            spans
                .into_iter()
                .map(|(gap, len)| {
                    let start = cursor + gap;
                    cursor = start + len;
                    reservation(start, len)
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

fn collides(existing: &[Reservation], range: &DateRange) -> bool {
    existing.iter().any(|r| r.range.overlaps(range))
}

/// Earliest valid start by walking every date from `earliest`.
fn brute_force_earliest(existing: &[Reservation], duration: u32, earliest: NaiveDate) -> NaiveDate {
    let mut start = earliest;
    loop {
        let candidate = DateRange::starting_at(start, duration).unwrap();
        if !collides(existing, &candidate) {
            return start;
        }
        start = start.succ_opt().unwrap();
    }
}

proptest! {
    #[test]
    fn prop_result_never_overlaps(
        existing in arb_reservations(),
        duration in 1i64..20,
        earliest in 0u64..140,
    ) {
        let request = SlotRequest::new(duration, day(earliest), existing.clone());
        let range = resolve(&request).range().expect("default horizon always finds a slot");
        prop_assert!(!collides(&existing, &range), "{range} collides");
    }

    #[test]
    fn prop_result_honors_duration_and_earliest_start(
        existing in arb_reservations(),
        duration in 1i64..20,
        earliest in 0u64..140,
    ) {
        let request = SlotRequest::new(duration, day(earliest), existing);
        let range = resolve(&request).range().unwrap();
        prop_assert!(range.start() >= day(earliest));
        prop_assert_eq!(i64::from(range.days()), duration);
    }

    #[test]
    fn prop_result_is_earliest_fit(
        existing in arb_reservations(),
        duration in 1i64..20,
        earliest in 0u64..140,
    ) {
        let request = SlotRequest::new(duration, day(earliest), existing.clone());
        let range = resolve(&request).range().unwrap();
        let expected = brute_force_earliest(&existing, request.duration(), day(earliest));
        prop_assert_eq!(range.start(), expected);
    }

    #[test]
    fn prop_order_independent(
        (existing, shuffled, max_advances) in arb_reservations().prop_flat_map(|v| {
            let len = v.len();
            (Just(v.clone()), Just(v).prop_shuffle(), 0..=len + 1)
        }),
        duration in 1i64..20,
        earliest in 0u64..140,
    ) {
        let horizon = SearchHorizon::default().with_max_advances(max_advances);
        let a = resolve(&SlotRequest::new(duration, day(earliest), existing).with_horizon(horizon));
        let b = resolve(&SlotRequest::new(duration, day(earliest), shuffled).with_horizon(horizon));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_order_independent_with_latest_start(
        (existing, shuffled, max_advances) in arb_reservations().prop_flat_map(|v| {
            let len = v.len();
            (Just(v.clone()), Just(v).prop_shuffle(), 0..=len)
        }),
        duration in 1i64..20,
        earliest in 0u64..140,
        window in 0u64..60,
    ) {
        let horizon = SearchHorizon::default()
            .with_max_advances(max_advances)
            .with_latest_start(day(earliest + window));
        let a = resolve(&SlotRequest::new(duration, day(earliest), existing).with_horizon(horizon));
        let b = resolve(&SlotRequest::new(duration, day(earliest), shuffled).with_horizon(horizon));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_idempotent(
        existing in arb_disjoint_reservations(),
        duration in 1i64..20,
        earliest in 0u64..140,
    ) {
        let request = SlotRequest::new(duration, day(earliest), existing);
        prop_assert_eq!(resolve(&request), resolve(&request));
    }

    #[test]
    fn prop_reservation_ending_day_before_never_blocks(
        start in 0u64..60,
        len in 1u64..30,
        duration in 1i64..20,
    ) {
        let blocker = reservation(start, len);
        let next_day = blocker.end().succ_opt().unwrap();
        let result = resolve(&SlotRequest::new(duration, next_day, vec![blocker]));
        prop_assert_eq!(result.range().map(|r| r.start()), Some(next_day));
    }

    #[test]
    fn prop_non_positive_duration_is_single_day(
        existing in arb_disjoint_reservations(),
        duration in -100i64..=0,
        earliest in 0u64..140,
    ) {
        let range = resolve(&SlotRequest::new(duration, day(earliest), existing))
            .range()
            .unwrap();
        prop_assert_eq!(range.days(), 1);
    }

    #[test]
    fn prop_disjoint_input_needs_at_most_len_advances(
        existing in arb_disjoint_reservations(),
        duration in 1i64..20,
        earliest in 0u64..140,
    ) {
        let budget = existing.len();
        let unbounded = resolve(&SlotRequest::new(duration, day(earliest), existing.clone()));
        let bounded = resolve(
            &SlotRequest::new(duration, day(earliest), existing)
                .with_horizon(SearchHorizon::default().with_max_advances(budget)),
        );
        prop_assert_eq!(unbounded, bounded);
    }

    #[test]
    fn prop_latest_start_is_respected(
        existing in arb_disjoint_reservations(),
        duration in 1i64..20,
        earliest in 0u64..60,
        window in 0u64..30,
    ) {
        let latest = day(earliest + window);
        let request = SlotRequest::new(duration, day(earliest), existing)
            .with_horizon(SearchHorizon::default().with_latest_start(latest));
        match resolve(&request) {
            SlotResult::Found(range) => prop_assert!(range.start() <= latest),
            SlotResult::NoSlotFound => {
                let unbounded = resolve(&request.clone().with_horizon(SearchHorizon::default()));
                prop_assert!(unbounded.range().unwrap().start() > latest);
            }
        }
    }
}
