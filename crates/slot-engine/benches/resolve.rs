use std::hint::black_box;

use chrono::{Days, NaiveDate};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use slot_engine::{resolve, DateRange, Reservation, SlotRequest};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// `n` back-to-back 3-day bookings with a one-day gap between them, reversed
/// so the scan sees the latest bookings first.
fn fragmented_calendar(n: u64) -> Vec<Reservation> {
    (0..n)
        .rev()
        .map(|i| {
            let first = start() + Days::new(i * 4);
            let range = DateRange::new(first, first + Days::new(2)).unwrap();
            Reservation::new("room-7", range)
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for n in [10u64, 100, 500] {
        let existing = fragmented_calendar(n);

        // One-day gaps never fit two days: the search walks past every booking.
        let request = SlotRequest::new(2, start(), existing.clone());
        group.bench_with_input(BenchmarkId::new("worst_case", n), &request, |b, r| {
            b.iter(|| resolve(black_box(r)))
        });

        let request = SlotRequest::new(1, start(), existing);
        group.bench_with_input(BenchmarkId::new("first_gap", n), &request, |b, r| {
            b.iter(|| resolve(black_box(r)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
