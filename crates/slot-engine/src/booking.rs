//! Propose-then-commit booking flow.
//!
//! The resolver works on a snapshot, so its proposal can go stale before the
//! commit lands. [`book_earliest`] reads a fresh snapshot, resolves, and
//! commits; when the store rejects the commit with
//! [`StoreError::Conflict`] the whole cycle runs again against a new
//! snapshot, up to [`BookingOptions::max_attempts`] times.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::reservation::{
    NewReservation, Reservation, ResourceId, SearchHorizon, SlotRequest, SlotResult,
};
use crate::resolver::resolve;
use crate::store::ReservationStore;

/// Tuning for [`book_earliest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingOptions {
    /// Resolve-and-commit cycles before giving up on conflicts.
    pub max_attempts: u32,
    pub horizon: SearchHorizon,
    /// Label stored with the committed reservation.
    pub label: Option<String>,
}

impl Default for BookingOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            horizon: SearchHorizon::default(),
            label: None,
        }
    }
}

/// What a booking attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Booked(Reservation),
    /// The resource has no room within the search horizon.
    NoSlotFound,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Booking retries exhausted for {resource} after {attempts} conflicting commits")]
    RetriesExhausted { resource: ResourceId, attempts: u32 },
}

/// Book the earliest free range of `duration` days on `resource`.
///
/// `duration` below one day is treated as one day. At least one attempt is
/// always made, even if `options.max_attempts` is zero.
///
/// # Errors
///
/// Returns [`BookingError::Store`] for store failures other than conflicts,
/// and [`BookingError::RetriesExhausted`] if every attempt lost its commit
/// to a concurrent booking.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use slot_engine::{
///     book_earliest, BookingOptions, BookingOutcome, InMemoryReservationStore, ResourceId,
/// };
///
/// let store = InMemoryReservationStore::new();
/// let june = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
/// let resource = ResourceId::new("artisan-12");
///
/// let first = book_earliest(&store, &resource, 3, june(1), &BookingOptions::default()).unwrap();
/// let second = book_earliest(&store, &resource, 3, june(1), &BookingOptions::default()).unwrap();
///
/// let BookingOutcome::Booked(second) = second else { panic!("expected a booking") };
/// assert!(matches!(first, BookingOutcome::Booked(_)));
/// assert_eq!(second.start(), june(4));
/// ```
pub fn book_earliest<S>(
    store: &S,
    resource: &ResourceId,
    duration: i64,
    earliest_start: NaiveDate,
    options: &BookingOptions,
) -> Result<BookingOutcome, BookingError>
where
    S: ReservationStore + ?Sized,
{
    let attempts = options.max_attempts.max(1);

    for attempt in 1..=attempts {
        let snapshot = store.reservations(resource)?;
        let request =
            SlotRequest::new(duration, earliest_start, snapshot).with_horizon(options.horizon);

        let range = match resolve(&request) {
            SlotResult::Found(range) => range,
            SlotResult::NoSlotFound => {
                debug!(%resource, attempt, "no slot within horizon");
                return Ok(BookingOutcome::NoSlotFound);
            }
        };

        let mut reservation = NewReservation::new(resource.clone(), range);
        if let Some(label) = &options.label {
            reservation = reservation.with_label(label.clone());
        }

        match store.commit(reservation) {
            Ok(committed) => {
                info!(%resource, range = %committed.range, attempt, "booked");
                return Ok(BookingOutcome::Booked(committed));
            }
            Err(StoreError::Conflict { existing, .. }) => {
                warn!(%resource, %range, %existing, attempt, "proposal went stale, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(BookingError::RetriesExhausted {
        resource: resource.clone(),
        attempts,
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
