//! # slot-engine
//!
//! Deterministic booking-slot resolution for reservable resources.
//!
//! Given the confirmed reservations of one resource (an artisan's time, a
//! hotel room, a transit vehicle) and a requested duration in days, the
//! engine proposes the earliest contiguous date range that starts no earlier
//! than a preferred date and overlaps none of the existing reservations.
//!
//! The proposal is advisory. The authoritative check happens when a
//! [`ReservationStore`] commits the reservation, and the [`booking`] flow
//! retries against a fresh snapshot when a concurrent caller wins the race.
//!
//! ## Modules
//!
//! - [`range`] — Inclusive calendar-date ranges and the overlap predicate
//! - [`reservation`] — Reservations, slot requests, search horizons, and results
//! - [`resolver`] — Earliest-fit slot search
//! - [`temporal`] — Date parsing and "today" in the caller's timezone
//! - [`conflict`] — Detect overlapping reservations in a list
//! - [`store`] — Reservation store interface and in-memory implementation
//! - [`booking`] — Propose-then-commit flow with conflict retry
//! - [`error`] — Error types

pub mod booking;
pub mod conflict;
pub mod error;
pub mod range;
pub mod reservation;
pub mod resolver;
pub mod store;
pub mod temporal;

pub use booking::{book_earliest, BookingError, BookingOptions, BookingOutcome};
pub use conflict::{find_conflicts, Conflict};
pub use error::{SlotError, StoreError};
pub use range::DateRange;
pub use reservation::{
    reservations_from_json, NewReservation, Reservation, ReservationId, ResourceId,
    SearchHorizon, SlotRequest, SlotResult,
};
pub use resolver::{overlapping, resolve, resolve_parts};
pub use store::{InMemoryReservationStore, ReservationStore};
pub use temporal::{parse_date, resolve_start, today_in};
