//! Error types for slot-engine operations.

use thiserror::Error;

use crate::reservation::{ReservationId, ResourceId};

/// Malformed input rejected before any search begins.
///
/// Running out of availability is not an error; see
/// [`SlotResult::NoSlotFound`](crate::SlotResult::NoSlotFound).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Failures reported by a [`ReservationStore`](crate::ReservationStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Reservation conflict on {resource}: overlaps reservation {existing}")]
    Conflict {
        resource: ResourceId,
        existing: ReservationId,
    },

    #[error("Duplicate reservation id on {resource}: {id}")]
    DuplicateId {
        resource: ResourceId,
        id: ReservationId,
    },

    #[error("Reservation not found: {resource}/{id}")]
    NotFound {
        resource: ResourceId,
        id: ReservationId,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
