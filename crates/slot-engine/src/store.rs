//! Reservation storage.
//!
//! The store owns the authoritative timeline of each resource. The resolver
//! reads a snapshot and proposes a range; only [`ReservationStore::commit`]
//! decides whether that range is actually taken. Two callers that resolved
//! against the same snapshot will propose the same slot, and the store must
//! let exactly one of them through.
//!
//! [`InMemoryReservationStore`] is the reference implementation: it performs
//! the overlap check and the insert under a single write lock.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::conflict::find_conflicts;
use crate::error::StoreError;
use crate::reservation::{NewReservation, Reservation, ReservationId, ResourceId};
use crate::resolver::overlapping;

/// Read and write access to confirmed reservations.
pub trait ReservationStore: Send + Sync {
    /// Snapshot of the reservations currently held for `resource`.
    ///
    /// An unknown resource has no reservations.
    fn reservations(&self, resource: &ResourceId) -> Result<Vec<Reservation>, StoreError>;

    /// Commit a reservation.
    ///
    /// Must fail with [`StoreError::Conflict`], without side effects, if the
    /// range overlaps any reservation already held for the same resource. The
    /// check and the write are atomic with respect to other commits.
    fn commit(&self, reservation: NewReservation) -> Result<Reservation, StoreError>;

    /// Remove a reservation, returning it.
    fn cancel(&self, resource: &ResourceId, id: ReservationId)
        -> Result<Reservation, StoreError>;
}

/// Process-local store, one sorted reservation list per resource.
#[derive(Debug, Default)]
pub struct InMemoryReservationStore {
    timelines: RwLock<HashMap<ResourceId, Vec<Reservation>>>,
    next_id: AtomicU64,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from existing reservations.
    ///
    /// Reservations without an id get a fresh one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if two reservations carry the same
    /// id, and [`StoreError::Conflict`] naming the earlier reservation of the
    /// first overlapping pair. A seeded store holds disjoint timelines only.
    pub fn with_reservations(
        reservations: impl IntoIterator<Item = Reservation>,
    ) -> Result<Self, StoreError> {
        let store = Self::new();
        let mut seeded: Vec<Reservation> = reservations.into_iter().collect();

        let mut seen = HashSet::new();
        let duplicate = seeded
            .iter()
            .find_map(|r| r.id.filter(|id| !seen.insert(*id)).map(|id| (r, id)));
        if let Some((r, id)) = duplicate {
            return Err(StoreError::DuplicateId {
                resource: r.resource_id.clone(),
                id,
            });
        }

        // Keep generated ids clear of ids that came with the seed.
        let max_seeded = seeded.iter().filter_map(|r| r.id).map(|id| id.0).max();
        if let Some(max) = max_seeded {
            store.next_id.store(max.saturating_add(1), Ordering::Relaxed);
        }
        for r in &mut seeded {
            if r.id.is_none() {
                r.id = Some(store.allocate_id());
            }
        }

        if let Some(conflict) = find_conflicts(&seeded).into_iter().next() {
            return Err(StoreError::Conflict {
                resource: conflict.resource_id,
                existing: conflict.first.id.unwrap_or(ReservationId(0)),
            });
        }

        {
            let mut timelines = store.write()?;
            for r in seeded {
                insert_sorted(timelines.entry(r.resource_id.clone()).or_default(), r);
            }
        }
        Ok(store)
    }

    /// Number of reservations held across all resources.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.values().map(Vec::len).sum())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn allocate_id(&self) -> ReservationId {
        ReservationId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<ResourceId, Vec<Reservation>>>, StoreError> {
        self.timelines
            .read()
            .map_err(|_| StoreError::Unavailable("reservation lock poisoned".to_string()))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<ResourceId, Vec<Reservation>>>, StoreError> {
        self.timelines
            .write()
            .map_err(|_| StoreError::Unavailable("reservation lock poisoned".to_string()))
    }
}

impl ReservationStore for InMemoryReservationStore {
    fn reservations(&self, resource: &ResourceId) -> Result<Vec<Reservation>, StoreError> {
        Ok(self.read()?.get(resource).cloned().unwrap_or_default())
    }

    fn commit(&self, reservation: NewReservation) -> Result<Reservation, StoreError> {
        let mut timelines = self.write()?;
        let timeline = timelines.entry(reservation.resource_id.clone()).or_default();

        if let Some(existing) = overlapping(&*timeline, &reservation.range).next() {
            let existing = existing.id.unwrap_or(ReservationId(0));
            warn!(
                resource = %reservation.resource_id,
                range = %reservation.range,
                %existing,
                "rejecting overlapping reservation"
            );
            return Err(StoreError::Conflict {
                resource: reservation.resource_id,
                existing,
            });
        }

        let committed = Reservation {
            id: Some(self.allocate_id()),
            resource_id: reservation.resource_id,
            range: reservation.range,
            label: reservation.label,
        };
        debug!(
            resource = %committed.resource_id,
            range = %committed.range,
            "reservation committed"
        );
        insert_sorted(timeline, committed.clone());
        Ok(committed)
    }

    fn cancel(
        &self,
        resource: &ResourceId,
        id: ReservationId,
    ) -> Result<Reservation, StoreError> {
        let mut timelines = self.write()?;
        let not_found = || StoreError::NotFound {
            resource: resource.clone(),
            id,
        };
        let timeline = timelines.get_mut(resource).ok_or_else(not_found)?;
        let pos = timeline
            .iter()
            .position(|r| r.id == Some(id))
            .ok_or_else(not_found)?;
        let removed = timeline.remove(pos);
        debug!(%resource, %id, "reservation cancelled");
        Ok(removed)
    }
}

/// Insert keeping the timeline ordered by start date.
fn insert_sorted(timeline: &mut Vec<Reservation>, reservation: Reservation) {
    let pos = timeline.partition_point(|r| r.start() <= reservation.start());
    timeline.insert(pos, reservation);
}

// ── Tests ───────────────────────────────────────────────────────────────────
