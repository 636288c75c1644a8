//! Reservations, slot requests, and slot results.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SlotError;
use crate::range::DateRange;

// ── Identifiers ─────────────────────────────────────────────────────────────

/// Opaque identifier of a bookable entity (artisan, room, vehicle, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Store-assigned identifier of a committed reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub u64);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── Reservation ─────────────────────────────────────────────────────────────

/// A confirmed commitment of a resource over an inclusive date range.
///
/// Reservations read from a file may not carry an id yet; the store assigns
/// one on commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawReservation", into = "RawReservation")]
pub struct Reservation {
    pub id: Option<ReservationId>,
    pub resource_id: ResourceId,
    pub range: DateRange,
    pub label: Option<String>,
}

/// Wire shape: flat `start`/`end` next to the resource id.
#[derive(Serialize, Deserialize)]
struct RawReservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<ReservationId>,
    resource_id: ResourceId,
    start: NaiveDate,
    end: NaiveDate,
    #[serde(default)]
    label: Option<String>,
}

impl TryFrom<RawReservation> for Reservation {
    type Error = SlotError;

    fn try_from(raw: RawReservation) -> Result<Self, Self::Error> {
        Ok(Reservation {
            id: raw.id,
            resource_id: raw.resource_id,
            range: DateRange::new(raw.start, raw.end)?,
            label: raw.label,
        })
    }
}

impl From<Reservation> for RawReservation {
    fn from(r: Reservation) -> Self {
        RawReservation {
            id: r.id,
            resource_id: r.resource_id,
            start: r.range.start(),
            end: r.range.end(),
            label: r.label,
        }
    }
}

impl Reservation {
    pub fn new(resource_id: impl Into<ResourceId>, range: DateRange) -> Self {
        Self {
            id: None,
            resource_id: resource_id.into(),
            range,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn start(&self) -> NaiveDate {
        self.range.start()
    }

    pub fn end(&self) -> NaiveDate {
        self.range.end()
    }
}

/// Parse a JSON array of reservations.
///
/// # Errors
///
/// Returns [`SlotError::InvalidRequest`] if the document is not an array of
/// reservations or any reservation ends before it starts.
///
/// # Examples
///
/// ```
/// use slot_engine::reservation::reservations_from_json;
///
/// let json = r#"[{"resource_id": "room-7", "start": "2024-06-01", "end": "2024-06-05"}]"#;
/// let reservations = reservations_from_json(json).unwrap();
/// assert_eq!(reservations[0].range.days(), 5);
/// ```
pub fn reservations_from_json(json: &str) -> Result<Vec<Reservation>, SlotError> {
    serde_json::from_str(json)
        .map_err(|e| SlotError::InvalidRequest(format!("reservations JSON: {e}")))
}

/// A reservation the caller wants the store to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub resource_id: ResourceId,
    pub range: DateRange,
    pub label: Option<String>,
}

impl NewReservation {
    pub fn new(resource_id: impl Into<ResourceId>, range: DateRange) -> Self {
        Self {
            resource_id: resource_id.into(),
            range,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// ── Slot request ────────────────────────────────────────────────────────────

/// Bounds on how far the resolver keeps advancing past conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchHorizon {
    /// Maximum conflict-driven advancement steps. `None` means
    /// `existing.len() + 1`, which is never reached when a slot exists.
    pub max_advances: Option<usize>,
    /// Last acceptable start date, if any.
    pub latest_start: Option<NaiveDate>,
}

impl SearchHorizon {
    pub fn with_max_advances(mut self, steps: usize) -> Self {
        self.max_advances = Some(steps);
        self
    }

    pub fn with_latest_start(mut self, date: NaiveDate) -> Self {
        self.latest_start = Some(date);
        self
    }

    /// The advancement budget for a scan over `existing_len` reservations.
    pub fn advance_limit(&self, existing_len: usize) -> usize {
        self.max_advances
            .unwrap_or_else(|| existing_len.saturating_add(1))
    }
}

/// A one-off query for the earliest free range of a resource.
///
/// Build it fresh for each booking attempt from a current snapshot of the
/// resource's reservations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    duration: u32,
    pub earliest_start: NaiveDate,
    pub existing: Vec<Reservation>,
    pub horizon: SearchHorizon,
}

impl SlotRequest {
    /// Create a request. A `duration` below one day is treated as one day.
    pub fn new(duration: i64, earliest_start: NaiveDate, existing: Vec<Reservation>) -> Self {
        Self {
            duration: normalize_duration(duration),
            earliest_start,
            existing,
            horizon: SearchHorizon::default(),
        }
    }

    pub fn with_horizon(mut self, horizon: SearchHorizon) -> Self {
        self.horizon = horizon;
        self
    }

    /// Requested length in days, always at least 1.
    pub fn duration(&self) -> u32 {
        self.duration
    }
}

/// Clamp a requested day count into `1..=u32::MAX`.
pub(crate) fn normalize_duration(duration: i64) -> u32 {
    u32::try_from(duration.max(1)).unwrap_or(u32::MAX)
}

// ── Slot result ─────────────────────────────────────────────────────────────

/// Outcome of a resolution: a proposed range or a negative answer.
///
/// A proposed range is advisory. It becomes a reservation only once a store
/// commits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotResult {
    Found(DateRange),
    NoSlotFound,
}

impl SlotResult {
    pub fn range(&self) -> Option<DateRange> {
        match self {
            SlotResult::Found(range) => Some(*range),
            SlotResult::NoSlotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SlotResult::Found(_))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
