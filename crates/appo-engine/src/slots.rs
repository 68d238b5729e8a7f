//! Time slots and per-date availability records.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// True for zero-length or inverted slots.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Two slots overlap iff `a.start < b.end && b.start < a.end`.
    /// Slots that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Computed availability for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlots {
    /// The local calendar date this record covers.
    pub date: NaiveDate,
    /// Free intervals. Not consulted when `is_all_day` is set.
    pub slots: Vec<TimeSlot>,
    /// The whole day is available.
    pub is_all_day: bool,
}

impl DaySlots {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            slots: Vec::new(),
            is_all_day: false,
        }
    }

    /// Whether this day contributes a line to the report.
    pub fn has_availability(&self) -> bool {
        self.is_all_day || self.slots.iter().any(|slot| !slot.is_empty())
    }
}

/// Day records keyed by local calendar date, iterated in ascending date order.
pub type DayMap = BTreeMap<NaiveDate, DaySlots>;
