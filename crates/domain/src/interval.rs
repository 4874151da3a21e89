//! Half-open time intervals, availability slots, and the busy calendar

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SlotwiseError};

/// Half-open time interval `[start, end)`
///
/// Used both for busy periods and for candidate/free slots. The `start < end`
/// invariant is enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// Create a new interval, enforcing `start < end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(SlotwiseError::InvalidInput(format!(
                "interval start {} must precede end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Interval covering `minutes` starting at `start`
    pub fn starting_at(start: DateTime<Utc>, minutes: u32) -> Result<Self> {
        Self::new(start, start + Duration::minutes(i64::from(minutes)))
    }

    /// Interval length in whole minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Half-open intersection test
    ///
    /// `[s, e)` overlaps `[bs, be)` iff `s < be && e > bs`. Touching
    /// boundaries (`e == bs` or `s == be`) do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// True when `instant` falls inside the interval
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// A free slot emitted by the scanner
///
/// The engine only ever materializes available slots; `available` is always
/// true and exists so the serialized form is self-describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
}

impl AvailabilitySlot {
    /// Create a slot covering `duration_minutes` starting at `start`
    pub fn starting_at(start: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(i64::from(duration_minutes)),
            available: true,
        }
    }
}

/// Busy periods for one search, sorted ascending by start
///
/// Fetched once per search invocation and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusyCalendar {
    periods: Vec<TimeInterval>,
}

impl BusyCalendar {
    /// Build from provider intervals, sorting by start time
    pub fn from_intervals(mut periods: Vec<TimeInterval>) -> Self {
        periods.sort_by_key(|p| p.start);
        Self { periods }
    }

    /// True iff no busy period overlaps the candidate
    pub fn is_free(&self, candidate: &TimeInterval) -> bool {
        !self.periods.iter().any(|busy| candidate.overlaps(busy))
    }

    pub fn periods(&self) -> &[TimeInterval] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
