//! Search request and normalized constraint models

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::interval::{AvailabilitySlot, TimeInterval};

/// Weekday index for Sunday (weekdays run 0=Sun .. 6=Sat)
pub const SUNDAY: u32 = 0;
/// Weekday index for Saturday
pub const SATURDAY: u32 = 6;

/// Working-hours defaults applied when the caller gives no explicit bounds
pub const DEFAULT_START_HOUR: u32 = 9;
pub const DEFAULT_END_HOUR: u32 = 18;

/// Coarse time-of-day preference used when no explicit start hour is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePreference {
    Morning,
    Afternoon,
    Evening,
}

impl TimePreference {
    /// Returns the start hour implied by this preference
    pub fn start_hour(&self) -> u32 {
        match self {
            Self::Morning => 9,
            Self::Afternoon => 13,
            Self::Evening => 17,
        }
    }
}

/// Independent caps for the scan: how many slots come back, and how many
/// candidates get evaluated before giving up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanLimits {
    pub max_results: usize,
    pub max_exploration: u32,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self { max_results: 5, max_exploration: 10 }
    }
}

/// Raw availability request as supplied by the caller
///
/// Everything optional is resolved to a concrete value during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSearchRequest {
    pub duration_minutes: u32,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference: Option<TimePreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before_hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_after_hour: Option<u32>,
    #[serde(default)]
    pub excluded_weekdays: Vec<u32>,
    #[serde(default)]
    pub buffer_before_minutes: u32,
    #[serde(default)]
    pub buffer_after_minutes: u32,
    /// IANA zone name; the engine default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_exploration: Option<u32>,
}

impl SlotSearchRequest {
    /// Create a request with only the required fields set
    pub fn new(duration_minutes: u32, window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Self {
        Self {
            duration_minutes,
            window_start,
            window_end,
            preference: None,
            not_before_hour: None,
            not_after_hour: None,
            excluded_weekdays: Vec::new(),
            buffer_before_minutes: 0,
            buffer_after_minutes: 0,
            timezone: None,
            max_results: None,
            max_exploration: None,
        }
    }

    pub fn with_preference(mut self, preference: TimePreference) -> Self {
        self.preference = Some(preference);
        self
    }

    pub fn with_hours(mut self, not_before: Option<u32>, not_after: Option<u32>) -> Self {
        self.not_before_hour = not_before;
        self.not_after_hour = not_after;
        self
    }

    pub fn with_excluded_weekdays(mut self, weekdays: Vec<u32>) -> Self {
        self.excluded_weekdays = weekdays;
        self
    }

    pub fn with_buffers(mut self, before_minutes: u32, after_minutes: u32) -> Self {
        self.buffer_before_minutes = before_minutes;
        self.buffer_after_minutes = after_minutes;
        self
    }

    pub fn with_timezone(mut self, zone: impl Into<String>) -> Self {
        self.timezone = Some(zone.into());
        self
    }
}

/// Fully-resolved search constraints, immutable once built
///
/// Produced by the normalizer; every field is concrete and the timezone is
/// already parsed, so the scanner never touches raw caller input.
#[derive(Debug, Clone)]
pub struct SearchConstraints {
    pub duration_minutes: u32,
    pub window: TimeInterval,
    pub timezone: Tz,
    pub start_hour: u32,
    pub end_hour: u32,
    pub excluded_weekdays: BTreeSet<u32>,
    pub buffer_before_minutes: u32,
    pub buffer_after_minutes: u32,
    /// Window confined to one calendar date in the search timezone; relaxes
    /// the weekend-exclusion default
    pub single_day_search: bool,
    /// Caller gave an explicit end hour; slot-end pruning is skipped
    pub explicit_end_hour: bool,
    pub limits: ScanLimits,
}

impl SearchConstraints {
    /// Reports contradictory constraints that make the scan trivially empty
    ///
    /// Not an error: the scan still runs (and finds nothing); the diagnosis
    /// lets the caller say "no times match your constraints" instead of
    /// reporting a failure.
    pub fn degeneracy(&self) -> Option<String> {
        if self.start_hour > self.end_hour {
            return Some(format!(
                "start hour {} is after end hour {}",
                self.start_hour, self.end_hour
            ));
        }

        let blocked = |day: u32| {
            self.excluded_weekdays.contains(&day)
                || (!self.single_day_search && (day == SUNDAY || day == SATURDAY))
        };
        if (0..7).all(blocked) {
            return Some("every weekday is excluded".to_string());
        }

        None
    }
}

/// Result of an availability search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub slots: Vec<AvailabilitySlot>,
    /// Set when contradictory constraints made the scan trivially empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degenerate: Option<String>,
}
