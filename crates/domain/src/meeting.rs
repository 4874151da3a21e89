//! Meeting input and partial-update models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SlotwiseError};

/// Meeting input for the mutation facade
///
/// The end time is always derived as `start_time + duration_minutes`, never
/// stored independently, so the two can not drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub attendees: Vec<String>,
    /// IANA zone name annotated on the provider event; engine default applies
    /// when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Meeting {
    /// Create a meeting with only the required fields set
    pub fn new(title: impl Into<String>, start_time: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            title: title.into(),
            description: None,
            start_time,
            duration_minutes,
            attendees: Vec::new(),
            timezone: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_attendees(mut self, attendees: Vec<String>) -> Self {
        self.attendees = attendees;
        self
    }

    pub fn with_timezone(mut self, zone: impl Into<String>) -> Self {
        self.timezone = Some(zone.into());
        self
    }

    /// Derived end time: `start_time + duration_minutes`
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Checks the fields a provider insert requires
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(SlotwiseError::InvalidInput("meeting title must not be empty".into()));
        }
        if self.duration_minutes == 0 {
            return Err(SlotwiseError::InvalidInput(
                "meeting duration must be at least one minute".into(),
            ));
        }
        Ok(())
    }
}

/// Tagged presence for one field of a partial update
///
/// Distinguishes "leave unchanged" from "clear this field", which an
/// `Option`-only encoding conflates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "lowercase")]
pub enum FieldUpdate<T> {
    #[default]
    Unchanged,
    Clear,
    Set(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }

    /// The new value, when one is being set
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }
}

/// Partial update for an existing meeting
///
/// `Clear` is only valid for optional fields (description, attendees);
/// clearing a required field is rejected during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingPatch {
    #[serde(default)]
    pub title: FieldUpdate<String>,
    #[serde(default)]
    pub description: FieldUpdate<String>,
    #[serde(default)]
    pub start_time: FieldUpdate<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: FieldUpdate<u32>,
    #[serde(default)]
    pub attendees: FieldUpdate<Vec<String>>,
    #[serde(default)]
    pub timezone: FieldUpdate<String>,
}

impl MeetingPatch {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = FieldUpdate::Set(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = FieldUpdate::Set(description.into());
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = FieldUpdate::Clear;
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = FieldUpdate::Set(start_time);
        self
    }

    pub fn with_duration(mut self, duration_minutes: u32) -> Self {
        self.duration_minutes = FieldUpdate::Set(duration_minutes);
        self
    }

    pub fn with_attendees(mut self, attendees: Vec<String>) -> Self {
        self.attendees = FieldUpdate::Set(attendees);
        self
    }

    pub fn clear_attendees(mut self) -> Self {
        self.attendees = FieldUpdate::Clear;
        self
    }

    pub fn with_timezone(mut self, zone: impl Into<String>) -> Self {
        self.timezone = FieldUpdate::Set(zone.into());
        self
    }

    /// True when no field changes
    pub fn is_empty(&self) -> bool {
        self.title.is_unchanged()
            && self.description.is_unchanged()
            && self.start_time.is_unchanged()
            && self.duration_minutes.is_unchanged()
            && self.attendees.is_unchanged()
            && self.timezone.is_unchanged()
    }

    /// Rejects clearing required fields and zero durations
    pub fn validate(&self) -> Result<()> {
        if self.title.is_clear() {
            return Err(SlotwiseError::InvalidInput("meeting title can not be cleared".into()));
        }
        if self.start_time.is_clear() {
            return Err(SlotwiseError::InvalidInput("meeting start time can not be cleared".into()));
        }
        if self.duration_minutes.is_clear() {
            return Err(SlotwiseError::InvalidInput("meeting duration can not be cleared".into()));
        }
        if self.timezone.is_clear() {
            return Err(SlotwiseError::InvalidInput("meeting timezone can not be cleared".into()));
        }
        if let FieldUpdate::Set(title) = &self.title {
            if title.trim().is_empty() {
                return Err(SlotwiseError::InvalidInput("meeting title must not be empty".into()));
            }
        }
        if let FieldUpdate::Set(0) = self.duration_minutes {
            return Err(SlotwiseError::InvalidInput(
                "meeting duration must be at least one minute".into(),
            ));
        }
        Ok(())
    }
}
