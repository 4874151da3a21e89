//! Calendar event representations exchanged with the provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::meeting::FieldUpdate;

/// An event as returned by list/search/get operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_link: Option<String>,
    #[serde(default)]
    pub all_day: bool,
}

impl CalendarEvent {
    /// Event length in whole minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A fully-resolved event ready to be inserted into the provider
///
/// The end is already derived from the meeting's duration by the time a draft
/// exists; drafts never carry a duration of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// IANA zone name annotated on the provider event times
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
}

/// Provider-facing partial update: only resolved, changed fields
///
/// Built by the meeting service from a [`crate::meeting::MeetingPatch`] once
/// duration arithmetic has been applied; the adapter serializes `Set` as the
/// value, `Clear` as an explicit null, and omits `Unchanged` fields entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: FieldUpdate<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default)]
    pub attendees: FieldUpdate<Vec<String>>,
}

impl EventPatch {
    /// True when the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_unchanged()
            && self.start.is_none()
            && self.end.is_none()
            && self.timezone.is_none()
            && self.attendees.is_unchanged()
    }
}
