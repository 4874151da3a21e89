//! Wire DTOs for the Google Calendar REST API
//!
//! Mirrors the provider's JSON shapes; conversions into domain types live
//! beside the DTOs so the client stays a thin request/response layer.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use slotwise_core::wallclock::{local_day_bounds, parse_zone};
use slotwise_domain::{CalendarEvent, Result, SlotwiseError, TimeInterval};

/* -------------------------------------------------------------------------- */
/* free/busy */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
pub struct FreeBusyRequest {
    #[serde(rename = "timeMin")]
    pub time_min: String,
    #[serde(rename = "timeMax")]
    pub time_max: String,
    pub items: Vec<FreeBusyItem>,
}

#[derive(Debug, Serialize)]
pub struct FreeBusyItem {
    pub id: String,
}

impl FreeBusyRequest {
    pub fn for_calendar(calendar_id: &str, window: TimeInterval) -> Self {
        Self {
            time_min: window.start.to_rfc3339(),
            time_max: window.end.to_rfc3339(),
            items: vec![FreeBusyItem { id: calendar_id.to_string() }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FreeBusyResponse {
    #[serde(default)]
    pub calendars: std::collections::HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
pub struct FreeBusyCalendar {
    #[serde(default)]
    pub busy: Vec<BusyWindow>,
}

#[derive(Debug, Deserialize)]
pub struct BusyWindow {
    pub start: String,
    pub end: String,
}

impl FreeBusyResponse {
    /// Busy intervals for one calendar, sanitized
    ///
    /// Windows that fail to parse or that violate `start < end` are dropped
    /// with a warning rather than poisoning the scan.
    pub fn busy_intervals(&self, calendar_id: &str) -> Vec<TimeInterval> {
        let Some(calendar) = self.calendars.get(calendar_id) else {
            return Vec::new();
        };

        calendar
            .busy
            .iter()
            .filter_map(|window| {
                let start = parse_timestamp(&window.start);
                let end = parse_timestamp(&window.end);
                match (start, end) {
                    (Ok(start), Ok(end)) => match TimeInterval::new(start, end) {
                        Ok(interval) => Some(interval),
                        Err(_) => {
                            warn!(
                                start = %window.start,
                                end = %window.end,
                                "dropping inverted busy window"
                            );
                            None
                        }
                    },
                    _ => {
                        warn!(
                            start = %window.start,
                            end = %window.end,
                            "dropping unparseable busy window"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

/* -------------------------------------------------------------------------- */
/* events */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub struct EventsListResponse {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(rename = "hangoutLink")]
    pub hangout_link: Option<String>,
    pub attendees: Option<Vec<GoogleAttendee>>,
}

/// `dateTime` for timed events, `date` for all-day events
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn timed(instant: DateTime<Utc>, zone: Option<&str>) -> Self {
        Self {
            date_time: Some(instant.to_rfc3339()),
            date: None,
            time_zone: zone.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GoogleAttendee {
    pub email: String,
}

impl GoogleEvent {
    /// Convert into the domain event
    ///
    /// All-day events carry date-only bounds; those map to local-midnight
    /// instants in the event's zone (UTC when the provider names none).
    pub fn into_calendar_event(self) -> Result<CalendarEvent> {
        let all_day = self.start.date.is_some();

        let (start, end) = if all_day {
            let zone = match self.start.time_zone.as_deref() {
                Some(name) => parse_zone(name)?,
                None => chrono_tz::UTC,
            };
            let start = parse_all_day_bound(self.start.date.as_deref(), zone)?.start;
            let end = parse_all_day_bound(self.end.date.as_deref(), zone)?.start;
            (start, end)
        } else {
            let start = required_timestamp(self.start.date_time.as_deref(), &self.id)?;
            let end = required_timestamp(self.end.date_time.as_deref(), &self.id)?;
            (start, end)
        };

        let title = self
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "(untitled)".to_string());
        let attendees = self
            .attendees
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.email)
            .filter(|email| !email.trim().is_empty())
            .collect();

        Ok(CalendarEvent {
            id: self.id,
            title,
            description: self.description,
            start,
            end,
            attendees,
            conference_link: self.hangout_link,
            all_day,
        })
    }
}

/* -------------------------------------------------------------------------- */
/* insert / patch payloads */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
pub struct InsertEventRequest {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<GoogleAttendee>,
    #[serde(rename = "conferenceData")]
    pub conference_data: ConferenceData,
}

#[derive(Debug, Serialize)]
pub struct ConferenceData {
    #[serde(rename = "createRequest")]
    pub create_request: ConferenceCreateRequest,
}

#[derive(Debug, Serialize)]
pub struct ConferenceCreateRequest {
    #[serde(rename = "requestId")]
    pub request_id: String,
}

#[derive(Debug, Deserialize)]
pub struct InsertEventResponse {
    pub id: String,
}

/* -------------------------------------------------------------------------- */
/* timestamp parsing */
/* -------------------------------------------------------------------------- */

/// Parse a provider timestamp; values without an explicit offset are treated
/// as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    Err(SlotwiseError::Provider(format!("unparseable provider timestamp: {value}")))
}

fn required_timestamp(value: Option<&str>, event_id: &str) -> Result<DateTime<Utc>> {
    let value = value.ok_or_else(|| {
        SlotwiseError::Provider(format!("event {event_id} is missing a dateTime bound"))
    })?;
    parse_timestamp(value)
}

fn parse_all_day_bound(value: Option<&str>, zone: chrono_tz::Tz) -> Result<TimeInterval> {
    let value = value
        .ok_or_else(|| SlotwiseError::Provider("all-day event is missing a date bound".into()))?;
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| SlotwiseError::Provider(format!("unparseable provider date: {value}")))?;
    local_day_bounds(date, zone)
}
