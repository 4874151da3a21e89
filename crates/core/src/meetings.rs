//! Meeting mutation facade: create/update/delete/search against the provider

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, instrument, warn};

use slotwise_domain::{
    CalendarEvent, EventDraft, EventPatch, FieldUpdate, Meeting, MeetingPatch, Result,
    TimeInterval,
};

use crate::ports::CalendarPort;
use crate::wallclock::{local_day_bounds, parse_zone};

/// Default search span when the caller gives no window: `[now, now + 90d)`
const DEFAULT_SEARCH_SPAN_DAYS: i64 = 90;

/// Meeting operations over one calendar
///
/// Mutations propagate failures with their kind; soft lookups (search,
/// last-of-day) degrade to empty results with a logged warning, since absence
/// is a normal outcome there.
pub struct MeetingService {
    calendar: Arc<dyn CalendarPort>,
    calendar_id: String,
}

impl MeetingService {
    /// Create a service bound to one calendar
    pub fn new(calendar: Arc<dyn CalendarPort>, calendar_id: impl Into<String>) -> Self {
        Self { calendar, calendar_id: calendar_id.into() }
    }

    /// Create an event; the end time is derived from the meeting's duration
    #[instrument(skip(self, meeting), fields(calendar_id = %self.calendar_id))]
    pub async fn schedule_meeting(&self, meeting: &Meeting) -> Result<String> {
        meeting.validate()?;
        if let Some(zone) = &meeting.timezone {
            parse_zone(zone)?;
        }

        let draft = EventDraft {
            title: meeting.title.clone(),
            description: meeting.description.clone(),
            start: meeting.start_time,
            end: meeting.end_time(),
            timezone: meeting.timezone.clone(),
            attendees: meeting.attendees.clone(),
        };

        let event_id = self.calendar.insert_event(&self.calendar_id, draft).await?;
        debug!(event_id = %event_id, "meeting scheduled");
        Ok(event_id)
    }

    /// Apply a partial update to an existing event
    ///
    /// End-time arithmetic: a new start and duration together define the new
    /// end; a new duration alone reuses the event's stored start; a new start
    /// alone preserves the stored duration. The stored event is fetched only
    /// when the arithmetic needs it. A new timezone travels on the wire as an
    /// annotation of the start/end bounds, so any patch that sets it must
    /// carry both bounds, resending the stored ones where nothing else
    /// changes them.
    #[instrument(skip(self, patch), fields(calendar_id = %self.calendar_id, event_id))]
    pub async fn update_meeting(&self, event_id: &str, patch: &MeetingPatch) -> Result<()> {
        patch.validate()?;
        if patch.is_empty() {
            debug!("empty patch, nothing to update");
            return Ok(());
        }
        let timezone = patch.timezone.as_set().cloned();
        if let Some(zone) = &timezone {
            parse_zone(zone)?;
        }

        let (start, end) = match (&patch.start_time, &patch.duration_minutes) {
            (FieldUpdate::Set(start), FieldUpdate::Set(duration)) => {
                (Some(*start), Some(*start + Duration::minutes(i64::from(*duration))))
            }
            (FieldUpdate::Set(start), _) => {
                let existing = self.calendar.get_event(&self.calendar_id, event_id).await?;
                let duration = existing.end - existing.start;
                (Some(*start), Some(*start + duration))
            }
            (_, FieldUpdate::Set(duration)) => {
                let existing = self.calendar.get_event(&self.calendar_id, event_id).await?;
                (
                    timezone.as_ref().map(|_| existing.start),
                    Some(existing.start + Duration::minutes(i64::from(*duration))),
                )
            }
            _ if timezone.is_some() => {
                let existing = self.calendar.get_event(&self.calendar_id, event_id).await?;
                (Some(existing.start), Some(existing.end))
            }
            _ => (None, None),
        };

        let event_patch = EventPatch {
            title: patch.title.as_set().cloned(),
            description: patch.description.clone(),
            start,
            end,
            timezone,
            attendees: patch.attendees.clone(),
        };

        self.calendar.patch_event(&self.calendar_id, event_id, event_patch).await?;
        debug!("meeting updated");
        Ok(())
    }

    /// Delete an event; an already-deleted id surfaces `EventNotFound`
    #[instrument(skip(self), fields(calendar_id = %self.calendar_id, event_id))]
    pub async fn delete_meeting(&self, event_id: &str) -> Result<()> {
        self.calendar.delete_event(&self.calendar_id, event_id).await
    }

    /// Free-text search; provider failures degrade to an empty result
    ///
    /// With no window the search spans `[now, now + 90 days)`. Used for soft
    /// lookups where absence is a normal outcome, so nothing here throws for
    /// remote failures.
    #[instrument(skip(self), fields(calendar_id = %self.calendar_id, query))]
    pub async fn search_meetings(
        &self,
        query: &str,
        window: Option<TimeInterval>,
        now: DateTime<Utc>,
    ) -> Vec<CalendarEvent> {
        let window = window.unwrap_or(TimeInterval {
            start: now,
            end: now + Duration::days(DEFAULT_SEARCH_SPAN_DAYS),
        });

        match self.calendar.search_events(&self.calendar_id, query, window).await {
            Ok(events) => events,
            Err(err) => {
                warn!(error = %err, "event search failed, returning no matches");
                Vec::new()
            }
        }
    }

    /// The event with the latest end time on a local calendar date
    ///
    /// The day boundary is computed in the given zone. An empty day and a
    /// provider failure both yield `None`; only a bad zone name is an error.
    #[instrument(skip(self), fields(calendar_id = %self.calendar_id, %date, zone))]
    pub async fn find_last_meeting_of_day(
        &self,
        date: NaiveDate,
        zone: &str,
    ) -> Result<Option<CalendarEvent>> {
        let tz = parse_zone(zone)?;
        let bounds = local_day_bounds(date, tz)?;

        let events = match self.calendar.list_events(&self.calendar_id, bounds).await {
            Ok(events) => events,
            Err(err) => {
                warn!(error = %err, "event listing failed, treating day as empty");
                return Ok(None);
            }
        };

        Ok(events.into_iter().max_by_key(|event| event.end))
    }
}
