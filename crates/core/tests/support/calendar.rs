use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use slotwise_core::ports::CalendarPort;
use slotwise_domain::{
    CalendarEvent, EventDraft, EventPatch, FieldUpdate, Result as DomainResult, SlotwiseError,
    TimeInterval,
};

/// In-memory mock for `CalendarPort`.
///
/// Stores busy periods and events behind a mutex so service tests get
/// deterministic provider behavior, including injected failures.
#[derive(Default, Clone)]
pub struct MockCalendarPort {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    busy: Vec<TimeInterval>,
    events: HashMap<String, CalendarEvent>,
    next_id: u32,
    free_busy_error: Option<SlotwiseError>,
    list_error: Option<SlotwiseError>,
    search_error: Option<SlotwiseError>,
    inserted: Vec<EventDraft>,
    patched: Vec<(String, EventPatch)>,
}

impl MockCalendarPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a busy period returned by free/busy queries.
    pub fn with_busy(self, busy: TimeInterval) -> Self {
        self.inner.lock().unwrap().busy.push(busy);
        self
    }

    /// Seed a stored event.
    pub fn with_event(self, event: CalendarEvent) -> Self {
        self.inner.lock().unwrap().events.insert(event.id.clone(), event);
        self
    }

    /// Make every free/busy query fail with `error`.
    pub fn with_free_busy_error(self, error: SlotwiseError) -> Self {
        self.inner.lock().unwrap().free_busy_error = Some(error);
        self
    }

    /// Make every event listing fail with `error`.
    pub fn with_list_error(self, error: SlotwiseError) -> Self {
        self.inner.lock().unwrap().list_error = Some(error);
        self
    }

    /// Make every event search fail with `error`.
    pub fn with_search_error(self, error: SlotwiseError) -> Self {
        self.inner.lock().unwrap().search_error = Some(error);
        self
    }

    /// Drafts received by `insert_event`, in call order.
    pub fn inserted(&self) -> Vec<EventDraft> {
        self.inner.lock().unwrap().inserted.clone()
    }

    /// Patches received by `patch_event`, in call order.
    pub fn patched(&self) -> Vec<(String, EventPatch)> {
        self.inner.lock().unwrap().patched.clone()
    }

    /// Current stored event by id.
    pub fn event(&self, event_id: &str) -> Option<CalendarEvent> {
        self.inner.lock().unwrap().events.get(event_id).cloned()
    }
}

#[async_trait]
impl CalendarPort for MockCalendarPort {
    async fn query_free_busy(
        &self,
        _calendar_id: &str,
        window: TimeInterval,
    ) -> DomainResult<Vec<TimeInterval>> {
        let inner = self.inner.lock().unwrap();
        if let Some(error) = &inner.free_busy_error {
            return Err(error.clone());
        }
        Ok(inner.busy.iter().filter(|b| b.overlaps(&window)).copied().collect())
    }

    async fn list_events(
        &self,
        _calendar_id: &str,
        window: TimeInterval,
    ) -> DomainResult<Vec<CalendarEvent>> {
        let inner = self.inner.lock().unwrap();
        if let Some(error) = &inner.list_error {
            return Err(error.clone());
        }
        let mut events: Vec<_> = inner
            .events
            .values()
            .filter(|e| e.start < window.end && e.end > window.start)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start);
        Ok(events)
    }

    async fn search_events(
        &self,
        calendar_id: &str,
        query: &str,
        window: TimeInterval,
    ) -> DomainResult<Vec<CalendarEvent>> {
        if let Some(error) = &self.inner.lock().unwrap().search_error {
            return Err(error.clone());
        }
        let needle = query.to_lowercase();
        Ok(self
            .list_events(calendar_id, window)
            .await?
            .into_iter()
            .filter(|e| e.title.to_lowercase().contains(&needle))
            .collect())
    }

    async fn insert_event(&self, _calendar_id: &str, draft: EventDraft) -> DomainResult<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = format!("evt-{}", inner.next_id);

        inner.events.insert(
            id.clone(),
            CalendarEvent {
                id: id.clone(),
                title: draft.title.clone(),
                description: draft.description.clone(),
                start: draft.start,
                end: draft.end,
                attendees: draft.attendees.clone(),
                conference_link: Some(format!("https://meet.example/{id}")),
                all_day: false,
            },
        );
        inner.inserted.push(draft);
        Ok(id)
    }

    async fn get_event(&self, _calendar_id: &str, event_id: &str) -> DomainResult<CalendarEvent> {
        self.inner
            .lock()
            .unwrap()
            .events
            .get(event_id)
            .cloned()
            .ok_or_else(|| SlotwiseError::EventNotFound(event_id.to_string()))
    }

    async fn patch_event(
        &self,
        _calendar_id: &str,
        event_id: &str,
        patch: EventPatch,
    ) -> DomainResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let event = inner
            .events
            .get_mut(event_id)
            .ok_or_else(|| SlotwiseError::EventNotFound(event_id.to_string()))?;

        if let Some(title) = &patch.title {
            event.title = title.clone();
        }
        match &patch.description {
            FieldUpdate::Set(description) => event.description = Some(description.clone()),
            FieldUpdate::Clear => event.description = None,
            FieldUpdate::Unchanged => {}
        }
        if let Some(start) = patch.start {
            event.start = start;
        }
        if let Some(end) = patch.end {
            event.end = end;
        }
        match &patch.attendees {
            FieldUpdate::Set(attendees) => event.attendees = attendees.clone(),
            FieldUpdate::Clear => event.attendees.clear(),
            FieldUpdate::Unchanged => {}
        }

        inner.patched.push((event_id.to_string(), patch));
        Ok(())
    }

    async fn delete_event(&self, _calendar_id: &str, event_id: &str) -> DomainResult<()> {
        self.inner
            .lock()
            .unwrap()
            .events
            .remove(event_id)
            .map(|_| ())
            .ok_or_else(|| SlotwiseError::EventNotFound(event_id.to_string()))
    }
}
