//! Calendar provider port
//!
//! The one seam between the engine and the outside world. The production
//! implementation is the Google adapter in `slotwise-infra`; tests use an
//! in-memory mock.

use async_trait::async_trait;

use slotwise_domain::{CalendarEvent, EventDraft, EventPatch, Result, TimeInterval};

/// Trait for remote calendar operations
///
/// Implementations surface failures using the domain taxonomy: credential
/// problems as `AuthExpired`/`NotConnected`, missing events as
/// `EventNotFound`, everything else remote as `Provider`. The engine adds no
/// retries of its own; a transparent refresh-and-retry-once for expired
/// credentials inside an implementation is acceptable.
#[async_trait]
pub trait CalendarPort: Send + Sync {
    /// Busy intervals for a calendar within a window
    async fn query_free_busy(
        &self,
        calendar_id: &str,
        window: TimeInterval,
    ) -> Result<Vec<TimeInterval>>;

    /// All events within a window, ordered by start time
    async fn list_events(
        &self,
        calendar_id: &str,
        window: TimeInterval,
    ) -> Result<Vec<CalendarEvent>>;

    /// Free-text event search scoped to a window
    async fn search_events(
        &self,
        calendar_id: &str,
        query: &str,
        window: TimeInterval,
    ) -> Result<Vec<CalendarEvent>>;

    /// Create an event; returns the provider's event id
    async fn insert_event(&self, calendar_id: &str, draft: EventDraft) -> Result<String>;

    /// Fetch a single event by id
    async fn get_event(&self, calendar_id: &str, event_id: &str) -> Result<CalendarEvent>;

    /// Apply a partial update; only fields present in the patch change
    async fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<()>;

    /// Delete an event; an unknown id is `EventNotFound`
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<()>;
}
