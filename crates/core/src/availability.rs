//! Availability search service: normalize, fetch busy periods, scan

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use slotwise_domain::{
    AvailabilityResponse, BusyCalendar, Result, SlotSearchRequest, SlotwiseError,
};

use crate::normalize::normalize;
use crate::ports::CalendarPort;
use crate::scanner::scan;

/// Availability search over one calendar
///
/// Stateless: every call normalizes afresh, fetches busy periods once, and
/// runs a synchronous scan. `now` is an explicit parameter so temporal
/// behavior is deterministic under test.
pub struct AvailabilityService {
    calendar: Arc<dyn CalendarPort>,
    calendar_id: String,
}

impl AvailabilityService {
    /// Create a service bound to one calendar
    pub fn new(calendar: Arc<dyn CalendarPort>, calendar_id: impl Into<String>) -> Self {
        Self { calendar, calendar_id: calendar_id.into() }
    }

    /// Find free slots matching the request
    ///
    /// A failed free/busy fetch propagates instead of degrading to an empty
    /// list - an empty list is indistinguishable from "truly no slots".
    /// Credential failures keep their specific kind (the caller's remediation
    /// differs); every other fetch failure becomes `AvailabilityQueryFailed`.
    #[instrument(skip(self, request), fields(
        calendar_id = %self.calendar_id,
        duration = request.duration_minutes,
    ))]
    pub async fn find_available_slots(
        &self,
        request: &SlotSearchRequest,
        now: DateTime<Utc>,
    ) -> Result<AvailabilityResponse> {
        let constraints = normalize(request)?;

        let raw = self
            .calendar
            .query_free_busy(&self.calendar_id, constraints.window)
            .await
            .map_err(|err| match err {
                SlotwiseError::AuthExpired(_) | SlotwiseError::NotConnected(_) => err,
                other => SlotwiseError::AvailabilityQueryFailed(other.to_string()),
            })?;

        let busy = BusyCalendar::from_intervals(raw);
        let slots = scan(&constraints, &busy, now);

        info!(slots = slots.len(), busy_periods = busy.len(), "availability search complete");

        Ok(AvailabilityResponse { slots, degenerate: constraints.degeneracy() })
    }
}
