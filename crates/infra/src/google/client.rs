//! Google Calendar REST client implementing the core `CalendarPort`

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, instrument};
use uuid::Uuid;

use slotwise_core::ports::CalendarPort;
use slotwise_domain::{
    CalendarEvent, EventDraft, EventPatch, FieldUpdate, Result, SlotwiseError, TimeInterval,
};

use super::auth::{CalendarCredentials, PersistCredentials, TokenManager};
use super::config::GoogleCalendarConfig;
use super::models::{
    ConferenceCreateRequest, ConferenceData, EventDateTime, EventsListResponse, FreeBusyRequest,
    FreeBusyResponse, GoogleAttendee, GoogleEvent, InsertEventRequest, InsertEventResponse,
};
use crate::errors::{status_to_error, InfraError};

/// Calendar port implementation over the Google REST v3 API
///
/// Every call that receives a 401 refreshes the token once and retries once;
/// a second 401 (or a failed refresh) surfaces as `AuthExpired`.
pub struct GoogleCalendarClient {
    http: Client,
    config: GoogleCalendarConfig,
    tokens: TokenManager,
}

impl GoogleCalendarClient {
    /// Build a client with optional seeded credentials and a persistence
    /// callback invoked whenever the token rotates
    pub fn new(
        config: GoogleCalendarConfig,
        credentials: Option<CalendarCredentials>,
        persist: Option<PersistCredentials>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SlotwiseError::Config(format!("failed to build HTTP client: {e}")))?;

        let mut tokens = TokenManager::new(
            &config.token_url,
            &config.client_id,
            &config.client_secret,
            http.clone(),
        );
        if let Some(credentials) = credentials {
            tokens = tokens.with_credentials(credentials);
        }
        if let Some(persist) = persist {
            tokens = tokens.with_persistence(persist);
        }

        Ok(Self { http, config, tokens })
    }

    /// Replace the stored credentials (e.g. after a fresh consent flow)
    pub async fn set_credentials(&self, credentials: CalendarCredentials) {
        self.tokens.set_credentials(credentials).await;
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!("{}/calendars/{}/events", self.config.api_base, calendar_id)
    }

    fn event_url(&self, calendar_id: &str, event_id: &str) -> String {
        format!("{}/{}", self.events_url(calendar_id), event_id)
    }

    /// Send a request with bearer auth, refreshing and retrying once on 401
    async fn send_with_auth<F>(&self, build: F, context: &str) -> Result<reqwest::Response>
    where
        F: Fn(&str) -> reqwest::RequestBuilder,
    {
        let token = self.tokens.access_token().await?;
        let response = build(&token).send().await.map_err(http_err)?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(response, context).await;
        }

        debug!(context, "provider returned 401, refreshing token once");
        let token = self.tokens.force_refresh().await?;
        let retry = build(&token).send().await.map_err(http_err)?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            let body = retry.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(SlotwiseError::AuthExpired(format!(
                "{context}: provider rejected refreshed token: {body}"
            )));
        }
        check_status(retry, context).await
    }

    async fn fetch_events(
        &self,
        calendar_id: &str,
        window: TimeInterval,
        query: Option<&str>,
    ) -> Result<Vec<CalendarEvent>> {
        let url = self.events_url(calendar_id);
        let mut params = vec![
            ("timeMin", window.start.to_rfc3339()),
            ("timeMax", window.end.to_rfc3339()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];
        if let Some(query) = query {
            params.push(("q", query.to_string()));
        }

        let response = self
            .send_with_auth(
                |token| self.http.get(&url).bearer_auth(token).query(&params),
                "list events",
            )
            .await?;

        let listing: EventsListResponse =
            response.json().await.map_err(|e| SlotwiseError::from(InfraError::from(e)))?;
        listing.items.into_iter().map(GoogleEvent::into_calendar_event).collect()
    }
}

#[async_trait]
impl CalendarPort for GoogleCalendarClient {
    #[instrument(skip(self), fields(calendar_id))]
    async fn query_free_busy(
        &self,
        calendar_id: &str,
        window: TimeInterval,
    ) -> Result<Vec<TimeInterval>> {
        let url = format!("{}/freeBusy", self.config.api_base);
        let payload = FreeBusyRequest::for_calendar(calendar_id, window);

        let response = self
            .send_with_auth(
                |token| self.http.post(&url).bearer_auth(token).json(&payload),
                "free/busy query",
            )
            .await?;

        let parsed: FreeBusyResponse =
            response.json().await.map_err(|e| SlotwiseError::from(InfraError::from(e)))?;
        Ok(parsed.busy_intervals(calendar_id))
    }

    #[instrument(skip(self), fields(calendar_id))]
    async fn list_events(
        &self,
        calendar_id: &str,
        window: TimeInterval,
    ) -> Result<Vec<CalendarEvent>> {
        self.fetch_events(calendar_id, window, None).await
    }

    #[instrument(skip(self), fields(calendar_id, query))]
    async fn search_events(
        &self,
        calendar_id: &str,
        query: &str,
        window: TimeInterval,
    ) -> Result<Vec<CalendarEvent>> {
        self.fetch_events(calendar_id, window, Some(query)).await
    }

    #[instrument(skip(self, draft), fields(calendar_id))]
    async fn insert_event(&self, calendar_id: &str, draft: EventDraft) -> Result<String> {
        let url = self.events_url(calendar_id);
        let zone = draft.timezone.as_deref();
        let payload = InsertEventRequest {
            summary: draft.title.clone(),
            description: draft.description.clone(),
            start: EventDateTime::timed(draft.start, zone),
            end: EventDateTime::timed(draft.end, zone),
            attendees: draft
                .attendees
                .iter()
                .map(|email| GoogleAttendee { email: email.clone() })
                .collect(),
            conference_data: ConferenceData {
                create_request: ConferenceCreateRequest {
                    request_id: Uuid::new_v4().to_string(),
                },
            },
        };

        let response = self
            .send_with_auth(
                |token| {
                    self.http
                        .post(&url)
                        .bearer_auth(token)
                        .query(&[("conferenceDataVersion", "1"), ("sendUpdates", "all")])
                        .json(&payload)
                },
                "insert event",
            )
            .await?;

        let created: InsertEventResponse =
            response.json().await.map_err(|e| SlotwiseError::from(InfraError::from(e)))?;
        debug!(event_id = %created.id, "event created");
        Ok(created.id)
    }

    #[instrument(skip(self), fields(calendar_id, event_id))]
    async fn get_event(&self, calendar_id: &str, event_id: &str) -> Result<CalendarEvent> {
        let url = self.event_url(calendar_id, event_id);

        let response = self
            .send_with_auth(|token| self.http.get(&url).bearer_auth(token), "get event")
            .await?;

        let event: GoogleEvent =
            response.json().await.map_err(|e| SlotwiseError::from(InfraError::from(e)))?;
        event.into_calendar_event()
    }

    #[instrument(skip(self, patch), fields(calendar_id, event_id))]
    async fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<()> {
        let url = self.event_url(calendar_id, event_id);
        let body = patch_body(&patch);

        self.send_with_auth(
            |token| {
                self.http
                    .patch(&url)
                    .bearer_auth(token)
                    .query(&[("sendUpdates", "all")])
                    .json(&body)
            },
            "patch event",
        )
        .await?;

        Ok(())
    }

    #[instrument(skip(self), fields(calendar_id, event_id))]
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<()> {
        let url = self.event_url(calendar_id, event_id);

        self.send_with_auth(
            |token| {
                self.http.delete(&url).bearer_auth(token).query(&[("sendUpdates", "all")])
            },
            "delete event",
        )
        .await?;

        Ok(())
    }
}

fn http_err(error: reqwest::Error) -> SlotwiseError {
    InfraError::from(error).into()
}

async fn check_status(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
    Err(status_to_error(status, context, &body))
}

/// Only changed fields go on the wire: `Set` as the value, `Clear` as an
/// explicit null (empty list for attendees), `Unchanged` omitted. The
/// timezone is an annotation of the time bounds, not a field of its own;
/// the meeting service guarantees a patch that sets it also carries both
/// bounds.
fn patch_body(patch: &EventPatch) -> serde_json::Value {
    let mut body = serde_json::Map::new();

    if let Some(title) = &patch.title {
        body.insert("summary".to_string(), json!(title));
    }
    match &patch.description {
        FieldUpdate::Set(description) => {
            body.insert("description".to_string(), json!(description));
        }
        FieldUpdate::Clear => {
            body.insert("description".to_string(), serde_json::Value::Null);
        }
        FieldUpdate::Unchanged => {}
    }
    if let Some(start) = patch.start {
        body.insert("start".to_string(), time_bound(start, patch.timezone.as_deref()));
    }
    if let Some(end) = patch.end {
        body.insert("end".to_string(), time_bound(end, patch.timezone.as_deref()));
    }
    match &patch.attendees {
        FieldUpdate::Set(attendees) => {
            let list: Vec<_> = attendees.iter().map(|email| json!({ "email": email })).collect();
            body.insert("attendees".to_string(), json!(list));
        }
        FieldUpdate::Clear => {
            body.insert("attendees".to_string(), json!([]));
        }
        FieldUpdate::Unchanged => {}
    }

    serde_json::Value::Object(body)
}

fn time_bound(instant: chrono::DateTime<chrono::Utc>, zone: Option<&str>) -> serde_json::Value {
    let mut bound = serde_json::Map::new();
    bound.insert("dateTime".to_string(), json!(instant.to_rfc3339()));
    if let Some(zone) = zone {
        bound.insert("timeZone".to_string(), json!(zone));
    }
    serde_json::Value::Object(bound)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn patch_body_carries_only_changed_fields() {
        let patch = EventPatch {
            title: Some("New title".to_string()),
            description: FieldUpdate::Clear,
            start: None,
            end: Some(Utc.with_ymd_and_hms(2024, 2, 6, 11, 0, 0).unwrap()),
            timezone: None,
            attendees: FieldUpdate::Unchanged,
        };

        let body = patch_body(&patch);
        assert_eq!(body["summary"], "New title");
        assert!(body["description"].is_null());
        assert_eq!(body["end"]["dateTime"], "2024-02-06T11:00:00+00:00");
        assert!(body.get("start").is_none());
        assert!(body.get("attendees").is_none());
    }

    #[test]
    fn cleared_attendees_serialize_as_empty_list() {
        let patch = EventPatch { attendees: FieldUpdate::Clear, ..EventPatch::default() };
        let body = patch_body(&patch);
        assert_eq!(body["attendees"], json!([]));
    }

    #[test]
    fn time_bounds_carry_the_zone_annotation() {
        let patch = EventPatch {
            start: Some(Utc.with_ymd_and_hms(2024, 2, 6, 10, 0, 0).unwrap()),
            timezone: Some("Europe/Berlin".to_string()),
            ..EventPatch::default()
        };

        let body = patch_body(&patch);
        assert_eq!(body["start"]["timeZone"], "Europe/Berlin");
    }
}
