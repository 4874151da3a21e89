//! Meeting mutation facade against a mocked provider.

mod support;

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use slotwise_core::MeetingService;
use slotwise_domain::{
    CalendarEvent, FieldUpdate, Meeting, MeetingPatch, SlotwiseError, TimeInterval,
};

use support::MockCalendarPort;

const CALENDAR_ID: &str = "primary";

fn service(port: &MockCalendarPort) -> MeetingService {
    MeetingService::new(Arc::new(port.clone()), CALENDAR_ID)
}

fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, d, h, m, 0).unwrap()
}

fn stored_event(id: &str, title: &str, start: DateTime<Utc>, minutes: i64) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        start,
        end: start + Duration::minutes(minutes),
        attendees: vec![],
        conference_link: None,
        all_day: false,
    }
}

#[tokio::test]
async fn schedule_derives_end_from_duration() {
    let port = MockCalendarPort::new();
    let meeting = Meeting::new("Design review", utc(6, 14, 0), 45)
        .with_description("Quarterly sync")
        .with_attendees(vec!["ana@example.com".to_string()])
        .with_timezone("Europe/Berlin");

    let event_id = service(&port).schedule_meeting(&meeting).await.unwrap();

    let draft = &port.inserted()[0];
    assert_eq!(draft.start, utc(6, 14, 0));
    assert_eq!(draft.end, utc(6, 14, 45));
    assert_eq!(draft.timezone.as_deref(), Some("Europe/Berlin"));
    assert_eq!(port.event(&event_id).unwrap().end, utc(6, 14, 45));
}

#[tokio::test]
async fn schedule_rejects_invalid_meetings() {
    let port = MockCalendarPort::new();

    let blank = Meeting::new("  ", utc(6, 14, 0), 30);
    assert!(matches!(
        service(&port).schedule_meeting(&blank).await,
        Err(SlotwiseError::InvalidInput(_))
    ));

    let bad_zone = Meeting::new("Sync", utc(6, 14, 0), 30).with_timezone("Moon/Tycho");
    assert!(matches!(
        service(&port).schedule_meeting(&bad_zone).await,
        Err(SlotwiseError::InvalidTimezone(_))
    ));

    assert!(port.inserted().is_empty(), "invalid meetings must not reach the provider");
}

#[tokio::test]
async fn update_with_new_start_preserves_duration() {
    let port =
        MockCalendarPort::new().with_event(stored_event("evt-7", "Sync", utc(6, 10, 0), 45));
    let patch = MeetingPatch::default().with_start_time(utc(8, 15, 0));

    service(&port).update_meeting("evt-7", &patch).await.unwrap();

    let event = port.event("evt-7").unwrap();
    assert_eq!(event.start, utc(8, 15, 0));
    assert_eq!(event.end, utc(8, 15, 45));
    assert_eq!(event.duration_minutes(), 45);
}

#[tokio::test]
async fn update_with_duration_alone_reuses_stored_start() {
    let port =
        MockCalendarPort::new().with_event(stored_event("evt-7", "Sync", utc(6, 10, 0), 45));
    let patch = MeetingPatch::default().with_duration(90);

    service(&port).update_meeting("evt-7", &patch).await.unwrap();

    let event = port.event("evt-7").unwrap();
    assert_eq!(event.start, utc(6, 10, 0), "start must not move");
    assert_eq!(event.end, utc(6, 11, 30));

    // Only the end was patched; the provider never saw a start change.
    let (_, sent) = &port.patched()[0];
    assert!(sent.start.is_none());
    assert_eq!(sent.end, Some(utc(6, 11, 30)));
}

#[tokio::test]
async fn update_with_start_and_duration_recomputes_end_from_both() {
    let port =
        MockCalendarPort::new().with_event(stored_event("evt-7", "Sync", utc(6, 10, 0), 45));
    let patch = MeetingPatch::default().with_start_time(utc(7, 9, 0)).with_duration(30);

    service(&port).update_meeting("evt-7", &patch).await.unwrap();

    let event = port.event("evt-7").unwrap();
    assert_eq!(event.start, utc(7, 9, 0));
    assert_eq!(event.end, utc(7, 9, 30));
}

#[tokio::test]
async fn update_with_timezone_alone_resends_stored_bounds() {
    let port =
        MockCalendarPort::new().with_event(stored_event("evt-7", "Sync", utc(6, 10, 0), 45));
    let patch = MeetingPatch::default().with_timezone("Asia/Tokyo");

    service(&port).update_meeting("evt-7", &patch).await.unwrap();

    // The zone annotation only takes effect on a time bound, so both stored
    // bounds must go back on the wire with it.
    let (_, sent) = &port.patched()[0];
    assert_eq!(sent.timezone.as_deref(), Some("Asia/Tokyo"));
    assert_eq!(sent.start, Some(utc(6, 10, 0)));
    assert_eq!(sent.end, Some(utc(6, 10, 45)));
}

#[tokio::test]
async fn update_with_duration_and_timezone_carries_both_bounds() {
    let port =
        MockCalendarPort::new().with_event(stored_event("evt-7", "Sync", utc(6, 10, 0), 45));
    let patch = MeetingPatch::default().with_duration(90).with_timezone("Asia/Tokyo");

    service(&port).update_meeting("evt-7", &patch).await.unwrap();

    let (_, sent) = &port.patched()[0];
    assert_eq!(sent.start, Some(utc(6, 10, 0)));
    assert_eq!(sent.end, Some(utc(6, 11, 30)));
    assert_eq!(sent.timezone.as_deref(), Some("Asia/Tokyo"));
}

#[tokio::test]
async fn update_with_bad_timezone_is_rejected_before_the_provider() {
    let port =
        MockCalendarPort::new().with_event(stored_event("evt-7", "Sync", utc(6, 10, 0), 45));
    let patch = MeetingPatch::default().with_timezone("Moon/Tycho");

    let result = service(&port).update_meeting("evt-7", &patch).await;

    assert!(matches!(result, Err(SlotwiseError::InvalidTimezone(_))));
    assert!(port.patched().is_empty());
}

#[tokio::test]
async fn update_clears_description_without_touching_other_fields() {
    let mut event = stored_event("evt-7", "Sync", utc(6, 10, 0), 45);
    event.description = Some("old notes".to_string());
    let port = MockCalendarPort::new().with_event(event);

    let patch = MeetingPatch::default().clear_description();
    service(&port).update_meeting("evt-7", &patch).await.unwrap();

    let event = port.event("evt-7").unwrap();
    assert_eq!(event.description, None);
    assert_eq!(event.title, "Sync");
    assert_eq!(event.start, utc(6, 10, 0));
}

#[tokio::test]
async fn update_rejects_clearing_required_fields() {
    let port =
        MockCalendarPort::new().with_event(stored_event("evt-7", "Sync", utc(6, 10, 0), 45));
    let patch = MeetingPatch { title: FieldUpdate::Clear, ..MeetingPatch::default() };

    let result = service(&port).update_meeting("evt-7", &patch).await;

    assert!(matches!(result, Err(SlotwiseError::InvalidInput(_))));
    assert!(port.patched().is_empty());
}

#[tokio::test]
async fn update_of_missing_event_is_not_found() {
    let port = MockCalendarPort::new();
    let patch = MeetingPatch::default().with_duration(60);

    let result = service(&port).update_meeting("evt-missing", &patch).await;

    assert!(matches!(result, Err(SlotwiseError::EventNotFound(_))));
}

#[tokio::test]
async fn empty_patch_is_a_no_op() {
    let port =
        MockCalendarPort::new().with_event(stored_event("evt-7", "Sync", utc(6, 10, 0), 45));

    service(&port).update_meeting("evt-7", &MeetingPatch::default()).await.unwrap();

    assert!(port.patched().is_empty());
}

#[tokio::test]
async fn delete_is_idempotent_from_the_caller_perspective() {
    let port =
        MockCalendarPort::new().with_event(stored_event("evt-7", "Sync", utc(6, 10, 0), 45));
    let service = service(&port);

    service.delete_meeting("evt-7").await.unwrap();

    // Deleting again (and again) yields the same clear answer both times.
    for _ in 0..2 {
        match service.delete_meeting("evt-7").await {
            Err(SlotwiseError::EventNotFound(id)) => assert_eq!(id, "evt-7"),
            other => panic!("expected EventNotFound, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn search_matches_titles_within_the_window() {
    let port = MockCalendarPort::new()
        .with_event(stored_event("evt-1", "Flight to Lisbon", utc(6, 7, 0), 180))
        .with_event(stored_event("evt-2", "Team standup", utc(6, 9, 30), 15));
    let window = TimeInterval::new(utc(6, 0, 0), utc(7, 0, 0)).unwrap();

    let found = service(&port).search_meetings("flight", Some(window), utc(5, 0, 0)).await;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "evt-1");
}

#[tokio::test]
async fn search_degrades_to_empty_on_provider_failure() {
    let port = MockCalendarPort::new()
        .with_search_error(SlotwiseError::Provider("rate limited".into()));

    let found = service(&port).search_meetings("flight", None, utc(5, 0, 0)).await;

    assert!(found.is_empty());
}

#[tokio::test]
async fn last_meeting_of_day_picks_the_latest_end() {
    // Day boundary in New York: 2024-02-06 is 05:00Z..05:00Z next day.
    // evt-late starts earlier but ends latest.
    let port = MockCalendarPort::new()
        .with_event(stored_event("evt-early", "Breakfast", utc(6, 13, 0), 60))
        .with_event(stored_event("evt-late", "Dinner", utc(7, 0, 0), 120))
        .with_event(stored_event("evt-next-day", "Lunch", utc(7, 17, 0), 60));

    let date = NaiveDate::from_ymd_opt(2024, 2, 6).unwrap();
    let last = service(&port)
        .find_last_meeting_of_day(date, "America/New_York")
        .await
        .unwrap()
        .expect("the day has events");

    assert_eq!(last.id, "evt-late");
}

#[tokio::test]
async fn last_meeting_of_empty_day_is_none() {
    let port = MockCalendarPort::new();
    let date = NaiveDate::from_ymd_opt(2024, 2, 6).unwrap();

    let last = service(&port).find_last_meeting_of_day(date, "UTC").await.unwrap();

    assert!(last.is_none());
}

#[tokio::test]
async fn last_meeting_degrades_to_none_on_provider_failure() {
    let port =
        MockCalendarPort::new().with_list_error(SlotwiseError::Provider("backend 502".into()));
    let date = NaiveDate::from_ymd_opt(2024, 2, 6).unwrap();

    let last = service(&port).find_last_meeting_of_day(date, "UTC").await.unwrap();

    assert!(last.is_none());
}

#[tokio::test]
async fn last_meeting_with_bad_zone_is_an_error() {
    let port = MockCalendarPort::new();
    let date = NaiveDate::from_ymd_opt(2024, 2, 6).unwrap();

    let result = service(&port).find_last_meeting_of_day(date, "Pluto/Cryovolcano").await;

    assert!(matches!(result, Err(SlotwiseError::InvalidTimezone(_))));
}
