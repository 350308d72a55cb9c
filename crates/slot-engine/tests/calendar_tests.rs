//! Tests for calendar listing.

use chrono::{DateTime, FixedOffset};
use slot_engine::{query_calendar, CalendarStore, Interval, MemoryStore, NewEvent, SchedulerError};

fn ist(day: u32, hour: u32) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(&format!("2025-08-{day:02}T{hour:02}:00:00+05:30")).unwrap()
}

fn store() -> MemoryStore {
    let store = MemoryStore::new();
    for (code, user, day, start, end) in [
        ("event1", "user1", 9, 9, 10),
        ("event2", "user1", 9, 12, 13),
        ("event3", "user2", 9, 11, 12),
        ("event4", "user1", 10, 9, 10),
    ] {
        store
            .insert(NewEvent {
                event_code: code.to_string(),
                user_id: user.to_string(),
                title: code.to_string(),
                interval: Interval::new(ist(day, start), ist(day, end)).unwrap(),
            })
            .unwrap();
    }
    store
}

fn codes(events: &[slot_engine::StoredEvent]) -> Vec<&str> {
    events.iter().map(|e| e.event_code.as_str()).collect()
}

#[test]
fn no_bounds_lists_everything_for_user() {
    let events = query_calendar(&store(), "user1", None, None).unwrap();
    assert_eq!(codes(&events), vec!["event1", "event2", "event4"]);
}

#[test]
fn empty_strings_count_as_absent() {
    let events = query_calendar(&store(), "user1", Some(""), Some("")).unwrap();
    assert_eq!(events.len(), 3);
}

#[test]
fn single_bound_lists_everything() {
    let events =
        query_calendar(&store(), "user1", Some("2025-08-10T00:00:00+05:30"), None).unwrap();
    assert_eq!(events.len(), 3);
}

#[test]
fn window_filters_by_overlap() {
    let events = query_calendar(
        &store(),
        "user1",
        Some("2025-08-09T08:00:00+05:30"),
        Some("2025-08-09T18:00:00+05:30"),
    )
    .unwrap();
    assert_eq!(codes(&events), vec!["event1", "event2"]);
}

#[test]
fn window_touching_event_excludes_it() {
    let events = query_calendar(
        &store(),
        "user1",
        Some("2025-08-09T10:00:00+05:30"),
        Some("2025-08-09T12:00:00+05:30"),
    )
    .unwrap();
    assert!(events.is_empty());
}

#[test]
fn unknown_user_has_empty_calendar() {
    let events = query_calendar(&store(), "nobody", None, None).unwrap();
    assert!(events.is_empty());
}

#[test]
fn start_after_end_is_invalid_range() {
    let err = query_calendar(
        &store(),
        "user1",
        Some("2025-08-10T19:00:00+05:30"),
        Some("2025-08-10T10:00:00+05:30"),
    )
    .unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidTimeRange { .. }));
    assert_eq!(
        err.to_string(),
        "invalid time range: start time cannot be after end time"
    );
}

#[test]
fn equal_bounds_are_valid_and_match_nothing_touching() {
    let events = query_calendar(
        &store(),
        "user1",
        Some("2025-08-09T09:30:00+05:30"),
        Some("2025-08-09T09:30:00+05:30"),
    )
    .unwrap();
    // A zero-width window inside event1 still overlaps it.
    assert_eq!(codes(&events), vec!["event1"]);
}

#[test]
fn bad_start_format() {
    let err = query_calendar(&store(), "user1", Some("invalid-time"), Some("2025-08-10T18:00:00+05:30"))
        .unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidTimeFormat { field: "start", .. }));
    assert_eq!(err.status(), 400);
}

#[test]
fn bad_end_format() {
    let err = query_calendar(&store(), "user1", Some("2025-08-10T08:00:00+05:30"), Some("invalid-time"))
        .unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidTimeFormat { field: "end", .. }));
}

#[test]
fn bad_format_reported_even_with_one_bound() {
    let err = query_calendar(&store(), "user1", None, Some("2025-13-40")).unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidTimeFormat { field: "end", .. }));
}

#[test]
fn listing_preserves_store_order() {
    let s = store();
    let listed = query_calendar(&s, "user1", None, None).unwrap();
    assert_eq!(listed, s.events_for("user1").unwrap());
}
