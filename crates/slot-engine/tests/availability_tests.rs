//! Tests for availability resolution against a calendar store.

use chrono::{DateTime, FixedOffset};
use slot_engine::{
    resolve_busy, CalendarStore, Interval, MemoryStore, NewEvent, SchedulerError, StoreError,
    StoredEvent,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn ist(hour: u32, min: u32) -> DateTime<FixedOffset> {
    at(&format!("2025-08-09T{hour:02}:{min:02}:00+05:30"))
}

fn seed(store: &MemoryStore, code: &str, user: &str, start: (u32, u32), end: (u32, u32)) {
    store
        .insert(NewEvent {
            event_code: code.to_string(),
            user_id: user.to_string(),
            title: format!("{code} title"),
            interval: Interval::new(ist(start.0, start.1), ist(end.0, end.1)).unwrap(),
        })
        .unwrap();
}

fn participants(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// A store whose backend is unreachable.
struct DownStore;

impl CalendarStore for DownStore {
    fn find_overlapping(
        &self,
        _user_id: &str,
        _window_start: DateTime<FixedOffset>,
        _window_end: DateTime<FixedOffset>,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn events_for(&self, _user_id: &str) -> Result<Vec<StoredEvent>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn insert(&self, _event: NewEvent) -> Result<StoredEvent, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[test]
fn loads_only_events_overlapping_window() {
    let store = MemoryStore::new();
    seed(&store, "e1", "alice", (8, 0), (9, 0)); // touches window start
    seed(&store, "e2", "alice", (8, 30), (9, 30)); // straddles window start
    seed(&store, "e3", "alice", (12, 0), (13, 0)); // inside
    seed(&store, "e4", "alice", (16, 30), (18, 0)); // straddles window end
    seed(&store, "e5", "alice", (17, 0), (18, 0)); // touches window end

    let busy = resolve_busy(&store, &participants(&["alice"]), ist(9, 0), ist(17, 0)).unwrap();

    let starts: Vec<_> = busy.intervals_for("alice").iter().map(|i| i.start).collect();
    assert_eq!(starts, vec![ist(8, 30), ist(12, 0), ist(16, 30)]);
}

#[test]
fn intervals_are_kept_unclipped() {
    let store = MemoryStore::new();
    seed(&store, "e1", "alice", (8, 30), (9, 30));

    let busy = resolve_busy(&store, &participants(&["alice"]), ist(9, 0), ist(17, 0)).unwrap();

    assert_eq!(
        busy.intervals_for("alice"),
        &[Interval::new(ist(8, 30), ist(9, 30)).unwrap()]
    );
}

#[test]
fn participant_without_events_has_empty_set() {
    let store = MemoryStore::new();
    seed(&store, "e1", "alice", (10, 0), (11, 0));

    let busy =
        resolve_busy(&store, &participants(&["alice", "bob"]), ist(9, 0), ist(17, 0)).unwrap();

    assert_eq!(busy.participant_count(), 2);
    assert!(busy.intervals_for("bob").is_empty());
    assert_eq!(busy.interval_count(), 1);
}

#[test]
fn other_participants_events_are_ignored() {
    let store = MemoryStore::new();
    seed(&store, "e1", "carol", (10, 0), (11, 0));

    let busy = resolve_busy(&store, &participants(&["alice"]), ist(9, 0), ist(17, 0)).unwrap();

    assert_eq!(busy.interval_count(), 0);
    assert_eq!(busy.participants().collect::<Vec<_>>(), vec!["alice"]);
}

#[test]
fn events_in_other_offsets_are_compared_absolutely() {
    let store = MemoryStore::new();
    // 04:00-05:00 UTC is 09:30-10:30 IST.
    store
        .insert(NewEvent {
            event_code: "utc".to_string(),
            user_id: "alice".to_string(),
            title: "UTC meeting".to_string(),
            interval: Interval::new(at("2025-08-09T04:00:00Z"), at("2025-08-09T05:00:00Z"))
                .unwrap(),
        })
        .unwrap();

    let busy = resolve_busy(&store, &participants(&["alice"]), ist(9, 0), ist(10, 0)).unwrap();
    assert_eq!(busy.interval_count(), 1);
}

#[test]
fn store_failure_propagates_as_storage_error() {
    let err = resolve_busy(&DownStore, &participants(&["alice"]), ist(9, 0), ist(17, 0))
        .unwrap_err();

    match err {
        SchedulerError::Storage(StoreError::Unavailable(msg)) => {
            assert_eq!(msg, "connection refused")
        }
        other => panic!("expected storage error, got {other:?}"),
    }
}

#[test]
fn works_through_trait_object() {
    let store = MemoryStore::new();
    seed(&store, "e1", "alice", (10, 0), (11, 0));
    let dyn_store: &dyn CalendarStore = &store;

    let busy = resolve_busy(dyn_store, &participants(&["alice"]), ist(9, 0), ist(17, 0)).unwrap();
    assert_eq!(busy.interval_count(), 1);
}
