//! Tests for the half-open overlap rule.

use chrono::{DateTime, Duration, FixedOffset};
use slot_engine::interval::{overlaps, Interval};

fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

/// Helper to create an interval from hour/minute pairs on 2025-08-09 UTC.
fn span(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Interval {
    Interval::new(
        at(&format!("2025-08-09T{start_hour:02}:{start_min:02}:00Z")),
        at(&format!("2025-08-09T{end_hour:02}:{end_min:02}:00Z")),
    )
    .unwrap()
}

#[test]
fn partially_overlapping_intervals_conflict() {
    // 09:00-10:00 and 09:30-10:30 share 30 minutes.
    let a = span(9, 0, 10, 0);
    let b = span(9, 30, 10, 30);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}

#[test]
fn adjacent_intervals_do_not_conflict() {
    // 09:00-10:00 and 10:00-11:00 only touch.
    let a = span(9, 0, 10, 0);
    let b = span(10, 0, 11, 0);
    assert!(!a.overlaps(&b), "touching boundary is not an overlap");
    assert!(!b.overlaps(&a));
}

#[test]
fn disjoint_intervals_do_not_conflict() {
    let a = span(9, 0, 10, 0);
    let b = span(11, 0, 12, 0);
    assert!(!a.overlaps(&b));
}

#[test]
fn containment_is_a_conflict() {
    let outer = span(9, 0, 12, 0);
    let inner = span(10, 0, 10, 30);
    assert!(outer.overlaps(&inner));
    assert!(inner.overlaps(&outer));
}

#[test]
fn identical_intervals_conflict() {
    let a = span(14, 0, 15, 0);
    assert!(a.overlaps(&a));
}

#[test]
fn zero_length_interval_inside_another_conflicts() {
    let point = span(9, 30, 9, 30);
    let block = span(9, 0, 10, 0);
    assert!(point.overlaps(&block));
    assert_eq!(point.duration(), Duration::zero());
}

#[test]
fn zero_length_interval_on_boundary_does_not_conflict() {
    let point = span(10, 0, 10, 0);
    let block = span(9, 0, 10, 0);
    assert!(!point.overlaps(&block));
}

#[test]
fn inverted_interval_rejected() {
    assert!(Interval::new(at("2025-08-09T10:00:00Z"), at("2025-08-09T09:00:00Z")).is_none());
}

#[test]
fn overlap_compares_absolute_instants_across_offsets() {
    // 09:00-10:00 IST is 03:30-04:30 UTC.
    let ist = Interval::new(
        at("2025-08-09T09:00:00+05:30"),
        at("2025-08-09T10:00:00+05:30"),
    )
    .unwrap();
    let utc_overlapping = span(4, 0, 5, 0);
    let utc_touching = span(4, 30, 5, 0);

    assert!(ist.overlaps(&utc_overlapping));
    assert!(!ist.overlaps(&utc_touching));
}

#[test]
fn free_function_matches_method() {
    let a = span(9, 0, 10, 0);
    let b = span(9, 59, 11, 0);
    assert_eq!(overlaps(a.start, a.end, b.start, b.end), a.overlaps(&b));
}

#[test]
fn starting_at_builds_interval_of_duration() {
    let i = Interval::starting_at(at("2025-08-09T09:00:00Z"), Duration::minutes(45));
    assert_eq!(i.end, at("2025-08-09T09:45:00Z"));
}
