//! Half-open time intervals and the overlap test shared by the resolver,
//! the search engine and the calendar query.
//!
//! Adjacent intervals (where one ends exactly when another starts) do NOT
//! overlap.

use chrono::{DateTime, Duration, FixedOffset};

/// A half-open span `[start, end)`. Zero-length intervals are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Interval {
    /// Build an interval, returning `None` when `end < start`.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    /// Interval of `duration` beginning at `start`.
    pub fn starting_at(start: DateTime<FixedOffset>, duration: Duration) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when the two spans share any instant.
    pub fn overlaps(&self, other: &Interval) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }
}

/// Two half-open spans overlap iff `a_start < b_end && a_end > b_start`.
///
/// Instants are compared absolutely, so spans expressed in different UTC
/// offsets compare correctly.
///
/// ```
/// use chrono::DateTime;
/// use slot_engine::interval::overlaps;
///
/// let t = |s: &str| DateTime::parse_from_rfc3339(s).unwrap();
/// // 09:00-10:00 and 10:00-11:00 only touch.
/// assert!(!overlaps(
///     t("2025-08-09T09:00:00Z"),
///     t("2025-08-09T10:00:00Z"),
///     t("2025-08-09T10:00:00Z"),
///     t("2025-08-09T11:00:00Z"),
/// ));
/// ```
pub fn overlaps(
    a_start: DateTime<FixedOffset>,
    a_end: DateTime<FixedOffset>,
    b_start: DateTime<FixedOffset>,
    b_end: DateTime<FixedOffset>,
) -> bool {
    a_start < b_end && a_end > b_start
}
