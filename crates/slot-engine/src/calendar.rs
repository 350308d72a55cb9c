//! Read path: list one participant's calendar, optionally within a window.

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::error::{Result, SchedulerError};
use crate::store::{CalendarStore, StoredEvent};
use crate::wire::parse_instant;

/// Events of `user_id`, in store order.
///
/// `start` and `end` are RFC 3339 strings; empty strings count as absent.
/// When both bounds are given only events overlapping `[start, end)` are
/// returned, otherwise every event of the participant is.
///
/// # Errors
///
/// `InvalidTimeFormat` when a present bound does not parse, `InvalidTimeRange`
/// when both are present and `start > end`, `Storage` when the store fails.
pub fn query_calendar<S>(
    store: &S,
    user_id: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Vec<StoredEvent>>
where
    S: CalendarStore + ?Sized,
{
    let start = parse_bound("start", start)?;
    let end = parse_bound("end", end)?;

    let events = match (start, end) {
        (Some(start), Some(end)) => {
            if start > end {
                return Err(SchedulerError::InvalidTimeRange {
                    start: start.to_rfc3339(),
                    end: end.to_rfc3339(),
                });
            }
            store.find_overlapping(user_id, start, end)?
        }
        _ => store.events_for(user_id)?,
    };

    debug!(user_id, events = events.len(), "calendar query");
    Ok(events)
}

fn parse_bound(field: &'static str, raw: Option<&str>) -> Result<Option<DateTime<FixedOffset>>> {
    match raw {
        Some(value) if !value.is_empty() => parse_instant(field, value).map(Some),
        _ => Ok(None),
    }
}
