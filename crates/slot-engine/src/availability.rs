//! Availability resolution: per-participant busy sets for a search window.
//!
//! Loads, for each participant, every stored event overlapping the window.
//! The result is built fresh for each request and never cached.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::error::Result;
use crate::interval::Interval;
use crate::store::CalendarStore;

/// Busy intervals keyed by participant id.
///
/// A participant with no overlapping events is present with an empty list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusySet {
    by_participant: BTreeMap<String, Vec<Interval>>,
}

impl BusySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant, keeping any intervals already recorded.
    pub fn add_participant(&mut self, participant: impl Into<String>) {
        self.by_participant.entry(participant.into()).or_default();
    }

    pub fn add(&mut self, participant: impl Into<String>, interval: Interval) {
        self.by_participant
            .entry(participant.into())
            .or_default()
            .push(interval);
    }

    pub fn intervals_for(&self, participant: &str) -> &[Interval] {
        self.by_participant
            .get(participant)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.by_participant.keys().map(String::as_str)
    }

    /// Every (participant, interval) pair.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Interval)> {
        self.by_participant
            .iter()
            .flat_map(|(p, intervals)| intervals.iter().map(move |i| (p.as_str(), i)))
    }

    pub fn participant_count(&self) -> usize {
        self.by_participant.len()
    }

    pub fn interval_count(&self) -> usize {
        self.by_participant.values().map(Vec::len).sum()
    }
}

/// Load each participant's busy intervals overlapping `[window_start, window_end)`.
///
/// An event that merely touches a window boundary is not included. Store
/// failures propagate unchanged as `SchedulerError::Storage`; nothing is retried.
pub fn resolve_busy<S>(
    store: &S,
    participants: &[String],
    window_start: DateTime<FixedOffset>,
    window_end: DateTime<FixedOffset>,
) -> Result<BusySet>
where
    S: CalendarStore + ?Sized,
{
    let mut busy = BusySet::new();

    for participant in participants {
        let events = store.find_overlapping(participant, window_start, window_end)?;
        debug!(
            participant = %participant,
            events = events.len(),
            "loaded busy intervals in {window_start} .. {window_end}"
        );

        busy.add_participant(participant.as_str());
        for event in &events {
            debug!(participant = %participant, title = %event.title, "busy {} .. {}", event.start_time, event.end_time);
            busy.add(participant.as_str(), event.interval());
        }
    }

    Ok(busy)
}
