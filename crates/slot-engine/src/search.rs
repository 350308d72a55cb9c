//! Slot search and scoring.
//!
//! Two phases over a [`SearchWindow`] and a [`BusySet`]:
//!
//! 1. **Enumeration** -- candidate starts every 30 minutes from the window
//!    start, kept while `start + duration <= window end`. A candidate is
//!    dropped at the first busy interval (of any participant) it overlaps.
//! 2. **Scoring** -- each survivor gets a lower-is-better integer score: an
//!    hour-of-day bucket plus adjacency penalties summed over every
//!    (participant, busy interval) pair.
//!
//! Selection takes the minimum score; ties go to the earliest candidate. The
//! whole search is a pure function of its inputs.

use chrono::{DateTime, Duration, FixedOffset, Timelike};
use tracing::{debug, info};

use crate::availability::BusySet;
use crate::error::{Result, SchedulerError};
use crate::interval::Interval;

/// Granularity of candidate starts.
pub const CANDIDATE_STEP_MINUTES: i64 = 30;

/// A neighbouring meeting closer than this costs the "no buffer" penalty.
pub const BUFFER_MINUTES: i64 = 15;

/// A strictly positive gap shorter than this costs the "small gap" penalty.
pub const SMALL_GAP_MINUTES: i64 = 30;

const NO_BUFFER_PENALTY: u32 = 2;
const SMALL_GAP_PENALTY: u32 = 1;

/// The outer bound, step and meeting length of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    step: Duration,
    duration: Duration,
}

impl SearchWindow {
    /// # Errors
    ///
    /// `InvalidRequest` when `duration` is not positive, `InvalidTimeRange`
    /// when `start > end`.
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        duration: Duration,
    ) -> Result<Self> {
        if duration <= Duration::zero() {
            return Err(SchedulerError::InvalidRequest(
                "duration must be positive".to_string(),
            ));
        }
        if start > end {
            return Err(SchedulerError::InvalidTimeRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self {
            start,
            end,
            step: Duration::minutes(CANDIDATE_STEP_MINUTES),
            duration,
        })
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Every candidate slot in chronological order, before conflict filtering.
    pub fn candidates(&self) -> Candidates {
        Candidates {
            next: Some(self.start),
            window_end: self.end,
            step: self.step,
            duration: self.duration,
        }
    }
}

/// Iterator returned by [`SearchWindow::candidates`].
#[derive(Debug, Clone)]
pub struct Candidates {
    next: Option<DateTime<FixedOffset>>,
    window_end: DateTime<FixedOffset>,
    step: Duration,
    duration: Duration,
}

impl Iterator for Candidates {
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        let start = self.next?;
        let end = start.checked_add_signed(self.duration)?;
        if end > self.window_end {
            self.next = None;
            return None;
        }
        self.next = start.checked_add_signed(self.step);
        Some(Interval { start, end })
    }
}

/// A conflict-free slot and its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub interval: Interval,
    pub score: u32,
}

/// The first busy interval, if any, that `slot` overlaps.
pub fn first_conflict<'a>(slot: &Interval, busy: &'a BusySet) -> Option<(&'a str, &'a Interval)> {
    busy.iter().find(|(_, b)| b.overlaps(slot))
}

/// Phase 1: candidates that overlap no participant's busy interval.
pub fn conflict_free_slots(window: &SearchWindow, busy: &BusySet) -> Vec<Interval> {
    window
        .candidates()
        .filter(|slot| match first_conflict(slot, busy) {
            Some((participant, b)) => {
                debug!(
                    participant,
                    "slot {} .. {} conflicts with {} .. {}", slot.start, slot.end, b.start, b.end
                );
                false
            }
            None => true,
        })
        .collect()
}

/// Penalty for the wall-clock hour of `start` in its own offset.
///
/// `[0,9)` → 4, `[9,12)` → 1, `[12,16)` → 2, `[16,24)` → 3.
pub fn hour_penalty(start: &DateTime<FixedOffset>) -> u32 {
    match start.hour() {
        0..=8 => 4,
        9..=11 => 1,
        12..=15 => 2,
        _ => 3,
    }
}

/// Spacing penalty of `slot` against one busy interval.
///
/// +2 when either gap is within the buffer (absolute value, so `0` counts),
/// plus +1 for each side whose gap is strictly between zero and the small-gap
/// limit. The checks are independent and stack.
pub fn adjacency_penalty(slot: &Interval, busy: &Interval) -> u32 {
    let buffer = Duration::minutes(BUFFER_MINUTES);
    let small_gap = Duration::minutes(SMALL_GAP_MINUTES);

    let gap_before = slot.start - busy.end;
    let gap_after = busy.start - slot.end;

    let mut penalty = 0;
    if abs(gap_before) < buffer || abs(gap_after) < buffer {
        penalty += NO_BUFFER_PENALTY;
    }
    if gap_before > Duration::zero() && gap_before < small_gap {
        penalty += SMALL_GAP_PENALTY;
    }
    if gap_after > Duration::zero() && gap_after < small_gap {
        penalty += SMALL_GAP_PENALTY;
    }
    penalty
}

/// Phase 2: hour bucket once, adjacency summed over every busy interval of
/// every participant.
pub fn score_slot(slot: &Interval, busy: &BusySet) -> u32 {
    let adjacency: u32 = busy.iter().map(|(_, b)| adjacency_penalty(slot, b)).sum();
    hour_penalty(&slot.start) + adjacency
}

/// Conflict-free candidates ordered best first. Equal scores keep
/// chronological order.
pub fn rank_candidates(window: &SearchWindow, busy: &BusySet) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = conflict_free_slots(window, busy)
        .into_iter()
        .map(|interval| Candidate {
            interval,
            score: score_slot(&interval, busy),
        })
        .collect();

    // Stable: ties stay in enumeration order, i.e. earliest first.
    ranked.sort_by_key(|c| c.score);
    ranked
}

/// Run both phases and pick the winner.
///
/// # Errors
///
/// `NoSlotAvailable` when every candidate conflicts (or none fits the window).
pub fn find_best_slot(window: &SearchWindow, busy: &BusySet) -> Result<Candidate> {
    let ranked = rank_candidates(window, busy);
    debug!(survivors = ranked.len(), "candidate search finished");

    let best = ranked
        .into_iter()
        .next()
        .ok_or(SchedulerError::NoSlotAvailable)?;
    info!(
        score = best.score,
        "chose slot {} .. {}", best.interval.start, best.interval.end
    );
    Ok(best)
}

fn abs(d: Duration) -> Duration {
    if d < Duration::zero() {
        -d
    } else {
        d
    }
}
