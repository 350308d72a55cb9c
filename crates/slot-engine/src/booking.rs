//! Scheduling requests end to end: validate, resolve availability, search,
//! and persist the winner for every participant.

use chrono::{DateTime, Duration, FixedOffset};
use tracing::{info, warn};

use crate::availability::resolve_busy;
use crate::clock::Clock;
use crate::error::{Result, SchedulerError};
use crate::interval::Interval;
use crate::locks::ParticipantLocks;
use crate::search::{find_best_slot, SearchWindow};
use crate::store::{BatchWrite, CalendarStore, NewEvent, StoredEvent};
use crate::wire::{format_instant, parse_instant, ScheduleRequest, ScheduleResponse};

/// Title used when the request has none.
pub const DEFAULT_TITLE: &str = "New Meeting";

/// Prefix of every generated meeting id.
pub const MEETING_ID_PREFIX: &str = "meeting-";

/// A validated schedule request.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingRequest {
    pub title: String,
    /// Distinct participant ids in first-seen order.
    pub participants: Vec<String>,
    pub window: SearchWindow,
}

impl MeetingRequest {
    /// Validate a wire request. Runs before any store access.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for an empty or blank participant list or a
    /// non-positive or unrepresentable duration, `InvalidTimeFormat` for unparseable bounds,
    /// `InvalidTimeRange` when the start is after the end.
    pub fn from_wire(request: &ScheduleRequest) -> Result<Self> {
        if request.user_ids.is_empty() {
            return Err(SchedulerError::InvalidRequest(
                "at least one participant is required".to_string(),
            ));
        }
        if request.user_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(SchedulerError::InvalidRequest(
                "participant ids must not be blank".to_string(),
            ));
        }
        if request.duration_minutes <= 0 {
            return Err(SchedulerError::InvalidRequest(format!(
                "durationMinutes must be positive, got {}",
                request.duration_minutes
            )));
        }

        let duration = Duration::try_minutes(request.duration_minutes).ok_or_else(|| {
            SchedulerError::InvalidRequest(format!(
                "durationMinutes out of range, got {}",
                request.duration_minutes
            ))
        })?;

        let start = parse_instant("start", &request.time_range.start)?;
        let end = parse_instant("end", &request.time_range.end)?;
        let window = SearchWindow::new(start, end, duration)?;

        let mut participants: Vec<String> = Vec::with_capacity(request.user_ids.len());
        for id in &request.user_ids {
            if !participants.contains(id) {
                participants.push(id.clone());
            }
        }

        let title = match request.title.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => DEFAULT_TITLE.to_string(),
        };

        Ok(Self {
            title,
            participants,
            window,
        })
    }
}

/// A meeting persisted for all its participants.
#[derive(Debug, Clone, PartialEq)]
pub struct BookedMeeting {
    pub meeting_id: String,
    pub title: String,
    pub participants: Vec<String>,
    pub interval: Interval,
    pub score: u32,
    /// One record per participant, in participant order.
    pub records: Vec<StoredEvent>,
}

impl BookedMeeting {
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.interval.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.interval.end
    }

    pub fn to_response(&self) -> ScheduleResponse {
        ScheduleResponse {
            meeting_id: self.meeting_id.clone(),
            title: self.title.clone(),
            participant_ids: self.participants.clone(),
            start_time: format_instant(&self.interval.start),
            end_time: format_instant(&self.interval.end),
        }
    }
}

/// Finds and books common free slots against an injected store and clock.
///
/// Safe to share between threads. Requests with overlapping participants are
/// serialized from the availability read through the booking write.
pub struct Scheduler<S, C> {
    store: S,
    clock: C,
    locks: ParticipantLocks,
}

impl<S, C> Scheduler<S, C>
where
    S: CalendarStore,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            locks: ParticipantLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Validate a wire request, book it and return the wire response.
    pub fn schedule(&self, request: &ScheduleRequest) -> Result<ScheduleResponse> {
        let meeting = MeetingRequest::from_wire(request)?;
        Ok(self.book(&meeting)?.to_response())
    }

    /// Search the window and persist the best slot for every participant.
    ///
    /// # Errors
    ///
    /// `NoSlotAvailable` when nothing fits, `Storage` when the store fails
    /// before anything was written, `PartialBookingFailure` when only some
    /// participants' records were written.
    pub fn book(&self, meeting: &MeetingRequest) -> Result<BookedMeeting> {
        self.locks.with_locked(&meeting.participants, || {
            let window = &meeting.window;
            let busy = resolve_busy(&self.store, &meeting.participants, window.start(), window.end())?;
            let best = find_best_slot(window, &busy)?;

            let meeting_id = self.meeting_id();
            let batch: Vec<NewEvent> = meeting
                .participants
                .iter()
                .map(|participant| NewEvent {
                    event_code: format!("{meeting_id}-{participant}"),
                    user_id: participant.clone(),
                    title: meeting.title.clone(),
                    interval: best.interval,
                })
                .collect();

            let records = match self.store.commit_batch(&batch) {
                BatchWrite::Committed(records) => records,
                BatchWrite::Failed(error) => return Err(SchedulerError::Storage(error)),
                BatchWrite::Partial { committed, error } => {
                    warn!(
                        meeting_id = %meeting_id,
                        committed = committed.len(),
                        expected = batch.len(),
                        "partial booking: {error}"
                    );
                    return Err(SchedulerError::PartialBookingFailure {
                        meeting_id,
                        committed: committed.into_iter().map(|r| r.event_code).collect(),
                        source: error,
                    });
                }
            };

            info!(
                meeting_id = %meeting_id,
                participants = meeting.participants.len(),
                "booked {} .. {}", best.interval.start, best.interval.end
            );

            Ok(BookedMeeting {
                meeting_id,
                title: meeting.title.clone(),
                participants: meeting.participants.clone(),
                interval: best.interval,
                score: best.score,
                records,
            })
        })
    }

    fn meeting_id(&self) -> String {
        format!(
            "{MEETING_ID_PREFIX}{}",
            self.clock.now().format("%Y%m%d%H%M%S")
        )
    }
}
