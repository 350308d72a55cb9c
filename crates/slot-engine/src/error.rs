//! Error types for slot search, calendar queries and booking.

use thiserror::Error;

/// Failures raised by a [`CalendarStore`](crate::store::CalendarStore).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("calendar store unavailable: {0}")]
    Unavailable(String),

    #[error("calendar query failed: {0}")]
    Query(String),

    #[error("calendar write failed: {0}")]
    Write(String),

    /// An event code is already present in the store.
    #[error("duplicate event code: {0}")]
    DuplicateCode(String),
}

/// Errors surfaced to callers of the scheduler and the calendar query.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Malformed payload, non-positive duration, empty or blank participant list.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid time range: start time cannot be after end time")]
    InvalidTimeRange { start: String, end: String },

    /// `field` names the offending endpoint (`start` or `end`).
    #[error("invalid {field} time format: {value:?}")]
    InvalidTimeFormat { field: &'static str, value: String },

    /// The search exhausted the window without a conflict-free candidate.
    #[error("no available time slot found for all participants")]
    NoSlotAvailable,

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Some participants' records were written and some were not.
    /// `committed` lists the event codes that need compensating deletes.
    #[error("partial booking of {meeting_id}: {} record(s) committed before failure: {source}", .committed.len())]
    PartialBookingFailure {
        meeting_id: String,
        committed: Vec<String>,
        source: StoreError,
    },
}

impl SchedulerError {
    /// HTTP-style status class for this error.
    pub fn status(&self) -> u16 {
        match self {
            SchedulerError::InvalidRequest(_)
            | SchedulerError::InvalidTimeRange { .. }
            | SchedulerError::InvalidTimeFormat { .. } => 400,
            SchedulerError::NoSlotAvailable => 409,
            SchedulerError::Storage(_) | SchedulerError::PartialBookingFailure { .. } => 500,
        }
    }

    /// True when the failure is a scheduling conflict rather than a system
    /// failure; the caller may retry with a wider window.
    pub fn is_conflict(&self) -> bool {
        matches!(self, SchedulerError::NoSlotAvailable)
    }
}

/// Convenience alias used throughout slot-engine.
pub type Result<T> = std::result::Result<T, SchedulerError>;
