//! # slot-engine
//!
//! Finds a common free slot across participants' calendars and books a
//! meeting into it.
//!
//! Busy intervals come from an injected [`CalendarStore`]; candidate slots
//! are enumerated on a 30-minute grid inside the requested window, filtered
//! for conflicts, scored (business hours and spacing from neighbouring
//! meetings) and the best one is written back for every participant.
//!
//! ## Modules
//!
//! - [`interval`] — half-open intervals and the overlap test
//! - [`availability`] — per-participant busy sets for a window
//! - [`search`] — candidate enumeration, scoring and selection
//! - [`booking`] — request validation and the booking unit of work
//! - [`calendar`] — calendar listing
//! - [`store`] — the store interface and an in-memory store
//! - [`locks`] — per-participant locking across read and write
//! - [`clock`] — injectable time source
//! - [`wire`] — JSON request/response shapes
//! - [`error`] — Error types

pub mod availability;
pub mod booking;
pub mod calendar;
pub mod clock;
pub mod error;
pub mod interval;
pub mod locks;
pub mod search;
pub mod store;
pub mod wire;

pub use availability::{resolve_busy, BusySet};
pub use booking::{BookedMeeting, MeetingRequest, Scheduler};
pub use calendar::query_calendar;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{SchedulerError, StoreError};
pub use interval::Interval;
pub use search::{find_best_slot, rank_candidates, Candidate, SearchWindow};
pub use store::{BatchWrite, CalendarStore, MemoryStore, NewEvent, StoredEvent};
pub use wire::{ErrorEnvelope, ScheduleRequest, ScheduleResponse, TimeRange};
