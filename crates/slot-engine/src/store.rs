//! The calendar store interface and an in-memory implementation.
//!
//! The engine never touches storage directly: the resolver, the calendar
//! query and the booking step all go through [`CalendarStore`], which keeps
//! the search itself testable without a database.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::interval::{overlaps, Interval};
use crate::wire::rfc3339;

/// A busy interval as persisted for one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    pub id: u64,
    /// Unique across the whole store.
    pub event_code: String,
    pub user_id: String,
    pub title: String,
    #[serde(with = "rfc3339")]
    pub start_time: DateTime<FixedOffset>,
    #[serde(with = "rfc3339")]
    pub end_time: DateTime<FixedOffset>,
}

impl StoredEvent {
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// Write payload for [`CalendarStore::insert`]; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub event_code: String,
    pub user_id: String,
    pub title: String,
    pub interval: Interval,
}

/// Outcome of a multi-record write.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchWrite {
    /// Every record was written.
    Committed(Vec<StoredEvent>),
    /// Nothing was written.
    Failed(StoreError),
    /// The records in `committed` were written before `error` stopped the batch.
    Partial {
        committed: Vec<StoredEvent>,
        error: StoreError,
    },
}

/// Narrow read/write capability over participants' calendars.
pub trait CalendarStore: Send + Sync {
    /// Events of `user_id` with `start < window_end && end > window_start`.
    fn find_overlapping(
        &self,
        user_id: &str,
        window_start: DateTime<FixedOffset>,
        window_end: DateTime<FixedOffset>,
    ) -> Result<Vec<StoredEvent>, StoreError>;

    /// Every event of `user_id`, in store order.
    fn events_for(&self, user_id: &str) -> Result<Vec<StoredEvent>, StoreError>;

    fn insert(&self, event: NewEvent) -> Result<StoredEvent, StoreError>;

    /// Write a group of records as one unit of work.
    ///
    /// The default implementation has no atomicity: it inserts one record at a
    /// time and reports [`BatchWrite::Partial`] when a later insert fails after
    /// earlier ones succeeded. Stores that can commit atomically override it.
    fn commit_batch(&self, events: &[NewEvent]) -> BatchWrite {
        let mut committed = Vec::with_capacity(events.len());
        for event in events {
            match self.insert(event.clone()) {
                Ok(stored) => committed.push(stored),
                Err(error) if committed.is_empty() => return BatchWrite::Failed(error),
                Err(error) => return BatchWrite::Partial { committed, error },
            }
        }
        BatchWrite::Committed(committed)
    }
}

/// Thread-safe in-memory store with auto-increment ids and unique event codes.
///
/// Batches are committed atomically: all codes are validated under the write
/// lock before any record is inserted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<StoredEvent>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot. Ids continue after the highest one seen.
    pub fn from_events(events: Vec<StoredEvent>) -> Self {
        let max_id = events.iter().map(|e| e.id).max().unwrap_or(0);
        Self {
            events: RwLock::new(events),
            next_id: AtomicU64::new(max_id),
        }
    }

    /// Copy of every stored event in insertion order.
    pub fn snapshot(&self) -> Result<Vec<StoredEvent>, StoreError> {
        Ok(self.read()?.clone())
    }

    /// Drop every event matching `pred`; returns how many were removed.
    pub fn remove_where<F>(&self, pred: F) -> Result<usize, StoreError>
    where
        F: Fn(&StoredEvent) -> bool,
    {
        let mut events = self.write()?;
        let before = events.len();
        events.retain(|e| !pred(e));
        Ok(before - events.len())
    }

    pub fn len(&self) -> usize {
        self.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<StoredEvent>>, StoreError> {
        self.events
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<StoredEvent>>, StoreError> {
        self.events
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn materialize(&self, event: NewEvent) -> StoredEvent {
        StoredEvent {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            event_code: event.event_code,
            user_id: event.user_id,
            title: event.title,
            start_time: event.interval.start,
            end_time: event.interval.end,
        }
    }
}

impl CalendarStore for MemoryStore {
    fn find_overlapping(
        &self,
        user_id: &str,
        window_start: DateTime<FixedOffset>,
        window_end: DateTime<FixedOffset>,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        Ok(self
            .read()?
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| overlaps(e.start_time, e.end_time, window_start, window_end))
            .cloned()
            .collect())
    }

    fn events_for(&self, user_id: &str) -> Result<Vec<StoredEvent>, StoreError> {
        Ok(self
            .read()?
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    fn insert(&self, event: NewEvent) -> Result<StoredEvent, StoreError> {
        let mut events = self.write()?;
        if events.iter().any(|e| e.event_code == event.event_code) {
            return Err(StoreError::DuplicateCode(event.event_code));
        }
        let stored = self.materialize(event);
        events.push(stored.clone());
        Ok(stored)
    }

    fn commit_batch(&self, batch: &[NewEvent]) -> BatchWrite {
        let mut events = match self.write() {
            Ok(events) => events,
            Err(error) => return BatchWrite::Failed(error),
        };

        let mut seen: HashSet<&str> = events.iter().map(|e| e.event_code.as_str()).collect();
        for event in batch {
            if !seen.insert(event.event_code.as_str()) {
                return BatchWrite::Failed(StoreError::DuplicateCode(event.event_code.clone()));
            }
        }

        let stored: Vec<StoredEvent> = batch.iter().cloned().map(|e| self.materialize(e)).collect();
        events.extend(stored.iter().cloned());
        BatchWrite::Committed(stored)
    }
}
