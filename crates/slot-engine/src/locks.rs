//! Per-participant mutual exclusion for the read-search-write sequence.
//!
//! Without it two concurrent requests sharing a participant can both observe
//! the same free slot and both book it.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;

/// Registry of one mutex per participant id, created on first use.
///
/// An entry lives only while some call holds or waits for it, so the map is
/// bounded by the participants of in-flight requests.
#[derive(Debug, Default)]
pub struct ParticipantLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ParticipantLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock of every listed participant.
    ///
    /// Locks are taken in sorted id order, so two calls with overlapping
    /// participant sets cannot deadlock. Duplicate ids are locked once.
    pub fn with_locked<R>(&self, participants: &[String], f: impl FnOnce() -> R) -> R {
        let ordered: BTreeSet<&str> = participants.iter().map(String::as_str).collect();

        let result = {
            let handles: Vec<Arc<Mutex<()>>> = ordered
                .iter()
                .map(|id| self.locks.entry(id.to_string()).or_default().clone())
                .collect();

            // A panic in another holder leaves no state behind the unit mutex.
            let _guards: Vec<MutexGuard<'_, ()>> = handles
                .iter()
                .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner))
                .collect();

            f()
        };

        // Only the map's own handle left: nobody holds or waits on it. Cloning
        // happens under the same shard lock, so this cannot race a new waiter.
        for id in ordered {
            self.locks.remove_if(id, |_, m| Arc::strong_count(m) == 1);
        }

        result
    }

    /// Number of participants currently locked or waited on.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
