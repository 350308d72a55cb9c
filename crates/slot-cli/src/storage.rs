//! Loading and saving the data file: the calendar store plus a user directory.
//!
//! The file is a JSON object `{ "users": [...], "events": [...] }`. A bare
//! array of events is also accepted and read as a file without users.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slot_engine::{MemoryStore, StoredEvent};
use tracing::debug;

/// A participant known to the directory. Calendars reference `user_code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u64,
    pub user_code: String,
    pub name: String,
}

#[derive(Serialize, Deserialize)]
struct DataFile {
    #[serde(default)]
    users: Vec<UserRecord>,
    #[serde(default)]
    events: Vec<StoredEvent>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OnDisk {
    Full(DataFile),
    EventsOnly(Vec<StoredEvent>),
}

/// Everything read from one data file.
#[derive(Debug, Default)]
pub struct DataSet {
    pub store: MemoryStore,
    pub users: Vec<UserRecord>,
}

/// Read the data file at `path`. A missing file is an empty data set.
pub fn load(path: &Path) -> Result<DataSet> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("no data file at {}, starting empty", path.display());
            return Ok(DataSet::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read data file: {}", path.display()))
        }
    };

    let parsed: OnDisk = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse data file: {}", path.display()))?;
    let file = match parsed {
        OnDisk::Full(file) => file,
        OnDisk::EventsOnly(events) => DataFile {
            users: Vec::new(),
            events,
        },
    };

    debug!(
        events = file.events.len(),
        users = file.users.len(),
        "loaded {}",
        path.display()
    );
    Ok(DataSet {
        store: MemoryStore::from_events(file.events),
        users: file.users,
    })
}

/// Write `store` and `users` to `path` as pretty-printed JSON.
pub fn save(path: &Path, store: &MemoryStore, users: &[UserRecord]) -> Result<()> {
    let file = DataFile {
        users: users.to_vec(),
        events: store.snapshot()?,
    };
    let json = serde_json::to_string_pretty(&file)?;
    fs::write(path, json).with_context(|| format!("Failed to write data file: {}", path.display()))?;
    debug!(
        events = file.events.len(),
        users = file.users.len(),
        "saved {}",
        path.display()
    );
    Ok(())
}
