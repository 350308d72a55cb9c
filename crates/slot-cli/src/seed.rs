//! Demo data: five users with meetings on 2025-08-09 (IST, +05:30).

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use slot_engine::{CalendarStore, Interval, MemoryStore, NewEvent};

use crate::storage::UserRecord;

/// Code prefix of demo events; reseeding replaces them and nothing else.
pub const DEMO_CODE_PREFIX: &str = "event";

/// Code prefix of demo users; reseeding replaces matching directory entries.
pub const DEMO_USER_PREFIX: &str = "user";

const DEMO_USERS: &[(&str, &str)] = &[
    ("user1", "Alice Johnson"),
    ("user2", "Bob Smith"),
    ("user3", "Charlie Brown"),
    ("user4", "Diana Prince"),
    ("user5", "Eve Wilson"),
];

/// (code, user, title, minutes after 09:00, length in minutes)
const DEMO_EVENTS: &[(&str, &str, &str, i64, i64)] = &[
    ("event1", "user1", "Team Standup", 0, 30),
    ("event2", "user1", "Project Review", 180, 60),
    ("event3", "user2", "Client Call", 120, 45),
    ("event4", "user2", "Code Review", 300, 30),
    ("event5", "user3", "Design Meeting", 90, 60),
    ("event6", "user3", "Sprint Planning", 360, 60),
    ("event7", "user4", "1:1 Meeting", 240, 30),
    ("event8", "user5", "Training Session", 420, 60),
];

fn day_start() -> Result<DateTime<FixedOffset>> {
    let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).context("invalid IST offset")?;
    ist.with_ymd_and_hms(2025, 8, 9, 9, 0, 0)
        .single()
        .context("invalid demo start time")
}

/// Replace the demo users in `users`, keeping other entries. Ids continue
/// after the highest one present. Returns the number of users written.
pub fn seed_users(users: &mut Vec<UserRecord>) -> usize {
    users.retain(|u| !u.user_code.starts_with(DEMO_USER_PREFIX));
    let mut next_id = users.iter().map(|u| u.id).max().unwrap_or(0);

    for (code, name) in DEMO_USERS {
        next_id += 1;
        users.push(UserRecord {
            id: next_id,
            user_code: code.to_string(),
            name: name.to_string(),
        });
    }
    DEMO_USERS.len()
}

/// Replace the demo events in `store`, keeping anything else (booked meetings).
/// Returns the number of events written.
pub fn seed_events(store: &MemoryStore) -> Result<usize> {
    let base = day_start()?;
    store.remove_where(|e| e.event_code.starts_with(DEMO_CODE_PREFIX))?;

    for (code, user, title, offset, len) in DEMO_EVENTS {
        store.insert(NewEvent {
            event_code: code.to_string(),
            user_id: user.to_string(),
            title: title.to_string(),
            interval: Interval::starting_at(
                base + Duration::minutes(*offset),
                Duration::minutes(*len),
            ),
        })?;
    }
    Ok(DEMO_EVENTS.len())
}
