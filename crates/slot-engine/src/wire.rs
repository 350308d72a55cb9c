//! Wire-level JSON shapes exchanged with the request-handling layer.
//!
//! All timestamps cross the boundary as RFC 3339 strings with an explicit
//! numeric offset. Output uses `Z` for UTC and prints fractional seconds
//! only when they are non-zero, so stored instants survive a round trip.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Body of a schedule request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "userIDs", default)]
    pub user_ids: Vec<String>,
    #[serde(default)]
    pub duration_minutes: i64,
    #[serde(default)]
    pub time_range: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl ScheduleRequest {
    /// Decode a request body; malformed JSON is an `InvalidRequest`.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| SchedulerError::InvalidRequest(e.to_string()))
    }
}

/// Body returned after a meeting was booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub meeting_id: String,
    pub title: String,
    pub participant_ids: Vec<String>,
    pub start_time: String,
    pub end_time: String,
}

/// JSON error envelope: a human-readable message plus the status class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub message: String,
    pub status: u16,
}

impl From<&SchedulerError> for ErrorEnvelope {
    fn from(err: &SchedulerError) -> Self {
        Self {
            message: err.to_string(),
            status: err.status(),
        }
    }
}

/// Parse an RFC 3339 timestamp with offset; `field` names the endpoint in errors.
pub fn parse_instant(field: &'static str, value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|_| SchedulerError::InvalidTimeFormat {
        field,
        value: value.to_string(),
    })
}

/// Format an instant the way every response does.
pub fn format_instant(instant: &DateTime<FixedOffset>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// `#[serde(with = "rfc3339")]` adapter for `DateTime<FixedOffset>` fields.
pub mod rfc3339 {
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(instant: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_instant(instant))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw).map_err(de::Error::custom)
    }
}
