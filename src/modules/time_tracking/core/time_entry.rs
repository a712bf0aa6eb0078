// Time entry as the client knows it, plus the request shapes sent to the remote service.
//
// Purpose
// - Mirror the authoritative representation returned by the time entry service.
// - Describe provisional entries the client synthesizes before the server confirms them.
//
// Notes
// - All timestamps are UTC. `duration` is whole seconds and only authoritative once stopped.
// - Server ids may arrive as JSON numbers or strings; both decode into a string id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display};
use thiserror::Error;

pub const TEMP_ID_PREFIX: &str = "temp-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryStatus {
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub task_id: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: i64,
    pub status: EntryStatus,
    #[serde(default)]
    pub is_billable: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TimeEntry {
    /// Running entry shown while the start request is in flight.
    pub fn provisional_timer(id: String, request: &StartTimer, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: None,
            task_id: request.task_id.clone(),
            project_id: request.project_id.clone(),
            description: request.description.clone(),
            start_time: now,
            end_time: None,
            duration: 0,
            status: EntryStatus::Running,
            is_billable: false,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Manually backfilled entry shown while the create request is in flight.
    pub fn provisional_entry(id: String, data: &NewTimeEntry, now: DateTime<Utc>) -> Self {
        let duration = data
            .end_time
            .map(|end| (end - data.start_time).num_seconds().max(0))
            .unwrap_or(0);
        Self {
            id,
            user_id: None,
            task_id: data.task_id.clone(),
            project_id: data.project_id.clone(),
            description: data.description.clone(),
            start_time: data.start_time,
            end_time: data.end_time,
            duration,
            status: if data.end_time.is_some() {
                EntryStatus::Stopped
            } else {
                EntryStatus::Running
            },
            is_billable: data.is_billable,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.id.starts_with(TEMP_ID_PREFIX)
    }

    pub fn is_running(&self) -> bool {
        self.status == EntryStatus::Running
    }

    /// Seconds tracked so far; live for a running entry, the recorded duration otherwise.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        match self.status {
            EntryStatus::Running => (now - self.start_time).num_seconds().max(0),
            EntryStatus::Stopped => self.duration,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartTimer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_billable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("start time cannot be in the future")]
    StartInFuture,

    #[error("end time cannot be in the future")]
    EndInFuture,

    #[error("end time must be after start time")]
    InvalidInterval,
}

impl NewTimeEntry {
    /// Caller-side checks run before a manual entry reaches the tracker.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if self.start_time > now {
            return Err(ValidationError::StartInFuture);
        }
        if let Some(end_time) = self.end_time {
            if end_time > now {
                return Err(ValidationError::EndInFuture);
            }
            if end_time <= self.start_time {
                return Err(ValidationError::InvalidInterval);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_billable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}
