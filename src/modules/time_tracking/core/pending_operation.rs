// Durable record of a mutation that could not reach the time entry service.
//
// Purpose
// - Carry everything needed to replay the mutation once connectivity returns.
//
// Persisted layout
// - { "id": "start-1700000000000", "type": "start", "data": { ... }, "timestamp": "...", "retries": 0 }
// - The queue record holds only pending (and dead-lettered) operations, never entries or the timer.

use crate::modules::time_tracking::core::time_entry::{NewTimeEntry, StartTimer, TimeEntryPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    Start,
    Stop,
    Create,
    Delete,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum OperationPayload {
    Start(StartTimer),
    Stop { id: String },
    Create(NewTimeEntry),
    Delete { id: String },
    Update { id: String, changes: TimeEntryPatch },
}

impl OperationPayload {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationPayload::Start(_) => OperationKind::Start,
            OperationPayload::Stop { .. } => OperationKind::Stop,
            OperationPayload::Create(_) => OperationKind::Create,
            OperationPayload::Delete { .. } => OperationKind::Delete,
            OperationPayload::Update { .. } => OperationKind::Update,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOperation {
    pub id: String,
    #[serde(flatten)]
    pub payload: OperationPayload,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub retries: u32,
}

impl PendingOperation {
    pub fn new(id: String, payload: OperationPayload, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            payload,
            timestamp,
            retries: 0,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.payload.kind()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedQueue {
    #[serde(default)]
    pub pending_operations: Vec<PendingOperation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_operations: Vec<PendingOperation>,
}

impl PersistedQueue {
    pub fn is_empty(&self) -> bool {
        self.pending_operations.is_empty() && self.failed_operations.is_empty()
    }
}
