// Ports define what the tracker needs from the outside world, without implementing it.
//
// Purpose
// - TimeEntryService: the remote time entry API (authoritative for entries and the running timer).
// - QueueStore: durable local storage for the offline queue.
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits in the adapters layer.
//
// Testing guidance
// - In memory implementations live next to the real ones and can be switched offline.

use crate::modules::time_tracking::core::pending_operation::PersistedQueue;
use crate::modules::time_tracking::core::time_entry::{
    ListFilter, NewTimeEntry, StartTimer, TimeEntry, TimeEntryPatch,
};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("service unreachable: {0}")]
    Unreachable(String),

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// The request never got an answer from the service.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, RemoteError::Unreachable(_))
    }

    /// Worth retrying on the read path.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Unreachable(_) => true,
            RemoteError::Rejected { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            RemoteError::Decode(_) => false,
        }
    }

    /// Server-provided message where there is one.
    pub fn user_message(&self) -> String {
        match self {
            RemoteError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
pub trait TimeEntryService: Send + Sync {
    async fn list_entries(&self, filter: &ListFilter) -> Result<Vec<TimeEntry>, RemoteError>;
    async fn active_timer(&self) -> Result<Option<TimeEntry>, RemoteError>;
    async fn start_timer(&self, request: &StartTimer) -> Result<TimeEntry, RemoteError>;
    async fn stop_timer(&self, id: &str) -> Result<TimeEntry, RemoteError>;
    async fn create_entry(&self, data: &NewTimeEntry) -> Result<TimeEntry, RemoteError>;
    async fn update_entry(&self, id: &str, changes: &TimeEntryPatch) -> Result<(), RemoteError>;
    async fn delete_entry(&self, id: &str) -> Result<(), RemoteError>;
}

pub const STORAGE_KEY: &str = "time-tracking-storage";

#[derive(Debug, Error)]
pub enum QueueStoreError {
    #[error("queue storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("queue record is not valid json: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait QueueStore: Send + Sync {
    async fn load(&self) -> Result<PersistedQueue, QueueStoreError>;
    async fn save(&self, queue: &PersistedQueue) -> Result<(), QueueStoreError>;
}
