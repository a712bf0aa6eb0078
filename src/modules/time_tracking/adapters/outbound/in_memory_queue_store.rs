// In memory implementation of the QueueStore port.
//
// Holds the serialized record under the storage key, so tests exercise the same JSON layout the
// file store writes.

use crate::modules::time_tracking::core::pending_operation::PersistedQueue;
use crate::modules::time_tracking::core::ports::{QueueStore, QueueStoreError, STORAGE_KEY};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryQueueStore {
    records: RwLock<HashMap<String, String>>,
    is_offline: AtomicBool,
}

impl InMemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    /// Raw JSON record as it would sit in durable storage.
    pub async fn raw(&self) -> Option<String> {
        self.records.read().await.get(STORAGE_KEY).cloned()
    }

    fn ensure_online(&self) -> Result<(), QueueStoreError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(QueueStoreError::Backend("Queue store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl QueueStore for InMemoryQueueStore {
    async fn load(&self) -> Result<PersistedQueue, QueueStoreError> {
        self.ensure_online()?;
        match self.records.read().await.get(STORAGE_KEY) {
            Some(raw) => Ok(serde_json::from_str(raw)?),
            None => Ok(PersistedQueue::default()),
        }
    }

    async fn save(&self, queue: &PersistedQueue) -> Result<(), QueueStoreError> {
        self.ensure_online()?;
        let raw = serde_json::to_string(queue)?;
        self.records.write().await.insert(STORAGE_KEY.to_owned(), raw);
        Ok(())
    }
}
