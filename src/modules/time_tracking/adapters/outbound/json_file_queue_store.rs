// QueueStore backed by a JSON file in the application data directory.
//
// The record lives at `<dir>/time-tracking-storage.json`. Writes go to a sibling temp file
// first and are renamed into place, so a crash mid-write never leaves a truncated queue.
// Writers share one staging path, so clones share a lock around write and rename.

use crate::modules::time_tracking::core::pending_operation::PersistedQueue;
use crate::modules::time_tracking::core::ports::{QueueStore, QueueStoreError, STORAGE_KEY};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct JsonFileQueueStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileQueueStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QueueStore for JsonFileQueueStore {
    async fn load(&self) -> Result<PersistedQueue, QueueStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(PersistedQueue::default()),
            Err(error) => Err(error.into()),
        }
    }

    async fn save(&self, queue: &PersistedQueue) -> Result<(), QueueStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(queue)?;
        let _guard = self.write_lock.lock().await;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        tracing::debug!(
            path = %self.path.display(),
            pending = queue.pending_operations.len(),
            "offline queue written"
        );
        Ok(())
    }
}
