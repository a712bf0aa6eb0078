// The time tracking store: one explicit object owned by the composition root.
//
// Purpose
// - Own the entry cache, the active timer, the offline queue and the aggregates.
// - Expose the mutating operations (each in its own use case module) and read access to state.
//
// Responsibilities
// - Keep state in a watch channel so readers get consistent snapshots and change notifications.
// - Persist the offline queue after every queue mutation.
//
// Boundaries
// - Remote calls go through TimeEntryService, storage through QueueStore, online detection
//   through ConnectivityProbe and user feedback through Notifier. No concrete adapters here.
//
// Testing guidance
// - Build with in memory adapters and a ConnectivityMonitor; see tests::fixtures::tracker.

use crate::modules::time_tracking::core::ids::ClientIds;
use crate::modules::time_tracking::core::pending_operation::{OperationPayload, PendingOperation};
use crate::modules::time_tracking::core::ports::{
    QueueStore, QueueStoreError, RemoteError, TimeEntryService,
};
use crate::modules::time_tracking::core::state::TrackerState;
use crate::modules::time_tracking::core::stats::TimeStats;
use crate::modules::time_tracking::core::time_entry::TimeEntry;
use crate::shared::infrastructure::connectivity::ConnectivityProbe;
use crate::shared::infrastructure::notifier::{Notification, Notifier};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};

pub const SAVED_OFFLINE_MESSAGE: &str = "Saved offline. Will sync when back online";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerOptions {
    /// Extra attempts for transient read failures.
    pub fetch_retries: u32,
    /// Base delay between read attempts, doubled per attempt.
    pub fetch_backoff: Duration,
    /// Failed replays an operation may accumulate before it is dead-lettered.
    pub max_replay_attempts: u32,
    /// Re-read the active timer from the server after start and stop.
    pub reconcile_after_timer_change: bool,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            fetch_retries: 3,
            fetch_backoff: Duration::from_millis(500),
            max_replay_attempts: 5,
            reconcile_after_timer_change: true,
        }
    }
}

pub struct TimeTracker {
    pub(crate) service: Arc<dyn TimeEntryService>,
    queue_store: Arc<dyn QueueStore>,
    connectivity: Arc<dyn ConnectivityProbe>,
    notifier: Arc<dyn Notifier>,
    pub(crate) options: TrackerOptions,
    pub(crate) ids: ClientIds,
    state: watch::Sender<TrackerState>,
    persist_lock: Mutex<()>,
}

impl TimeTracker {
    pub fn new(
        service: Arc<dyn TimeEntryService>,
        queue_store: Arc<dyn QueueStore>,
        connectivity: Arc<dyn ConnectivityProbe>,
        notifier: Arc<dyn Notifier>,
        options: TrackerOptions,
    ) -> Self {
        let (state, _) = watch::channel(TrackerState::default());
        Self {
            service,
            queue_store,
            connectivity,
            notifier,
            options,
            ids: ClientIds::default(),
            state,
            persist_lock: Mutex::new(()),
        }
    }

    /// Reload the offline queue persisted by a previous run. Returns the number of pending
    /// operations recovered.
    pub async fn restore(&self) -> Result<usize, QueueStoreError> {
        let queue = self.queue_store.load().await?;
        let restored = queue.pending_operations.len();
        self.update(|state| {
            state.pending_operations = queue.pending_operations;
            state.failed_operations = queue.failed_operations;
        });
        tracing::info!(
            pending = restored,
            failed = self.state.borrow().failed_operations.len(),
            "offline queue restored"
        );
        Ok(restored)
    }

    pub fn snapshot(&self) -> TrackerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TrackerState> {
        self.state.subscribe()
    }

    pub fn connectivity(&self) -> Arc<dyn ConnectivityProbe> {
        self.connectivity.clone()
    }

    pub fn active_timer(&self) -> Option<TimeEntry> {
        self.state.borrow().active_timer.clone()
    }

    pub fn time_entries(&self) -> Vec<TimeEntry> {
        self.state.borrow().time_entries.clone()
    }

    pub fn stats(&self) -> TimeStats {
        self.state.borrow().stats
    }

    pub fn pending_operations(&self) -> Vec<PendingOperation> {
        self.state.borrow().pending_operations.clone()
    }

    pub fn failed_operations(&self) -> Vec<PendingOperation> {
        self.state.borrow().failed_operations.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn is_syncing(&self) -> bool {
        self.state.borrow().syncing
    }

    /// Move dead-lettered operations back to the tail of the queue with a fresh retry budget.
    pub async fn retry_failed_operations(&self) -> usize {
        let mut moved = 0;
        self.update(|state| {
            let mut failed = std::mem::take(&mut state.failed_operations);
            moved = failed.len();
            for operation in failed.iter_mut() {
                operation.retries = 0;
            }
            state.pending_operations.append(&mut failed);
        });
        if moved > 0 {
            tracing::info!(moved, "failed operations requeued");
            self.persist_queue().await;
        }
        moved
    }

    pub async fn discard_failed_operations(&self) -> usize {
        let mut discarded = 0;
        self.update(|state| {
            discarded = state.failed_operations.len();
            state.failed_operations.clear();
        });
        if discarded > 0 {
            tracing::info!(discarded, "failed operations discarded");
            self.persist_queue().await;
        }
        discarded
    }

    pub(crate) fn update(&self, mutate: impl FnOnce(&mut TrackerState)) {
        self.state.send_modify(mutate);
    }

    pub(crate) fn update_if(&self, mutate: impl FnOnce(&mut TrackerState) -> bool) -> bool {
        self.state.send_if_modified(mutate)
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// A failed write counts as offline when the request never got an answer or the probe says so.
    pub(crate) fn is_offline_failure(&self, error: &RemoteError) -> bool {
        error.is_connectivity() || !self.connectivity.is_online()
    }

    /// Queue persistence failures are logged; the in-memory queue stays authoritative for the run.
    /// Saves are serialized and snapshot under the lock, so the last write always holds the
    /// latest queue.
    pub(crate) async fn persist_queue(&self) {
        let _guard = self.persist_lock.lock().await;
        let queue = self.state.borrow().persisted_queue();
        if let Err(error) = self.queue_store.save(&queue).await {
            tracing::warn!(%error, "failed to persist offline queue");
        }
    }

    pub(crate) async fn enqueue(&self, payload: OperationPayload) {
        let now = Utc::now();
        let operation = PendingOperation::new(self.ids.operation_id(payload.kind(), now), payload, now);
        tracing::info!(
            operation_id = %operation.id,
            kind = %operation.kind(),
            "operation queued for replay"
        );
        self.update(|state| state.pending_operations.push(operation));
        self.persist_queue().await;
        self.notify(Notification::info(SAVED_OFFLINE_MESSAGE));
    }
}
