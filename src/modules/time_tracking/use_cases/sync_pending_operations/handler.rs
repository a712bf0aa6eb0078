// Replay the offline queue against the time entry service.
//
// Responsibilities
// - Replay strictly in enqueue order, removing an operation only after its replay succeeded.
// - Halt on the first failure so later operations never overtake an earlier one.
// - Count rejected replays and dead-letter an operation once it reaches the ceiling.
// - Refresh the entry list and active timer once the drain is over.
//
// Boundaries
// - Only one drain runs at a time: `syncing` is checked and raised in one state update.

use crate::modules::time_tracking::core::pending_operation::{OperationPayload, PendingOperation};
use crate::modules::time_tracking::core::ports::RemoteError;
use crate::modules::time_tracking::use_cases::tracker::TimeTracker;
use crate::shared::infrastructure::notifier::Notification;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub replayed: usize,
    pub remaining: usize,
    pub dead_lettered: usize,
}

enum ReplayStep {
    Continue,
    Halt,
}

impl TimeTracker {
    /// Returns `None` when there was nothing to do or a drain was already running.
    pub async fn sync_pending_operations(&self) -> Option<SyncReport> {
        let started = self.update_if(|state| {
            if state.syncing || state.pending_operations.is_empty() {
                return false;
            }
            state.syncing = true;
            true
        });
        if !started {
            return None;
        }

        let mut report = SyncReport::default();
        tracing::info!(pending = self.pending_operations().len(), "replaying offline queue");
        while let Some(operation) = self.pending_operations().into_iter().next() {
            match self.replay(&operation).await {
                Ok(()) => {
                    tracing::info!(operation_id = %operation.id, kind = %operation.kind(), "operation replayed");
                    self.update(|state| {
                        state.pending_operations.retain(|queued| queued.id != operation.id)
                    });
                    self.persist_queue().await;
                    report.replayed += 1;
                }
                Err(error) => match self.record_replay_failure(operation, &error, &mut report).await {
                    ReplayStep::Continue => continue,
                    ReplayStep::Halt => break,
                },
            }
        }

        report.remaining = self.pending_operations().len();
        self.update(|state| state.syncing = false);
        tracing::info!(?report, "offline queue replay finished");
        if report.replayed > 0 {
            self.notify(Notification::success(format!(
                "Synced {} offline change(s)",
                report.replayed
            )));
        }

        self.fetch_time_entries().await;
        self.fetch_active_timer().await;
        Some(report)
    }

    async fn replay(&self, operation: &PendingOperation) -> Result<(), RemoteError> {
        match &operation.payload {
            OperationPayload::Start(request) => self.service.start_timer(request).await.map(drop),
            OperationPayload::Stop { id } => self.service.stop_timer(id).await.map(drop),
            OperationPayload::Create(data) => self.service.create_entry(data).await.map(drop),
            OperationPayload::Delete { id } => self.service.delete_entry(id).await,
            OperationPayload::Update { id, changes } => {
                self.service.update_entry(id, changes).await
            }
        }
    }

    async fn record_replay_failure(
        &self,
        operation: PendingOperation,
        error: &RemoteError,
        report: &mut SyncReport,
    ) -> ReplayStep {
        if self.is_offline_failure(error) {
            tracing::warn!(operation_id = %operation.id, %error, "service unreachable, replay halted");
            return ReplayStep::Halt;
        }

        let retries = operation.retries.saturating_add(1);
        if retries >= self.options.max_replay_attempts {
            tracing::warn!(operation_id = %operation.id, retries, %error, "replay ceiling reached, dead-lettering");
            self.update(|state| {
                if let Some(position) = state
                    .pending_operations
                    .iter()
                    .position(|queued| queued.id == operation.id)
                {
                    let mut failed = state.pending_operations.remove(position);
                    failed.retries = retries;
                    state.failed_operations.push(failed);
                }
            });
            self.persist_queue().await;
            report.dead_lettered += 1;
            self.notify(Notification::error(format!(
                "Could not sync offline {}: {}",
                operation.kind(),
                error.user_message()
            )));
            return ReplayStep::Continue;
        }

        tracing::warn!(operation_id = %operation.id, retries, %error, "replay failed, halting");
        self.update(|state| {
            if let Some(queued) = state
                .pending_operations
                .iter_mut()
                .find(|queued| queued.id == operation.id)
            {
                queued.retries = retries;
            }
        });
        self.persist_queue().await;
        ReplayStep::Halt
    }
}
