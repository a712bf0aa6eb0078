// Optimistic write: speculate locally, call the service, then settle or revert.
//
// The caller applies the speculative change before handing over the request future, so the
// change is visible to readers before the network is touched. This module decides what happens
// once the service answers.

use crate::modules::time_tracking::core::outcome::ActionOutcome;
use crate::modules::time_tracking::core::pending_operation::OperationPayload;
use crate::modules::time_tracking::core::ports::RemoteError;
use crate::modules::time_tracking::core::state::TrackerState;
use crate::modules::time_tracking::core::time_entry::TimeEntry;
use crate::modules::time_tracking::use_cases::tracker::TimeTracker;
use crate::shared::infrastructure::notifier::Notification;
use std::future::Future;

/// How to undo a speculative change.
#[derive(Debug, Clone, PartialEq)]
pub enum Rollback {
    ActiveTimer(Option<TimeEntry>),
    Entries(Vec<TimeEntry>),
    DiscardEntry(String),
}

impl Rollback {
    pub fn revert(self, state: &mut TrackerState) {
        match self {
            Rollback::ActiveTimer(previous) => state.active_timer = previous,
            Rollback::Entries(previous) => state.replace_entries(previous),
            Rollback::DiscardEntry(id) => {
                state.remove_entry(&id);
            }
        }
    }
}

/// What to do with the speculative change when the write is queued for later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineEffect {
    Revert,
    Keep,
}

pub struct OptimisticWrite {
    pub label: &'static str,
    pub rollback: Rollback,
    pub offline_effect: OfflineEffect,
    pub replay: OperationPayload,
}

impl TimeTracker {
    pub(crate) async fn run_optimistic<T, F>(
        &self,
        write: OptimisticWrite,
        request: F,
        settle: impl FnOnce(&mut TrackerState, T),
    ) -> ActionOutcome
    where
        F: Future<Output = Result<T, RemoteError>>,
    {
        match request.await {
            Ok(confirmed) => {
                self.update(|state| settle(state, confirmed));
                ActionOutcome::Synced
            }
            Err(error) if self.is_offline_failure(&error) => {
                tracing::info!(operation = write.label, %error, "service unreachable, queueing");
                if write.offline_effect == OfflineEffect::Revert {
                    self.update(|state| write.rollback.revert(state));
                }
                self.enqueue(write.replay).await;
                ActionOutcome::SavedOffline
            }
            Err(error) => {
                tracing::warn!(operation = write.label, %error, "service rejected, rolling back");
                self.update(|state| write.rollback.revert(state));
                let message = error.user_message();
                self.notify(Notification::error(message.clone()));
                ActionOutcome::Failed(message)
            }
        }
    }
}
