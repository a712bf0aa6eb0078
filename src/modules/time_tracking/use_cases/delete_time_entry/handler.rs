// Delete an entry optimistically.
//
// The entry disappears locally at once. An online rejection brings back the whole list as it
// was; offline, the removal stands and the delete is queued for replay.

use crate::modules::time_tracking::core::outcome::ActionOutcome;
use crate::modules::time_tracking::core::pending_operation::OperationPayload;
use crate::modules::time_tracking::use_cases::optimistic::{OfflineEffect, OptimisticWrite, Rollback};
use crate::modules::time_tracking::use_cases::tracker::TimeTracker;
use crate::shared::infrastructure::notifier::Notification;

impl TimeTracker {
    pub async fn delete_time_entry(&self, id: &str) -> ActionOutcome {
        let mut previous = Vec::new();
        self.update(|state| {
            previous = state.time_entries.clone();
            state.remove_entry(id);
        });

        let outcome = self
            .run_optimistic(
                OptimisticWrite {
                    label: "delete_time_entry",
                    rollback: Rollback::Entries(previous),
                    offline_effect: OfflineEffect::Keep,
                    replay: OperationPayload::Delete { id: id.to_owned() },
                },
                self.service.delete_entry(id),
                |_, ()| {},
            )
            .await;

        if outcome == ActionOutcome::Synced {
            tracing::info!(%id, "time entry deleted");
            self.notify(Notification::success("Time entry deleted"));
        }
        outcome
    }
}
