// Backfill a manual entry optimistically.
//
// A provisional entry with a temp id is shown at the head of the list while the request is in
// flight, then swapped in place for the server entry. Offline or rejected, it is withdrawn.
// Callers validate the entry (NewTimeEntry::validate) before handing it over.

use crate::modules::time_tracking::core::outcome::ActionOutcome;
use crate::modules::time_tracking::core::pending_operation::OperationPayload;
use crate::modules::time_tracking::core::time_entry::{NewTimeEntry, TimeEntry};
use crate::modules::time_tracking::use_cases::optimistic::{OfflineEffect, OptimisticWrite, Rollback};
use crate::modules::time_tracking::use_cases::tracker::TimeTracker;
use crate::shared::infrastructure::notifier::Notification;
use chrono::Utc;

impl TimeTracker {
    pub async fn create_time_entry(&self, data: NewTimeEntry) -> ActionOutcome {
        let now = Utc::now();
        let temp_id = self.ids.temp_id(now);
        let provisional = TimeEntry::provisional_entry(temp_id.clone(), &data, now);
        self.update(|state| state.upsert_front(provisional));

        let outcome = self
            .run_optimistic(
                OptimisticWrite {
                    label: "create_time_entry",
                    rollback: Rollback::DiscardEntry(temp_id.clone()),
                    offline_effect: OfflineEffect::Revert,
                    replay: OperationPayload::Create(data.clone()),
                },
                self.service.create_entry(&data),
                |state, created: TimeEntry| {
                    if !state.replace_entry(&temp_id, created.clone()) {
                        state.upsert_front(created);
                    }
                },
            )
            .await;

        if outcome == ActionOutcome::Synced {
            tracing::info!(%temp_id, "time entry created");
            self.notify(Notification::success("Time entry created"));
        }
        outcome
    }
}
