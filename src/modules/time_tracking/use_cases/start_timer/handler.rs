// Start a timer optimistically.
//
// A provisional running entry becomes the active timer before the request is sent. The server
// entry replaces it on success. Offline, the provisional timer is withdrawn and the start is
// queued with its original payload.

use crate::modules::time_tracking::core::outcome::ActionOutcome;
use crate::modules::time_tracking::core::pending_operation::OperationPayload;
use crate::modules::time_tracking::core::time_entry::{StartTimer, TimeEntry};
use crate::modules::time_tracking::use_cases::optimistic::{OfflineEffect, OptimisticWrite, Rollback};
use crate::modules::time_tracking::use_cases::tracker::TimeTracker;
use crate::shared::infrastructure::notifier::Notification;
use chrono::Utc;

impl TimeTracker {
    pub async fn start_timer(&self, request: StartTimer) -> ActionOutcome {
        let now = Utc::now();
        let provisional = TimeEntry::provisional_timer(self.ids.temp_id(now), &request, now);
        let mut previous = None;
        self.update(|state| previous = state.active_timer.replace(provisional));

        let outcome = self
            .run_optimistic(
                OptimisticWrite {
                    label: "start_timer",
                    rollback: Rollback::ActiveTimer(previous),
                    offline_effect: OfflineEffect::Revert,
                    replay: OperationPayload::Start(request.clone()),
                },
                self.service.start_timer(&request),
                |state, started: TimeEntry| state.active_timer = Some(started),
            )
            .await;

        if outcome == ActionOutcome::Synced {
            tracing::info!(id = ?self.active_timer().map(|entry| entry.id), "timer started");
            self.notify(Notification::success("Timer started"));
            if self.options.reconcile_after_timer_change {
                self.fetch_active_timer().await;
            }
        }
        outcome
    }
}
