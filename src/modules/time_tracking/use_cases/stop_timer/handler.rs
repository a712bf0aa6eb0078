// Stop the active timer optimistically.
//
// The timer is cleared locally before the request is sent. Offline, the local stop stands and
// the stop is queued against the timer id; an online rejection brings the timer back.

use crate::modules::time_tracking::core::outcome::{ActionOutcome, NO_ACTIVE_TIMER};
use crate::modules::time_tracking::core::pending_operation::OperationPayload;
use crate::modules::time_tracking::core::time_entry::TimeEntry;
use crate::modules::time_tracking::use_cases::optimistic::{OfflineEffect, OptimisticWrite, Rollback};
use crate::modules::time_tracking::use_cases::tracker::TimeTracker;
use crate::shared::infrastructure::notifier::Notification;

impl TimeTracker {
    pub async fn stop_timer(&self) -> ActionOutcome {
        let mut previous = None;
        self.update_if(|state| {
            previous = state.active_timer.take();
            previous.is_some()
        });
        let Some(previous) = previous else {
            return ActionOutcome::Failed(NO_ACTIVE_TIMER.into());
        };
        let id = previous.id.clone();

        let outcome = self
            .run_optimistic(
                OptimisticWrite {
                    label: "stop_timer",
                    rollback: Rollback::ActiveTimer(Some(previous)),
                    offline_effect: OfflineEffect::Keep,
                    replay: OperationPayload::Stop { id: id.clone() },
                },
                self.service.stop_timer(&id),
                |state, stopped: TimeEntry| state.upsert_front(stopped),
            )
            .await;

        if outcome == ActionOutcome::Synced {
            tracing::info!(%id, "timer stopped");
            self.notify(Notification::success("Timer stopped"));
            if self.options.reconcile_after_timer_change {
                self.fetch_active_timer().await;
            }
        }
        outcome
    }
}
