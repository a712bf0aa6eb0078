// Edit an existing entry. Not optimistic: the cache is refreshed from the service once the
// update is accepted, and left alone when it is not.

use crate::modules::time_tracking::core::outcome::ActionOutcome;
use crate::modules::time_tracking::core::time_entry::TimeEntryPatch;
use crate::modules::time_tracking::use_cases::tracker::TimeTracker;
use crate::shared::infrastructure::notifier::Notification;

impl TimeTracker {
    pub async fn update_time_entry(&self, id: &str, changes: TimeEntryPatch) -> ActionOutcome {
        match self.service.update_entry(id, &changes).await {
            Ok(()) => {
                tracing::info!(%id, "time entry updated");
                self.notify(Notification::success("Time entry updated"));
                self.fetch_time_entries().await;
                ActionOutcome::Synced
            }
            Err(error) => {
                tracing::warn!(%id, %error, "time entry update failed");
                let message = error.user_message();
                self.notify(Notification::error(message.clone()));
                ActionOutcome::Failed(message)
            }
        }
    }
}
