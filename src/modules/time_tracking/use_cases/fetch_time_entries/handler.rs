// Read path: refresh the entry cache and the active timer from the time entry service.
//
// Responsibilities
// - Replace the cached list wholesale and recompute aggregates on success.
// - Keep the previous cache on failure and tell the user the load failed.
// - Keep `loading` raised for exactly the duration of the list request.

use crate::modules::time_tracking::core::time_entry::ListFilter;
use crate::modules::time_tracking::use_cases::fetch_time_entries::retry::retry_with_backoff;
use crate::modules::time_tracking::use_cases::tracker::TimeTracker;
use crate::shared::infrastructure::notifier::Notification;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load time entries";

impl TimeTracker {
    pub async fn fetch_time_entries(&self) {
        self.fetch_time_entries_filtered(&ListFilter::default()).await
    }

    pub async fn fetch_time_entries_filtered(&self, filter: &ListFilter) {
        self.update(|state| state.loading = true);
        let result = retry_with_backoff(
            self.options.fetch_retries,
            self.options.fetch_backoff,
            || self.service.list_entries(filter),
        )
        .await;
        match result {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "time entries loaded");
                self.update(|state| {
                    state.replace_entries(entries);
                    state.loading = false;
                });
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load time entries");
                self.update(|state| state.loading = false);
                self.notify(Notification::error(LOAD_FAILED_MESSAGE));
            }
        }
    }

    /// Failures leave the current timer in place and are only logged.
    pub async fn fetch_active_timer(&self) {
        match self.service.active_timer().await {
            Ok(active) => {
                tracing::debug!(active = ?active.as_ref().map(|entry| &entry.id), "active timer loaded");
                self.update(|state| state.active_timer = active);
            }
            Err(error) => tracing::warn!(%error, "failed to load active timer"),
        }
    }
}
