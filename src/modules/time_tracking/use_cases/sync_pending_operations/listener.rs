// Replays the offline queue whenever connectivity comes back.
//
// Spawned once by the composition root and aborted on shutdown.

use crate::modules::time_tracking::use_cases::tracker::TimeTracker;
use crate::shared::infrastructure::connectivity::Connectivity;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct ConnectivityListener {
    handle: JoinHandle<()>,
}

impl ConnectivityListener {
    pub fn spawn(tracker: Arc<TimeTracker>) -> Self {
        let mut updates = tracker.connectivity().subscribe();
        let handle = tokio::spawn(async move {
            // Only transitions are published, so Online after a change means we were offline.
            while updates.changed().await.is_ok() {
                let reconnected = *updates.borrow_and_update() == Connectivity::Online;
                if reconnected {
                    tracing::info!("connectivity restored, replaying offline queue");
                    tracker.sync_pending_operations().await;
                }
            }
            tracing::debug!("connectivity source closed, listener stopped");
        });
        Self { handle }
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

impl TimeTracker {
    pub fn listen_for_connectivity(self: &Arc<Self>) -> ConnectivityListener {
        ConnectivityListener::spawn(Arc::clone(self))
    }
}
