// TimeTracker wired to in memory adapters, with handles kept for assertions.

use crate::modules::time_tracking::adapters::outbound::in_memory_queue_store::InMemoryQueueStore;
use crate::modules::time_tracking::adapters::outbound::in_memory_time_entry_service::InMemoryTimeEntryService;
use crate::modules::time_tracking::core::ports::TimeEntryService;
use crate::modules::time_tracking::use_cases::tracker::{TimeTracker, TrackerOptions};
use crate::shared::infrastructure::connectivity::ConnectivityMonitor;
use crate::shared::infrastructure::notifier::in_memory::InMemoryNotifier;
use crate::tests::fixtures::state_recording_service::StateRecordingService;
use std::sync::Arc;
use std::time::Duration;

pub struct TrackerHarness {
    pub tracker: Arc<TimeTracker>,
    pub service: Arc<InMemoryTimeEntryService>,
    pub queue_store: Arc<InMemoryQueueStore>,
    pub connectivity: ConnectivityMonitor,
    pub notifier: Arc<InMemoryNotifier>,
}

#[allow(dead_code)]
impl TrackerHarness {
    pub fn new() -> Self {
        Self::with_options(Self::options())
    }

    /// No backoff and no reconciliation, so call counts stay predictable.
    pub fn options() -> TrackerOptions {
        TrackerOptions {
            fetch_retries: 2,
            fetch_backoff: Duration::ZERO,
            max_replay_attempts: 3,
            reconcile_after_timer_change: false,
        }
    }

    pub fn with_options(options: TrackerOptions) -> Self {
        let service = Arc::new(InMemoryTimeEntryService::default());
        Self::build(service.clone(), service, options)
    }

    /// Tracker whose remote calls record the state visible while they are in flight.
    pub fn recording() -> (Self, Arc<StateRecordingService>) {
        let service = Arc::new(InMemoryTimeEntryService::default());
        let recorder = Arc::new(StateRecordingService::new(service.clone()));
        let harness = Self::build(service, recorder.clone(), Self::options());
        recorder.observe(harness.tracker.subscribe());
        (harness, recorder)
    }

    fn build(
        service: Arc<InMemoryTimeEntryService>,
        remote: Arc<dyn TimeEntryService>,
        options: TrackerOptions,
    ) -> Self {
        let queue_store = Arc::new(InMemoryQueueStore::new());
        let connectivity = ConnectivityMonitor::default();
        let notifier = Arc::new(InMemoryNotifier::new());
        let tracker = Arc::new(TimeTracker::new(
            remote,
            queue_store.clone(),
            Arc::new(connectivity.clone()),
            notifier.clone(),
            options,
        ));
        Self {
            tracker,
            service,
            queue_store,
            connectivity,
            notifier,
        }
    }

    pub fn go_offline(&self) {
        self.service.set_offline(true);
        self.connectivity.set_offline();
    }

    pub fn go_online(&self) {
        self.service.set_offline(false);
        self.connectivity.set_online();
    }
}
