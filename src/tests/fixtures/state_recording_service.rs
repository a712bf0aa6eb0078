// TimeEntryService decorator that captures the tracker state each remote call observes.

use crate::modules::time_tracking::adapters::outbound::in_memory_time_entry_service::{
    InMemoryTimeEntryService, ServiceCall,
};
use crate::modules::time_tracking::core::ports::{RemoteError, TimeEntryService};
use crate::modules::time_tracking::core::state::TrackerState;
use crate::modules::time_tracking::core::time_entry::{
    ListFilter, NewTimeEntry, StartTimer, TimeEntry, TimeEntryPatch,
};
use async_trait::async_trait;
use std::sync::{Arc, OnceLock};
use tokio::sync::{RwLock, watch};

#[derive(Debug, Clone, PartialEq)]
pub struct ObservedState {
    pub call: ServiceCall,
    pub loading: bool,
    pub active_timer: Option<String>,
    pub entry_ids: Vec<String>,
}

pub struct StateRecordingService {
    inner: Arc<InMemoryTimeEntryService>,
    tracker_state: OnceLock<watch::Receiver<TrackerState>>,
    observed: RwLock<Vec<ObservedState>>,
}

#[allow(dead_code)]
impl StateRecordingService {
    pub fn new(inner: Arc<InMemoryTimeEntryService>) -> Self {
        Self {
            inner,
            tracker_state: OnceLock::new(),
            observed: RwLock::new(Vec::new()),
        }
    }

    pub fn observe(&self, state: watch::Receiver<TrackerState>) {
        let _ = self.tracker_state.set(state);
    }

    pub async fn observed(&self) -> Vec<ObservedState> {
        self.observed.read().await.clone()
    }

    pub async fn observed_on(&self, call: ServiceCall) -> Option<ObservedState> {
        self.observed
            .read()
            .await
            .iter()
            .find(|observed| observed.call == call)
            .cloned()
    }

    async fn record(&self, call: ServiceCall) {
        let Some(receiver) = self.tracker_state.get() else {
            return;
        };
        let observed = {
            let state = receiver.borrow();
            ObservedState {
                call,
                loading: state.loading,
                active_timer: state.active_timer.as_ref().map(|entry| entry.id.clone()),
                entry_ids: state.time_entries.iter().map(|entry| entry.id.clone()).collect(),
            }
        };
        self.observed.write().await.push(observed);
    }
}

#[async_trait]
impl TimeEntryService for StateRecordingService {
    async fn list_entries(&self, filter: &ListFilter) -> Result<Vec<TimeEntry>, RemoteError> {
        self.record(ServiceCall::ListEntries).await;
        self.inner.list_entries(filter).await
    }

    async fn active_timer(&self) -> Result<Option<TimeEntry>, RemoteError> {
        self.record(ServiceCall::ActiveTimer).await;
        self.inner.active_timer().await
    }

    async fn start_timer(&self, request: &StartTimer) -> Result<TimeEntry, RemoteError> {
        self.record(ServiceCall::StartTimer).await;
        self.inner.start_timer(request).await
    }

    async fn stop_timer(&self, id: &str) -> Result<TimeEntry, RemoteError> {
        self.record(ServiceCall::StopTimer).await;
        self.inner.stop_timer(id).await
    }

    async fn create_entry(&self, data: &NewTimeEntry) -> Result<TimeEntry, RemoteError> {
        self.record(ServiceCall::CreateEntry).await;
        self.inner.create_entry(data).await
    }

    async fn update_entry(&self, id: &str, changes: &TimeEntryPatch) -> Result<(), RemoteError> {
        self.record(ServiceCall::UpdateEntry).await;
        self.inner.update_entry(id, changes).await
    }

    async fn delete_entry(&self, id: &str) -> Result<(), RemoteError> {
        self.record(ServiceCall::DeleteEntry).await;
        self.inner.delete_entry(id).await
    }
}
