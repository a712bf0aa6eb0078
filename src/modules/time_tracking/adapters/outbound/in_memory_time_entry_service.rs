// In memory implementation of the TimeEntryService port.
//
// Purpose
// - Stand in for the remote time entry API in tests and local development.
//
// Responsibilities
// - Behave like the server: assign durable ids, keep at most one running timer per user
//   (starting a new timer stops the running one), finalize duration on stop.
// - Let tests go offline, script failures per call and count calls.

use crate::modules::time_tracking::core::ports::{RemoteError, TimeEntryService};
use crate::modules::time_tracking::core::time_entry::{
    EntryStatus, ListFilter, NewTimeEntry, StartTimer, TimeEntry, TimeEntryPatch,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceCall {
    ListEntries,
    ActiveTimer,
    StartTimer,
    StopTimer,
    CreateEntry,
    UpdateEntry,
    DeleteEntry,
}

pub struct InMemoryTimeEntryService {
    user_id: String,
    entries: RwLock<Vec<TimeEntry>>,
    is_offline: AtomicBool,
    calls: Mutex<Vec<ServiceCall>>,
    failures: Mutex<HashMap<ServiceCall, VecDeque<RemoteError>>>,
    next_ids: Mutex<VecDeque<String>>,
}

impl Default for InMemoryTimeEntryService {
    fn default() -> Self {
        Self::new("user-fixed-0001")
    }
}

impl InMemoryTimeEntryService {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            entries: RwLock::new(Vec::new()),
            is_offline: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            next_ids: Mutex::new(VecDeque::new()),
        }
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn set_offline(&self, offline: bool) {
        self.is_offline.store(offline, Ordering::SeqCst);
    }

    pub async fn seed(&self, entries: Vec<TimeEntry>) {
        self.entries.write().await.extend(entries);
    }

    pub async fn entries(&self) -> Vec<TimeEntry> {
        self.entries.read().await.clone()
    }

    /// Make the next `call` fail with `error`. Queued failures are consumed in order.
    pub async fn fail_next(&self, call: ServiceCall, error: RemoteError) {
        self.failures
            .lock()
            .await
            .entry(call)
            .or_default()
            .push_back(error);
    }

    /// Id handed to the next entry the service creates, instead of a generated one.
    pub async fn assign_next_id(&self, id: impl Into<String>) {
        self.next_ids.lock().await.push_back(id.into());
    }

    pub async fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self, call: ServiceCall) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|recorded| **recorded == call)
            .count()
    }

    async fn begin(&self, call: ServiceCall) -> Result<(), RemoteError> {
        self.calls.lock().await.push(call);
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Unreachable(
                "time entry service offline".into(),
            ));
        }
        let scripted = self
            .failures
            .lock()
            .await
            .get_mut(&call)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn next_id(&self) -> String {
        match self.next_ids.lock().await.pop_front() {
            Some(id) => id,
            None => Uuid::now_v7().to_string(),
        }
    }

    fn not_found(id: &str) -> RemoteError {
        RemoteError::Rejected {
            status: 404,
            message: format!("Time entry {id} not found"),
        }
    }
}

fn finalize(entry: &mut TimeEntry, end_time: DateTime<Utc>) {
    entry.end_time = Some(end_time);
    entry.duration = (end_time - entry.start_time).num_seconds().max(0);
    entry.status = EntryStatus::Stopped;
    entry.updated_at = Some(end_time);
}

fn matches_filter(entry: &TimeEntry, filter: &ListFilter) -> bool {
    let day = entry.start_time.date_naive();
    filter.start_date.is_none_or(|start| day >= start)
        && filter.end_date.is_none_or(|end| day <= end)
        && filter
            .employee_id
            .as_ref()
            .is_none_or(|employee| entry.user_id.as_ref() == Some(employee))
}

#[async_trait]
impl TimeEntryService for InMemoryTimeEntryService {
    async fn list_entries(&self, filter: &ListFilter) -> Result<Vec<TimeEntry>, RemoteError> {
        self.begin(ServiceCall::ListEntries).await?;
        let mut entries: Vec<TimeEntry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|entry| matches_filter(entry, filter))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(entries)
    }

    async fn active_timer(&self) -> Result<Option<TimeEntry>, RemoteError> {
        self.begin(ServiceCall::ActiveTimer).await?;
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .find(|entry| entry.is_running() && entry.user_id.as_ref() == Some(&self.user_id))
            .cloned())
    }

    async fn start_timer(&self, request: &StartTimer) -> Result<TimeEntry, RemoteError> {
        self.begin(ServiceCall::StartTimer).await?;
        let now = Utc::now();
        let id = self.next_id().await;
        let mut entries = self.entries.write().await;
        for running in entries
            .iter_mut()
            .filter(|entry| entry.is_running() && entry.user_id.as_ref() == Some(&self.user_id))
        {
            finalize(running, now);
        }
        let entry = TimeEntry {
            id,
            user_id: Some(self.user_id.clone()),
            task_id: request.task_id.clone(),
            project_id: request.project_id.clone(),
            description: request.description.clone(),
            start_time: now,
            end_time: None,
            duration: 0,
            status: EntryStatus::Running,
            is_billable: true,
            created_at: Some(now),
            updated_at: Some(now),
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn stop_timer(&self, id: &str) -> Result<TimeEntry, RemoteError> {
        self.begin(ServiceCall::StopTimer).await?;
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        // Stopping twice answers with the already finalized entry so replays stay harmless.
        if entry.is_running() {
            finalize(entry, Utc::now());
        }
        Ok(entry.clone())
    }

    async fn create_entry(&self, data: &NewTimeEntry) -> Result<TimeEntry, RemoteError> {
        self.begin(ServiceCall::CreateEntry).await?;
        if data.end_time.is_some_and(|end| end <= data.start_time) {
            return Err(RemoteError::Rejected {
                status: 422,
                message: "The end time must be after the start time.".into(),
            });
        }
        let now = Utc::now();
        let mut entry = TimeEntry::provisional_entry(self.next_id().await, data, now);
        entry.user_id = Some(self.user_id.clone());
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(&self, id: &str, changes: &TimeEntryPatch) -> Result<(), RemoteError> {
        self.begin(ServiceCall::UpdateEntry).await?;
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        if let Some(task_id) = &changes.task_id {
            entry.task_id = Some(task_id.clone());
        }
        if let Some(project_id) = &changes.project_id {
            entry.project_id = Some(project_id.clone());
        }
        if let Some(description) = &changes.description {
            entry.description = Some(description.clone());
        }
        if let Some(is_billable) = changes.is_billable {
            entry.is_billable = is_billable;
        }
        if let Some(start_time) = changes.start_time {
            entry.start_time = start_time;
        }
        if let Some(end_time) = changes.end_time {
            finalize(entry, end_time);
        } else if let Some(end_time) = entry.end_time {
            entry.duration = (end_time - entry.start_time).num_seconds().max(0);
        }
        entry.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn delete_entry(&self, id: &str) -> Result<(), RemoteError> {
        self.begin(ServiceCall::DeleteEntry).await?;
        let mut entries = self.entries.write().await;
        let position = entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        entries.remove(position);
        Ok(())
    }
}
