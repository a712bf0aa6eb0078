use async_graphql::{Context, ID, Object, Result as GqlResult, SimpleObject};
use chrono::{DateTime, Utc};

use crate::modules::time_tracking::core::outcome::ActionOutcome;
use crate::modules::time_tracking::core::pending_operation::PendingOperation;
use crate::modules::time_tracking::core::time_entry::{
    NewTimeEntry, StartTimer, TimeEntry, TimeEntryPatch,
};
use crate::modules::time_tracking::use_cases::sync_pending_operations::handler::SyncReport;
use crate::shell::state::AppState;

#[derive(SimpleObject, Clone)]
pub struct GqlTimeEntry {
    pub id: ID,
    pub user_id: Option<String>,
    pub task_id: Option<String>,
    pub project_id: Option<String>,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub duration: i64,
    pub status: String,
    pub is_billable: bool,
    pub provisional: bool,
}

impl From<TimeEntry> for GqlTimeEntry {
    fn from(v: TimeEntry) -> Self {
        Self {
            provisional: v.is_provisional(),
            id: ID(v.id),
            user_id: v.user_id,
            task_id: v.task_id,
            project_id: v.project_id,
            description: v.description,
            start_time: v.start_time.to_rfc3339(),
            end_time: v.end_time.map(|end| end.to_rfc3339()),
            duration: v.duration,
            status: v.status.to_string(),
            is_billable: v.is_billable,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlPendingOperation {
    pub id: ID,
    pub kind: String,
    pub timestamp: String,
    pub retries: i64,
}

impl From<PendingOperation> for GqlPendingOperation {
    fn from(v: PendingOperation) -> Self {
        Self {
            kind: v.kind().to_string(),
            id: ID(v.id),
            timestamp: v.timestamp.to_rfc3339(),
            retries: i64::from(v.retries),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlTimeStats {
    pub total_hours: f64,
    pub billable_hours: f64,
}

#[derive(SimpleObject, Clone)]
pub struct GqlActionResult {
    pub success: bool,
    pub error: Option<String>,
    pub offline: bool,
}

impl From<ActionOutcome> for GqlActionResult {
    fn from(v: ActionOutcome) -> Self {
        Self {
            success: v.is_success(),
            offline: v.is_offline(),
            error: v.error().map(str::to_owned),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlSyncReport {
    pub replayed: i64,
    pub remaining: i64,
    pub dead_lettered: i64,
}

impl From<SyncReport> for GqlSyncReport {
    fn from(v: SyncReport) -> Self {
        Self {
            replayed: v.replayed as i64,
            remaining: v.remaining as i64,
            dead_lettered: v.dead_lettered as i64,
        }
    }
}

fn parse_time(field: &str, value: &str) -> GqlResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| async_graphql::Error::new(format!("{field}: {e}")))
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn time_entries(&self, context: &Context<'_>) -> Vec<GqlTimeEntry> {
        let state = context.data_unchecked::<AppState>();
        state
            .tracker
            .time_entries()
            .into_iter()
            .map(Into::into)
            .collect()
    }

    async fn active_timer(&self, context: &Context<'_>) -> Option<GqlTimeEntry> {
        let state = context.data_unchecked::<AppState>();
        state.tracker.active_timer().map(Into::into)
    }

    /// Seconds on the active timer so far.
    async fn elapsed_seconds(&self, context: &Context<'_>) -> Option<i64> {
        let state = context.data_unchecked::<AppState>();
        state
            .tracker
            .active_timer()
            .map(|timer| timer.elapsed_seconds(Utc::now()))
    }

    async fn stats(&self, context: &Context<'_>) -> GqlTimeStats {
        let stats = context.data_unchecked::<AppState>().tracker.stats();
        GqlTimeStats {
            total_hours: stats.total_hours,
            billable_hours: stats.billable_hours,
        }
    }

    async fn pending_operations(&self, context: &Context<'_>) -> Vec<GqlPendingOperation> {
        let state = context.data_unchecked::<AppState>();
        state
            .tracker
            .pending_operations()
            .into_iter()
            .map(Into::into)
            .collect()
    }

    async fn failed_operations(&self, context: &Context<'_>) -> Vec<GqlPendingOperation> {
        let state = context.data_unchecked::<AppState>();
        state
            .tracker
            .failed_operations()
            .into_iter()
            .map(Into::into)
            .collect()
    }

    async fn syncing(&self, context: &Context<'_>) -> bool {
        context.data_unchecked::<AppState>().tracker.is_syncing()
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn start_timer(
        &self,
        context: &Context<'_>,
        task_id: Option<String>,
        project_id: Option<String>,
        description: Option<String>,
    ) -> GqlActionResult {
        let state = context.data_unchecked::<AppState>();
        let request = StartTimer {
            task_id,
            project_id,
            description,
        };
        state.tracker.start_timer(request).await.into()
    }

    async fn stop_timer(&self, context: &Context<'_>) -> GqlActionResult {
        let state = context.data_unchecked::<AppState>();
        state.tracker.stop_timer().await.into()
    }

    #[allow(clippy::too_many_arguments)]
    async fn create_time_entry(
        &self,
        context: &Context<'_>,
        task_id: Option<String>,
        project_id: Option<String>,
        description: Option<String>,
        start_time: String,
        end_time: Option<String>,
        is_billable: bool,
    ) -> GqlResult<GqlActionResult> {
        let state = context.data_unchecked::<AppState>();
        let data = NewTimeEntry {
            task_id,
            project_id,
            description,
            start_time: parse_time("start_time", &start_time)?,
            end_time: end_time
                .as_deref()
                .map(|end| parse_time("end_time", end))
                .transpose()?,
            is_billable,
        };
        data.validate(Utc::now())
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(state.tracker.create_time_entry(data).await.into())
    }

    async fn update_time_entry(
        &self,
        context: &Context<'_>,
        id: ID,
        description: Option<String>,
        is_billable: Option<bool>,
        start_time: Option<String>,
        end_time: Option<String>,
    ) -> GqlResult<GqlActionResult> {
        let state = context.data_unchecked::<AppState>();
        let changes = TimeEntryPatch {
            description,
            is_billable,
            start_time: start_time
                .as_deref()
                .map(|start| parse_time("start_time", start))
                .transpose()?,
            end_time: end_time
                .as_deref()
                .map(|end| parse_time("end_time", end))
                .transpose()?,
            ..TimeEntryPatch::default()
        };
        Ok(state.tracker.update_time_entry(&id, changes).await.into())
    }

    async fn delete_time_entry(&self, context: &Context<'_>, id: ID) -> GqlActionResult {
        let state = context.data_unchecked::<AppState>();
        state.tracker.delete_time_entry(&id).await.into()
    }

    async fn sync_pending_operations(&self, context: &Context<'_>) -> GqlSyncReport {
        let state = context.data_unchecked::<AppState>();
        state
            .tracker
            .sync_pending_operations()
            .await
            .unwrap_or_default()
            .into()
    }
}
