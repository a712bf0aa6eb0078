// HTTP handlers exposing the tracker to a local UI.
//
// Mutations answer with an ActionResult: 200 when the service accepted the change, 202 when it
// was queued offline, 422 when it was rejected or the body was invalid.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;

use crate::modules::time_tracking::core::outcome::{ActionOutcome, ActionResult};
use crate::modules::time_tracking::core::time_entry::{
    ListFilter, NewTimeEntry, StartTimer, TimeEntryPatch,
};
use crate::shell::state::AppState;

#[derive(Serialize)]
pub struct CountResponse {
    pub count: usize,
}

fn outcome_response(outcome: ActionOutcome) -> Response {
    let status = match &outcome {
        ActionOutcome::Synced => StatusCode::OK,
        ActionOutcome::SavedOffline => StatusCode::ACCEPTED,
        ActionOutcome::Failed(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(ActionResult::from(outcome))).into_response()
}

fn invalid_body(message: impl Into<String>) -> Response {
    outcome_response(ActionOutcome::Failed(message.into()))
}

pub async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.tracker.snapshot())
}

pub async fn start_timer(
    State(state): State<AppState>,
    body: Result<Json<StartTimer>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return invalid_body(rejection.body_text()),
    };
    outcome_response(state.tracker.start_timer(body).await)
}

pub async fn stop_timer(State(state): State<AppState>) -> Response {
    outcome_response(state.tracker.stop_timer().await)
}

pub async fn refresh_entries(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> impl IntoResponse {
    state.tracker.fetch_time_entries_filtered(&filter).await;
    state.tracker.fetch_active_timer().await;
    Json(state.tracker.snapshot())
}

pub async fn create_entry(
    State(state): State<AppState>,
    body: Result<Json<NewTimeEntry>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return invalid_body(rejection.body_text()),
    };
    if let Err(error) = body.validate(Utc::now()) {
        return invalid_body(error.to_string());
    }
    outcome_response(state.tracker.create_time_entry(body).await)
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TimeEntryPatch>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return invalid_body(rejection.body_text()),
    };
    outcome_response(state.tracker.update_time_entry(&id, body).await)
}

pub async fn delete_entry(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    outcome_response(state.tracker.delete_time_entry(&id).await)
}

pub async fn sync(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.tracker.sync_pending_operations().await.unwrap_or_default())
}

pub async fn retry_failed(State(state): State<AppState>) -> impl IntoResponse {
    Json(CountResponse {
        count: state.tracker.retry_failed_operations().await,
    })
}

pub async fn discard_failed(State(state): State<AppState>) -> impl IntoResponse {
    Json(CountResponse {
        count: state.tracker.discard_failed_operations().await,
    })
}
