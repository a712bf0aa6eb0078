use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::modules::time_tracking::adapters::inbound::http as tracker_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/state", get(tracker_http::get_state))
        .route("/timer/start", post(tracker_http::start_timer))
        .route("/timer/stop", post(tracker_http::stop_timer))
        .route("/entries", post(tracker_http::create_entry))
        .route("/entries/refresh", post(tracker_http::refresh_entries))
        .route(
            "/entries/{id}",
            put(tracker_http::update_entry).delete(tracker_http::delete_entry),
        )
        .route("/sync", post(tracker_http::sync))
        .route("/sync/failed/retry", post(tracker_http::retry_failed))
        .route("/sync/failed", delete(tracker_http::discard_failed))
        .with_state(state)
}
