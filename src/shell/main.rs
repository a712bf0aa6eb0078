use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{Extension, routing::get};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

use time_tracking::modules::time_tracking::adapters::outbound::http_time_entry_service::HttpTimeEntryService;
use time_tracking::modules::time_tracking::adapters::outbound::json_file_queue_store::JsonFileQueueStore;
use time_tracking::modules::time_tracking::use_cases::tracker::TimeTracker;
use time_tracking::shared::infrastructure::connectivity::{ConnectivityMonitor, ConnectivityProbe};
use time_tracking::shared::infrastructure::connectivity::health_check::spawn_health_check;
use time_tracking::shared::infrastructure::notifier::TracingNotifier;
use time_tracking::shell::config::Config;
use time_tracking::shell::graphql::{AppSchema, schema};
use time_tracking::shell::http::router;
use time_tracking::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;
    tracing::info!(api_url = %config.api_url, data_dir = %config.data_dir.display(), "starting");

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;
    let service = Arc::new(HttpTimeEntryService::with_client(
        client.clone(),
        config.api_url.clone(),
        config.api_token.clone(),
    ));
    let queue_store = Arc::new(JsonFileQueueStore::new(&config.data_dir));
    let connectivity = ConnectivityMonitor::default();

    let tracker = Arc::new(TimeTracker::new(
        service,
        queue_store,
        Arc::new(connectivity.clone()),
        Arc::new(TracingNotifier),
        config.tracker.clone(),
    ));
    let restored = match tracker.restore().await {
        Ok(restored) => restored,
        Err(error) => {
            tracing::warn!(%error, "offline queue unreadable, starting with an empty queue");
            0
        }
    };

    let health_check = spawn_health_check(
        connectivity.clone(),
        client,
        config.api_url.clone(),
        config.probe_interval,
    );
    let listener = tracker.listen_for_connectivity();

    tracker.fetch_time_entries().await;
    tracker.fetch_active_timer().await;
    if restored > 0 && connectivity.is_online() {
        tracker.sync_pending_operations().await;
    }

    let state = AppState {
        tracker: tracker.clone(),
    };
    let app = router(state.clone())
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema(state)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let tcp = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!("HTTP endpoint: http://{}/state", config.listen_addr);
    tracing::info!("GraphQL endpoint: http://{}/gql", config.listen_addr);
    axum::serve(tcp, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    listener.shutdown();
    health_check.abort();
    tracing::info!(pending = tracker.pending_operations().len(), "stopped");
    Ok(())
}

async fn graphql(Extension(schema): Extension<AppSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> axum::response::Html<String> {
    use async_graphql::http::GraphiQLSource;
    axum::response::Html(GraphiQLSource::build().endpoint("/gql").finish())
}
