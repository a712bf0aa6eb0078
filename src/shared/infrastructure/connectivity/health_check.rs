// Background loop that keeps a ConnectivityMonitor in step with the remote service.
//
// Any HTTP answer counts as online, whatever its status; only transport failures
// (connect, timeout, request could not be sent) flip the monitor offline.

use crate::shared::infrastructure::connectivity::ConnectivityMonitor;
use std::time::Duration;
use tokio::task::JoinHandle;

pub fn is_connectivity_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout() || error.is_request()
}

pub async fn check_once(client: &reqwest::Client, url: &str, monitor: &ConnectivityMonitor) {
    match client.get(url).send().await {
        Ok(response) => {
            tracing::debug!(status = %response.status(), "health check answered");
            if monitor.set_online() {
                tracing::info!("time entry service reachable again, switching to online");
            }
        }
        Err(error) if is_connectivity_error(&error) => {
            if monitor.set_offline() {
                tracing::warn!(%error, "time entry service unreachable, switching to offline");
            }
        }
        Err(error) => {
            tracing::debug!(%error, "health check failed without a connectivity error");
        }
    }
}

pub fn spawn_health_check(
    monitor: ConnectivityMonitor,
    client: reqwest::Client,
    url: String,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            check_once(&client, &url, &monitor).await;
            tokio::time::sleep(interval).await;
        }
    })
}
