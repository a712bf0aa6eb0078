// Bounded retry with exponential backoff for reads against the time entry service.
//
// Only transient failures are retried. Writes never go through here: they fail fast and fall
// back to the offline queue instead.

use crate::modules::time_tracking::core::ports::RemoteError;
use std::future::Future;
use std::time::Duration;

pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// `base * 2^attempt`, capped at [`MAX_BACKOFF`].
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.min(10));
    base.saturating_mul(factor).min(MAX_BACKOFF)
}

pub async fn retry_with_backoff<T, F, Fut>(
    retries: u32,
    base: Duration,
    mut request: F,
) -> Result<T, RemoteError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    let mut attempt = 0;
    loop {
        match request().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_transient() && attempt < retries => {
                let delay = backoff_delay(base, attempt);
                attempt += 1;
                tracing::debug!(attempt, ?delay, %error, "transient read failure, retrying");
                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}
