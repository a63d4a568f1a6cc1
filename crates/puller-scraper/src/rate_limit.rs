//! Retry utilities for provider rate limiting.
//!
//! Only HTTP 429 is retried, after a fixed backoff. Every other error,
//! including network failures and non-429 statuses, is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` means the provider asked us to back off.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(err, ScraperError::RateLimited { .. })
}

/// Executes `operation`, retrying on [`ScraperError::RateLimited`].
///
/// Sleeps `backoff` before each retry, up to `max_retries` additional attempts
/// after the first try. With `max_retries = 1` the operation runs at most
/// twice. If every attempt is rate limited the last error is returned.
pub(crate) async fn retry_on_rate_limit<T, F, Fut>(
    max_retries: u32,
    backoff: Duration,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                tracing::warn!(
                    attempt,
                    max_retries,
                    backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "rate limited by provider; retrying after backoff"
                );
            }
        }

        tokio::time::sleep(backoff).await;
        attempt += 1;
    }
}
