// src/error_recovery.rs
//! Retry with exponential backoff for API operations.

use crate::error::AppError;
use std::time::Duration;

/// Retries an async operation with exponential backoff.
///
/// Only errors for which [`AppError::is_retryable`] holds are retried; any
/// other error is returned immediately. `max_attempts` counts the first try,
/// so 1 means a single attempt.
pub async fn retry_with_backoff<F, T, Fut>(
    mut operation: F,
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut delay = initial_delay;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_attempts && e.is_retryable() => {
                log::warn!(
                    "Attempt {} failed ({}), retrying after {:?}",
                    attempt,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, max_delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
