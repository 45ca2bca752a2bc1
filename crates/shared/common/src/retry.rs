//! Retry with linear backoff for flaky upstream calls.

use std::fmt::Display;
use std::future::Future;

use crate::config::RetryPolicy;

/// Run `operation` until it succeeds, fails with a non-retryable error or
/// the policy's attempts are used up. The last error is returned.
pub async fn retry_with_backoff<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    operation_name: &str,
    is_retryable: R,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: Display,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retryable(&err) && attempt + 1 < policy.attempts => {
                tracing::warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    max_attempts = policy.attempts,
                    "Request failed, retrying: {}",
                    err
                );
                tokio::time::sleep(policy.delay_after(attempt)).await;
                attempt += 1;
            }
            Err(err) => {
                if attempt > 0 {
                    tracing::error!(
                        operation = operation_name,
                        attempts = attempt + 1,
                        "Request failed after retries: {}",
                        err
                    );
                }
                return Err(err);
            }
        }
    }
}
