use std::cmp::min;
use std::time::Duration;

use tokio::time::sleep;
use tokio::time::timeout;
use tracing::debug;
use tracing::warn;

use crate::BackoffPolicy;
use crate::Error;
use crate::Result;

/// Re-run `task` while it fails with a retryable error.
///
/// Each attempt is bounded by `policy.timeout_ms`. Non-retryable errors are
/// returned immediately. The delay doubles per attempt up to
/// `policy.max_delay_ms`.
pub(crate) async fn task_with_timeout_and_exponential_backoff<F, T, P>(
    task: F,
    policy: BackoffPolicy,
) -> Result<P>
where
    F: Fn() -> T,
    T: std::future::Future<Output = Result<P>>,
{
    let max_delay = Duration::from_millis(policy.max_delay_ms);
    let timeout_duration = Duration::from_millis(policy.timeout_ms);
    let mut delay = Duration::from_millis(policy.base_delay_ms);
    let mut retries = 0;
    let mut last_error = String::from("no attempt made");

    while retries < policy.max_retries {
        match timeout(timeout_duration, task()).await {
            Ok(Ok(r)) => return Ok(r),
            Ok(Err(error)) if error.is_retryable() => {
                debug!(attempt = retries + 1, "retryable failure: {:?}", &error);
                last_error = error.to_string();
            }
            Ok(Err(error)) => return Err(error),
            Err(elapsed) => {
                warn!("task_with_timeout_and_exponential_backoff timeout: {:?}", &elapsed);
                last_error = Error::RetryTimeout.to_string();
            }
        }

        retries += 1;
        if retries < policy.max_retries {
            sleep(delay).await;
            delay = min(delay * 2, max_delay);
        }
    }

    warn!("Task failed after {} retries", retries);
    Err(Error::RetryExhausted(format!(
        "gave up after {retries} attempts: {last_error}"
    )))
}
