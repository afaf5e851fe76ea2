//! Retry executor with exponential backoff.
//!
//! Drives repeated attempts of one operation inside a single
//! breaker-permitted call. Terminal errors stop the loop immediately; the
//! final error after an exhausted budget is returned unmodified.

use std::future::Future;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{backoff, AnalyzerError, RetryConfig};

/// Runs `op` with up to `cfg.max_retries` retries after the initial attempt.
///
/// Only errors whose [`crate::ErrorKind`] is retryable are retried; between
/// attempts the task sleeps for [`backoff::delay_for_attempt`]. Attempts are
/// strictly sequential. Dropping the returned future cancels the in-flight
/// attempt and any pending backoff sleep.
pub async fn execute<T, F, Fut>(cfg: &RetryConfig, mut op: F) -> Result<T, AnalyzerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AnalyzerError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt, "operation succeeded after retries");
                }
                return Ok(result);
            }
            Err(err) if err.is_retryable() && attempt <= cfg.max_retries => {
                let delay = backoff::delay_for_attempt(attempt, cfg);
                warn!(
                    attempt,
                    kind = %err.kind,
                    delay_ms = delay.as_millis() as u64,
                    "attempt failed, retrying after backoff"
                );
                sleep(delay).await;
            }
            Err(err) => {
                if err.is_retryable() {
                    warn!(
                        attempt,
                        kind = %err.kind,
                        "retry budget exhausted, surfacing last error"
                    );
                } else {
                    debug!(kind = %err.kind, "terminal error, not retrying");
                }
                return Err(err);
            }
        }
    }
}
