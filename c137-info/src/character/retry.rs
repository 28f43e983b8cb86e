//! Retry with exponential backoff for character API calls
//!
//! **Algorithm:**
//! 1. Run the attempt under `attempt_timeout`; an elapsed timeout drops the
//!    in-flight future and counts as a failed attempt
//! 2. On success, return the value
//! 3. On failure, if attempts remain, sleep `initial_delay * 2^k` (k = index
//!    of the failed attempt, starting at 0) and try again
//! 4. After `max_retries + 1` failed attempts, return
//!    [`FetchError::Exhausted`] wrapping the last error
//!
//! Every failure is retried: timeouts, connection errors and non-success
//! statuses are all treated as transient at this layer.

use super::error::FetchError;
use c137_common::config::RetryConfig;
use std::future::Future;
use std::time::{Duration, Instant};

/// Attempt count, backoff base and per-attempt time budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            attempt_timeout: Duration::from_millis(config.attempt_timeout_ms),
        }
    }
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait after failed attempt `k` (0-indexed)
    pub fn delay_for(&self, k: u32) -> Duration {
        let factor = 2u32.saturating_pow(k);
        self.initial_delay.saturating_mul(factor)
    }

    /// Run `attempt` until it succeeds or the policy is exhausted
    ///
    /// # Arguments
    /// * `context` - What is being fetched, used in logs and the final error
    ///   (e.g. "character 42")
    /// * `attempt` - Produces a fresh future for every attempt
    pub async fn run<T, F, Fut>(&self, context: &str, mut attempt: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let start_time = Instant::now();
        let max_attempts = self.max_attempts();
        let mut k = 0u32;

        loop {
            let outcome = match tokio::time::timeout(self.attempt_timeout, attempt()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(FetchError::Timeout(self.attempt_timeout)),
            };

            let err = match outcome {
                Ok(value) => {
                    if k > 0 {
                        tracing::debug!(
                            operation = context,
                            attempt = k + 1,
                            elapsed_ms = start_time.elapsed().as_millis() as u64,
                            "Upstream call succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if k + 1 >= max_attempts {
                tracing::error!(
                    operation = context,
                    attempts = max_attempts,
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    error = %err,
                    "Upstream call failed: retries exhausted"
                );
                return Err(FetchError::Exhausted {
                    context: context.to_string(),
                    attempts: max_attempts,
                    source: Box::new(err),
                });
            }

            let delay = self.delay_for(k);
            tracing::warn!(
                operation = context,
                attempt = k + 1,
                backoff_ms = delay.as_millis() as u64,
                error = %err,
                "Upstream call failed, will retry after backoff"
            );

            tokio::time::sleep(delay).await;
            k += 1;
        }
    }
}
