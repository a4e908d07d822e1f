//! Retry policy for outbound calls.
//!
//! Every attempt runs under its own deadline, and the number of attempts is
//! bounded, so the total time spent is bounded too.

use std::future::Future;
use std::time::Duration;

use crate::config::SegmentConfig;
use crate::resilience::backoff::calculate_backoff;

/// Bounded retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &SegmentConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            attempt_timeout: Duration::from_millis(config.timeout_ms),
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }

    /// Run `op` until it succeeds, returns a non-retryable error, or attempts
    /// run out. `on_timeout` builds the error used when an attempt exceeds its
    /// deadline.
    pub async fn run<T, E, F, Fut>(
        &self,
        mut op: F,
        is_retryable: impl Fn(&E) -> bool,
        on_timeout: impl Fn(Duration) -> E,
    ) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;

            let result = match tokio::time::timeout(self.attempt_timeout, op(attempt)).await {
                Ok(result) => result,
                Err(_) => Err(on_timeout(self.attempt_timeout)),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && is_retryable(&e) => {
                    let delay = calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms);
                    tracing::debug!(attempt, delay = ?delay, error = %e, "Retrying outbound call");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
