//! Bounded retry with exponential backoff for AI provider calls.
//!
//! The policy is a plain value taking the fallible operation as a
//! parameter: no loop-with-sleeps woven through call sites, no throwing
//! through layers. Only errors classified retryable
//! ([`Error::is_retryable`]) are attempted again; quota exhaustion and
//! every other class return immediately.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use landai_core::{defaults, Error, Result};

/// Retry policy: capped attempt count, base delay doubling per attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first (minimum 1).
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each subsequent retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::AI_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(defaults::AI_RETRY_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// A policy that never retries. Useful in tests and for callers that
    /// implement their own scheduling.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Run `op`, retrying transient failures with exponential backoff.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut delay = self.base_delay;

        for attempt in 1..=max_attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    warn!(
                        subsystem = "inference",
                        component = "retry",
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient provider failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
                Err(err) => return Err(err),
            }
        }

        unreachable!("retry loop returns on final attempt")
    }
}
