//! Retry policy: caller-side backoff around transient failures.

use std::future::Future;
use std::time::Duration;

use crate::domain::Result;

/// Upper bound for a single backoff sleep.
pub const MAX_DELAY: Duration = Duration::from_secs(60);

/// Exponent cap; 2^16 already exceeds `MAX_DELAY` for any base of a millisecond or more.
const MAX_EXPONENT: u32 = 16;

/// Retry policy for retryable failures (see `AthisError::is_retryable`).
///
/// Exponential backoff: delay = base_delay * multiplier^(attempts - 1)
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one. 1 means no retry.
    pub max_attempts: u32,

    /// Base delay for the first retry.
    pub base_delay: Duration,

    /// Backoff multiplier for exponential backoff.
    pub multiplier: f64,
}

impl RetryPolicy {
    /// Single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(200),
            multiplier: 2.0,
        }
    }

    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            multiplier: 2.0,
        }
    }

    /// Delay after `attempts` failed attempts (1-indexed).
    ///
    /// With base_delay=200ms, multiplier=2.0:
    /// - attempt 1: 200ms
    /// - attempt 2: 400ms
    /// - attempt 3: 800ms
    ///
    /// Never exceeds [`MAX_DELAY`].
    pub fn next_delay(&self, attempts: u32) -> Duration {
        let exponent = attempts.saturating_sub(1).min(MAX_EXPONENT) as i32;
        let delay_secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::try_from_secs_f64(delay_secs)
            .unwrap_or(MAX_DELAY)
            .min(MAX_DELAY)
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or
    /// `max_attempts` is used up. The last error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempts = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempts < self.max_attempts => {
                    let delay = self.next_delay(attempts);
                    tracing::warn!(attempts, ?delay, error = %err, "retrying after transient failure");
                    tokio::time::sleep(delay).await;
                    attempts += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}
