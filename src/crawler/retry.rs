//! Retry with bounded exponential backoff
//!
//! One attempt is a full fetch, extract, assemble and write for a single URL.
//! A failed attempt `n` (1-based) is followed by a wait of
//! `min(initial * factor^(n-1), max)` and then attempt `n + 1`, until
//! `max_retries` retries have been spent. Each URL gets its own budget.

use crate::config::CrawlOptions;
use crate::HarvestError;
use std::future::Future;
use std::time::Duration;

/// Backoff parameters for one URL
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
}

impl RetryPolicy {
    pub fn from_options(options: &CrawlOptions) -> Self {
        Self {
            max_retries: options.max_retries,
            initial_delay: Duration::from_millis(options.initial_retry_delay_ms),
            max_delay: Duration::from_millis(options.max_retry_delay_ms),
            backoff_factor: options.backoff_factor,
        }
    }

    /// Total attempts allowed, including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait after attempt `attempt` (1-based) failed
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }

        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled = self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(exponent);
        let capped = scaled.min(self.max_delay.as_millis() as f64);

        Duration::from_millis(capped as u64)
    }
}

/// A failed attempt, reported before the next wait begins
#[derive(Debug)]
pub struct AttemptFailure<'a> {
    pub attempt: u32,
    pub max_attempts: u32,
    pub error: &'a HarvestError,

    /// Wait before the next attempt, `None` when the budget is spent
    pub next_delay: Option<Duration>,
}

/// Returned when every attempt failed
#[derive(Debug)]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last_error: HarvestError,
}

/// Runs `operation` until it succeeds or the retry budget is spent
///
/// `operation` receives the 1-based attempt number. `on_failure` observes
/// every failed attempt. Errors that are not retryable end the loop at once.
///
/// # Returns
///
/// * `Ok(T)` - The first successful attempt's value
/// * `Err(RetryExhausted)` - The last error and how many attempts were made
pub async fn with_retry<T, F, Fut, O>(
    policy: &RetryPolicy,
    mut operation: F,
    mut on_failure: O,
) -> Result<T, RetryExhausted>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, HarvestError>>,
    O: FnMut(&AttemptFailure<'_>),
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        let error = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        let next_delay = (attempt < max_attempts && error.is_retryable())
            .then(|| policy.delay_after(attempt));

        on_failure(&AttemptFailure {
            attempt,
            max_attempts,
            error: &error,
            next_delay,
        });

        match next_delay {
            Some(delay) => {
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            None => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: error,
                })
            }
        }
    }
}
