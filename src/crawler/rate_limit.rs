//! Sliding-window admission control for new URL starts

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Limits how many operations may start within any window
///
/// The limiter remembers the start instants inside the current window. A
/// caller is admitted when fewer than `limit` starts fall inside the window
/// ending now; otherwise it sleeps until the oldest start ages out. The state
/// lives behind one async mutex, so concurrent admission checks are
/// serialized and waiters are admitted in arrival order.
#[derive(Debug)]
pub struct RateLimiter {
    /// Starts allowed per window (0 = unlimited)
    limit: u32,
    window: Duration,
    starts: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter admitting `per_second` starts per second
    ///
    /// `per_second == 0` disables throttling.
    pub fn new(per_second: u32) -> Self {
        Self::with_window(per_second, Duration::from_secs(1))
    }

    /// Creates a limiter with a custom window length
    pub fn with_window(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            starts: Mutex::new(VecDeque::with_capacity(limit as usize)),
        }
    }

    /// Returns true when no admission limit applies
    pub fn is_unlimited(&self) -> bool {
        self.limit == 0
    }

    /// Waits until a new start is allowed and records it
    ///
    /// Cancel-safe: dropping the future before it resolves records nothing.
    ///
    /// # Returns
    ///
    /// The instant the start was admitted at
    pub async fn acquire(&self) -> Instant {
        if self.is_unlimited() {
            return Instant::now();
        }

        let mut starts = self.starts.lock().await;

        loop {
            let now = Instant::now();

            while let Some(&oldest) = starts.front() {
                if now.duration_since(oldest) >= self.window {
                    starts.pop_front();
                } else {
                    break;
                }
            }

            if starts.len() < self.limit as usize {
                starts.push_back(now);
                return now;
            }

            // Full window: wait for the oldest start to age out
            let wait = match starts.front() {
                Some(&oldest) => self.window.saturating_sub(now.duration_since(oldest)),
                None => Duration::ZERO,
            };

            tracing::trace!("Rate limit reached, waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }
}
