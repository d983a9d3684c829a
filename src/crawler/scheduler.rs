//! Throttled fan-out of per-URL operations
//!
//! This module handles:
//! - Admitting each target through the shared rate limiter
//! - Running admitted targets concurrently as tokio tasks
//! - Reporting each outcome as it completes so the caller can stop
//!   submitting new work
//!
//! The throttle counts one start per target. Retries of a target happen
//! inside its task and do not take further permits.

use crate::crawler::outcome::CrawlOutcome;
use crate::crawler::rate_limit::RateLimiter;
use crate::HarvestError;
use std::collections::HashSet;
use std::future::Future;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};

/// Result of scheduling a batch of targets
#[derive(Debug)]
pub struct ScheduleReport {
    /// One slot per target, in target order (`None` = never started)
    pub slots: Vec<Option<CrawlOutcome>>,

    /// Whether the observer asked to stop at any point, even after the
    /// last target was already admitted
    pub halted: bool,
}

/// Scheduler fans targets out under a global start rate
pub struct Scheduler {
    limiter: Arc<RateLimiter>,
}

impl Scheduler {
    /// Creates a scheduler that admits starts through `limiter`
    pub fn new(limiter: RateLimiter) -> Self {
        Self {
            limiter: Arc::new(limiter),
        }
    }

    /// Creates a scheduler admitting `per_second` starts per second (0 = unlimited)
    pub fn with_rate(per_second: u32) -> Self {
        Self::new(RateLimiter::new(per_second))
    }

    /// Runs `operation` for every target
    ///
    /// Targets are admitted in order through the rate limiter and then run
    /// concurrently; completions arrive in any order. `on_outcome` sees every
    /// outcome as soon as it is available; returning `ControlFlow::Break`
    /// stops admission of further targets and marks the report halted.
    /// Targets already running are drained, not aborted.
    ///
    /// # Arguments
    ///
    /// * `targets` - URLs to process
    /// * `operation` - Builds the future that processes one URL
    /// * `on_outcome` - Observes outcomes and decides whether to continue
    ///
    /// # Returns
    ///
    /// A report with one slot per target
    pub async fn run_all<F, Fut, C>(
        &self,
        targets: Vec<String>,
        operation: F,
        mut on_outcome: C,
    ) -> ScheduleReport
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = CrawlOutcome> + Send + 'static,
        C: FnMut(&CrawlOutcome) -> ControlFlow<()>,
    {
        let mut slots: Vec<Option<CrawlOutcome>> = Vec::with_capacity(targets.len());
        slots.resize_with(targets.len(), || None);

        let mut started: Vec<(usize, String)> = Vec::new();
        let mut in_flight = JoinSet::new();
        let mut pending = targets.into_iter().enumerate();
        let mut next = pending.next();
        let mut halted = false;

        while let Some((index, url)) = next.take() {
            if halted {
                next = Some((index, url));
                break;
            }

            tokio::select! {
                biased;

                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    next = Some((index, url));
                    if Self::record(joined, &mut slots, &mut on_outcome).is_break() {
                        halted = true;
                    }
                }

                admitted_at = self.limiter.acquire() => {
                    tracing::debug!("Starting {} ({:?})", url, admitted_at);
                    started.push((index, url.clone()));
                    let task = operation(url);
                    in_flight.spawn(async move { (index, task.await) });
                    next = pending.next();
                }
            }
        }

        if next.is_some() {
            tracing::info!(
                "Stopped submitting; {} target(s) will not be started, draining {} in flight",
                1 + pending.len(),
                in_flight.len()
            );
        }

        while let Some(joined) = in_flight.join_next().await {
            if Self::record(joined, &mut slots, &mut on_outcome).is_break() {
                halted = true;
            }
        }

        // A task that died without reporting still owes its target an outcome
        let reported: HashSet<usize> = slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
            .collect();
        for (index, url) in started {
            if !reported.contains(&index) {
                let outcome = CrawlOutcome::Failure {
                    error: HarvestError::Aborted {
                        url: url.clone(),
                        message: "task ended without an outcome".to_string(),
                    },
                    url,
                    attempts: 0,
                };
                if on_outcome(&outcome).is_break() {
                    halted = true;
                }
                slots[index] = Some(outcome);
            }
        }

        ScheduleReport { slots, halted }
    }

    /// Stores a finished task's outcome and forwards it to the observer
    fn record<C>(
        joined: Result<(usize, CrawlOutcome), JoinError>,
        slots: &mut [Option<CrawlOutcome>],
        on_outcome: &mut C,
    ) -> ControlFlow<()>
    where
        C: FnMut(&CrawlOutcome) -> ControlFlow<()>,
    {
        match joined {
            Ok((index, outcome)) => {
                let flow = on_outcome(&outcome);
                slots[index] = Some(outcome);
                flow
            }
            Err(e) => {
                tracing::error!("Crawl task failed: {}", e);
                ControlFlow::Continue(())
            }
        }
    }
}
