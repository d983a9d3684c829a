//! Crawler module for harvesting sitemap URLs
//!
//! This module contains the run orchestration, including:
//! - Retry with exponential backoff for each URL
//! - A sliding-window start rate limiter
//! - Throttled concurrent scheduling with early stop
//! - Overall run coordination and outcome aggregation

mod coordinator;
mod outcome;
mod rate_limit;
mod retry;
mod scheduler;

pub use coordinator::{run_harvest, Coordinator};
pub use outcome::{CrawlOutcome, RunSummary};
pub use rate_limit::RateLimiter;
pub use retry::{with_retry, AttemptFailure, RetryExhausted, RetryPolicy};
pub use scheduler::{ScheduleReport, Scheduler};
