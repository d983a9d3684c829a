//! Harvest coordinator - main run orchestration logic
//!
//! This module drives a whole run:
//! - Preparing the output directory and reading the sitemap
//! - Fanning every URL out through the throttled scheduler
//! - Wrapping each URL's fetch, extract, assemble and write in the retry engine
//! - Enforcing the continue-vs-halt failure policy
//! - Aggregating outcomes into a run summary

use crate::config::CrawlOptions;
use crate::crawler::outcome::{CrawlOutcome, RunSummary};
use crate::crawler::retry::{with_retry, AttemptFailure, RetryPolicy};
use crate::crawler::scheduler::Scheduler;
use crate::extract::{build_http_client, ContentExtractor, HtmlExtractor};
use crate::output::{assemble, ensure_output_dir, write_document};
use crate::sitemap::fetch_sitemap_urls;
use crate::HarvestError;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main harvest coordinator structure
pub struct Coordinator {
    options: Arc<CrawlOptions>,
    extractor: Arc<dyn ContentExtractor>,
    output_dir: PathBuf,
    scheduler: Scheduler,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `options` - Run options
    /// * `extractor` - Content extraction shared by every URL
    /// * `output_dir` - Existing directory documents are written into
    pub fn new(
        options: CrawlOptions,
        extractor: Arc<dyn ContentExtractor>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let scheduler = Scheduler::with_rate(options.rate_per_second);

        Self {
            options: Arc::new(options),
            extractor,
            output_dir: output_dir.into(),
            scheduler,
        }
    }

    /// Harvests every target and returns the aggregated summary
    ///
    /// With `continue_on_error` unset, the first failed URL stops admission
    /// of further targets; targets already running finish and are counted.
    pub async fn run(&self, targets: Vec<String>) -> RunSummary {
        let start_time = Instant::now();
        let total = targets.len();
        let policy = RetryPolicy::from_options(&self.options);
        let timeout = self.options.request_timeout();
        let continue_on_error = self.options.continue_on_error;

        tracing::info!(
            "Harvesting {} URLs (rate limit: {}, retries: {}, continue on error: {})",
            total,
            describe_rate(self.options.rate_per_second),
            policy.max_retries,
            continue_on_error
        );

        let mut completed = 0;
        let report = self
            .scheduler
            .run_all(
                targets,
                |url| {
                    harvest_url(
                        url,
                        self.extractor.clone(),
                        self.output_dir.clone(),
                        policy,
                        timeout,
                    )
                },
                |outcome| {
                    completed += 1;
                    match outcome {
                        CrawlOutcome::Success {
                            url, file_path, ..
                        } => {
                            tracing::info!(
                                "[{}/{}] Saved {} -> {}",
                                completed,
                                total,
                                url,
                                file_path.display()
                            );
                            ControlFlow::Continue(())
                        }
                        CrawlOutcome::Failure {
                            url,
                            error,
                            attempts,
                        } => {
                            tracing::error!(
                                "[{}/{}] Giving up on {} after {} attempt(s): {}",
                                completed,
                                total,
                                url,
                                attempts,
                                error
                            );
                            if continue_on_error {
                                ControlFlow::Continue(())
                            } else {
                                tracing::error!("Halting run after first failure");
                                ControlFlow::Break(())
                            }
                        }
                    }
                },
            )
            .await;

        let summary = RunSummary::from_slots(report.slots, report.halted, start_time.elapsed());

        tracing::info!(
            "Run finished in {:?}: {} total, {} succeeded, {} failed, {} skipped",
            summary.elapsed,
            summary.total,
            summary.succeeded,
            summary.failed,
            summary.skipped
        );

        summary
    }
}

/// Runs one URL through the retry engine and turns the result into an outcome
async fn harvest_url(
    url: String,
    extractor: Arc<dyn ContentExtractor>,
    output_dir: PathBuf,
    policy: RetryPolicy,
    timeout: Duration,
) -> CrawlOutcome {
    let target = url.as_str();
    let extractor = extractor.as_ref();
    let dir = output_dir.as_path();
    let mut attempts = 0;

    let result = with_retry(
        &policy,
        |attempt| {
            attempts = attempt;
            attempt_once(target, extractor, dir, timeout)
        },
        |failure| log_failed_attempt(target, failure),
    )
    .await;

    match result {
        Ok(file_path) => CrawlOutcome::Success {
            url,
            file_path,
            attempts,
        },
        Err(exhausted) => CrawlOutcome::Failure {
            url,
            error: exhausted.last_error,
            attempts: exhausted.attempts,
        },
    }
}

/// A single fetch, extract, assemble and write for one URL
async fn attempt_once(
    url: &str,
    extractor: &dyn ContentExtractor,
    output_dir: &Path,
    timeout: Duration,
) -> Result<PathBuf, HarvestError> {
    let content = tokio::time::timeout(timeout, extractor.extract(url))
        .await
        .map_err(|_| HarvestError::Timeout {
            url: url.to_string(),
            after_ms: timeout.as_millis() as u64,
        })??;

    let document = assemble(url, content)?;
    write_document(output_dir, &document).await
}

fn log_failed_attempt(url: &str, failure: &AttemptFailure<'_>) {
    match failure.next_delay {
        Some(delay) => tracing::warn!(
            "Attempt {}/{} failed for {}: {} (retrying in {}ms)",
            failure.attempt,
            failure.max_attempts,
            url,
            failure.error,
            delay.as_millis()
        ),
        None => tracing::warn!(
            "Attempt {}/{} failed for {}: {} (no retries left)",
            failure.attempt,
            failure.max_attempts,
            url,
            failure.error
        ),
    }
}

fn describe_rate(rate_per_second: u32) -> String {
    if rate_per_second == 0 {
        "off".to_string()
    } else {
        format!("{}/s", rate_per_second)
    }
}

/// Runs a complete harvest
///
/// This is the main entry point. It will:
/// 1. Create the output directory
/// 2. Build the HTTP client
/// 3. Read every URL from the sitemap
/// 4. Harvest each URL through the coordinator
///
/// Steps 1-3 are run-level: their failure aborts before any URL is touched.
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run completed or halted on a URL failure
/// * `Err(HarvestError)` - A run-level fault
///
/// # Example
///
/// ```no_run
/// use sitemap_harvest::config::CrawlOptions;
/// use sitemap_harvest::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_harvest(
///     "https://example.com/sitemap.xml",
///     Path::new("./pages"),
///     CrawlOptions::default(),
/// )
/// .await?;
/// println!("{} of {} saved", summary.succeeded, summary.total);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(
    sitemap_url: &str,
    output_dir: &Path,
    options: CrawlOptions,
) -> Result<RunSummary, HarvestError> {
    ensure_output_dir(output_dir).await?;
    tracing::debug!("Output directory ready: {}", output_dir.display());

    let client = build_http_client(&options)?;

    tracing::info!("Fetching sitemap {}", sitemap_url);
    let targets = fetch_sitemap_urls(&client, sitemap_url, options.max_sitemap_depth).await?;
    tracing::info!("Sitemap lists {} URLs", targets.len());

    let extractor = Arc::new(HtmlExtractor::new(client, options.request_timeout()));
    let coordinator = Coordinator::new(options, extractor, output_dir);

    Ok(coordinator.run(targets).await)
}
