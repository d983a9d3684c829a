use serde::Deserialize;
use std::time::Duration;

/// Fixed ceiling on a single backoff wait (milliseconds)
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;

/// Fixed multiplier applied to the backoff delay after each failed attempt
pub const BACKOFF_FACTOR: f64 = 2.0;

/// Options for a single harvest run
///
/// Created once (from an optional TOML file plus CLI overrides) and never
/// mutated after the run starts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlOptions {
    /// Keep going after a URL exhausts its retries
    pub continue_on_error: bool,

    /// Number of retries after the first attempt (total attempts = max_retries + 1)
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds)
    pub initial_retry_delay_ms: u64,

    /// Upper bound on any single backoff delay (milliseconds)
    pub max_retry_delay_ms: u64,

    /// Multiplier applied to the delay after each failed attempt
    pub backoff_factor: f64,

    /// Maximum new URL starts per second (0 disables throttling)
    pub rate_per_second: u32,

    /// Bound on a single fetch+extract attempt (milliseconds)
    pub request_timeout_ms: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Maximum nesting of sitemap indexes to follow
    pub max_sitemap_depth: u32,

    /// Verbose diagnostics
    pub debug: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            continue_on_error: false,
            max_retries: 3,
            initial_retry_delay_ms: 1000,
            max_retry_delay_ms: MAX_RETRY_DELAY_MS,
            backoff_factor: BACKOFF_FACTOR,
            rate_per_second: 1,
            request_timeout_ms: 30_000,
            user_agent: default_user_agent(),
            max_sitemap_depth: 2,
            debug: false,
        }
    }
}

impl CrawlOptions {
    /// Per-attempt deadline as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Overrides collected from the command line
///
/// Each `Some` replaces the corresponding file/default value.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub continue_on_error: bool,
    pub debug: bool,
    pub max_retries: Option<u32>,
    pub initial_retry_delay_ms: Option<u64>,
    pub rate_per_second: Option<u32>,
    pub request_timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
}

impl OptionOverrides {
    /// Applies these overrides on top of `options`
    pub fn apply(self, mut options: CrawlOptions) -> CrawlOptions {
        // Flags can only switch behavior on
        options.continue_on_error |= self.continue_on_error;
        options.debug |= self.debug;

        if let Some(retries) = self.max_retries {
            options.max_retries = retries;
        }
        if let Some(delay) = self.initial_retry_delay_ms {
            options.initial_retry_delay_ms = delay;
        }
        if let Some(rate) = self.rate_per_second {
            options.rate_per_second = rate;
        }
        if let Some(timeout) = self.request_timeout_ms {
            options.request_timeout_ms = timeout;
        }
        if let Some(user_agent) = self.user_agent {
            options.user_agent = user_agent;
        }

        options
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
