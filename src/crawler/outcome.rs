use crate::HarvestError;
use std::path::PathBuf;
use std::time::Duration;

/// Terminal result for one crawl target
#[derive(Debug)]
pub enum CrawlOutcome {
    /// The document was written
    Success {
        url: String,
        file_path: PathBuf,
        attempts: u32,
    },

    /// Every attempt failed
    Failure {
        url: String,
        error: HarvestError,
        attempts: u32,
    },
}

impl CrawlOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. } | Self::Failure { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } | Self::Failure { attempts, .. } => *attempts,
        }
    }
}

/// Aggregated result of a harvest run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of targets submitted
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,

    /// Targets never started because the run halted
    pub skipped: usize,

    /// Whether a failure ended the run with continue-on-error off
    pub halted: bool,

    pub elapsed: Duration,

    /// Outcomes of every started target, in target order
    pub outcomes: Vec<CrawlOutcome>,
}

impl RunSummary {
    /// Builds a summary from per-target slots (`None` = never started)
    pub fn from_slots(slots: Vec<Option<CrawlOutcome>>, halted: bool, elapsed: Duration) -> Self {
        let total = slots.len();
        let outcomes: Vec<CrawlOutcome> = slots.into_iter().flatten().collect();
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let failed = outcomes.len() - succeeded;

        Self {
            total,
            succeeded,
            failed,
            skipped: total - outcomes.len(),
            halted,
            elapsed,
            outcomes,
        }
    }

    /// Iterates over the failed outcomes
    pub fn failures(&self) -> impl Iterator<Item = &CrawlOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Process exit code for this run: 1 when halted on a failure, else 0
    pub fn exit_code(&self) -> u8 {
        if self.halted {
            1
        } else {
            0
        }
    }
}
