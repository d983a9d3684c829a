//! Run summary report
//!
//! Formats a finished run's counts and failures for the terminal.

use crate::crawler::{CrawlOutcome, RunSummary};

/// Formats a run summary as a plain-text report
///
/// # Arguments
///
/// * `summary` - The finished run
///
/// # Returns
///
/// A multi-line report ending in a newline
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Harvest Summary ===\n\n");
    out.push_str(&format!("  Total URLs:  {}\n", summary.total));
    out.push_str(&format!(
        "  Succeeded:   {} ({:.1}%)\n",
        summary.succeeded,
        percentage(summary.succeeded, summary.total)
    ));
    out.push_str(&format!("  Failed:      {}\n", summary.failed));
    if summary.skipped > 0 {
        out.push_str(&format!("  Not started: {}\n", summary.skipped));
    }
    out.push_str(&format!(
        "  Elapsed:     {:.2}s\n",
        summary.elapsed.as_secs_f64()
    ));

    if summary.halted {
        out.push_str("\nRun halted after the first failure (use --continue to keep going)\n");
    }

    if summary.failed > 0 {
        out.push_str(&format!("\nFailed URLs ({}):\n", summary.failed));
        for outcome in summary.failures() {
            if let CrawlOutcome::Failure {
                url,
                error,
                attempts,
            } = outcome
            {
                out.push_str(&format!(
                    "  - {} ({} attempt(s)): {}\n",
                    url, attempts, error
                ));
            }
        }
    }

    out
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}
