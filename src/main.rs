//! Sitemap-Harvest main entry point
//!
//! This is the command-line interface for the Sitemap-Harvest content archiver.

use anyhow::{Context, Result};
use clap::Parser;
use sitemap_harvest::config::{resolve_options, validate_sitemap_url, OptionOverrides};
use sitemap_harvest::crawler::{run_harvest, RunSummary};
use sitemap_harvest::output::format_summary;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Sitemap-Harvest: a sitemap-driven content archiver
///
/// Reads every URL from a sitemap, extracts each page's primary content and
/// saves it as a markdown file with YAML metadata. Requests are rate limited
/// and failed pages are retried with exponential backoff.
#[derive(Parser, Debug)]
#[command(name = "sitemap-harvest")]
#[command(version)]
#[command(about = "A sitemap-driven content archiver", long_about = None)]
struct Cli {
    /// URL of the sitemap (or sitemap index) to harvest
    #[arg(value_name = "SITEMAP_URL")]
    sitemap_url: String,

    /// Directory the markdown files are written into (created if missing)
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "debug")]
    quiet: bool,

    /// Keep going when a URL fails instead of stopping the run
    #[arg(long = "continue")]
    continue_on_error: bool,

    /// Retries per URL after the first attempt [default: 3]
    #[arg(short, long, value_name = "N")]
    retries: Option<u32>,

    /// Delay before the first retry, in milliseconds; waits are capped at 60000 [default: 1000]
    #[arg(short = 'd', long, value_name = "MS")]
    retry_delay: Option<u64>,

    /// Maximum request starts per second, 0 disables [default: 1]
    #[arg(short = 'l', long, value_name = "N")]
    rate_limit: Option<u32>,

    /// Per-attempt request timeout, in milliseconds [default: 30000]
    #[arg(short, long, value_name = "MS")]
    timeout: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// User-Agent header sent with every request
    #[arg(long, value_name = "STRING")]
    user_agent: Option<String>,
}

impl Cli {
    fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            continue_on_error: self.continue_on_error,
            debug: self.debug,
            max_retries: self.retries,
            initial_retry_delay_ms: self.retry_delay,
            rate_per_second: self.rate_limit,
            request_timeout_ms: self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(summary) => {
            println!("{}", format_summary(&summary));
            ExitCode::from(summary.exit_code())
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunSummary> {
    let options = resolve_options(cli.config.as_deref(), cli.overrides());

    // Logging comes up before reporting a bad config so the error is visible
    let debug = options.as_ref().map(|o| o.debug).unwrap_or(cli.debug);
    setup_logging(debug, cli.quiet);

    let options = match &cli.config {
        Some(path) => options
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => options.context("Invalid options")?,
    };
    tracing::debug!("Resolved options: {:?}", options);

    let sitemap_url =
        validate_sitemap_url(&cli.sitemap_url).context("Sitemap URL is not usable")?;

    let summary = run_harvest(sitemap_url.as_str(), &cli.output_dir, options)
        .await
        .context("Harvest aborted")?;

    Ok(summary)
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` takes precedence over the flags when set.
fn setup_logging(debug: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            // Only show errors
            EnvFilter::new("error")
        } else if debug {
            EnvFilter::new("sitemap_harvest=debug,info")
        } else {
            EnvFilter::new("sitemap_harvest=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
