//! Sitemap-Harvest: a sitemap-driven content archiver
//!
//! This crate fetches every URL listed in a sitemap, extracts each page's
//! primary content, and writes it to disk as a markdown document with a YAML
//! metadata block. Requests are throttled, transient failures are retried with
//! exponential backoff, and one bad URL does not abort the batch unless asked to.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod sitemap;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sitemap-Harvest operations
///
/// Run-level faults abort the run before any per-URL work starts; see
/// [`HarvestError::is_fatal`]. Everything else is a per-URL attempt failure
/// that the retry engine may retry.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Failed to fetch sitemap {url}: {message}")]
    SitemapFetch { url: String, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No content extracted from {url}")]
    EmptyContent { url: String },

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Request timeout for {url} after {after_ms}ms")]
    Timeout { url: String, after_ms: u64 },

    #[error("Content extraction failed for {url}: {message}")]
    Extract { url: String, message: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Document metadata error: {0}")]
    Metadata(#[from] serde_yaml::Error),

    #[error("Crawl task for {url} aborted: {message}")]
    Aborted { url: String, message: String },

    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

impl HarvestError {
    /// Returns true for run-level faults that must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::HttpClient(_) | Self::SitemapFetch { .. } | Self::OutputDir { .. }
        )
    }

    /// Returns true if a failed attempt with this error should be retried
    pub fn is_retryable(&self) -> bool {
        !self.is_fatal()
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sitemap-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::CrawlOptions;
pub use crawler::{run_harvest, Coordinator, CrawlOutcome, RunSummary};
pub use extract::{ContentExtractor, ExtractedContent, HtmlExtractor};
pub use output::{assemble, derive_filename, parse_document, DocumentMetadata};
pub use crate::url::canonicalize_url;
