//! Configuration module for Sitemap-Harvest
//!
//! Options come from an optional TOML file, are overridden by command-line
//! flags, and are validated once before the run starts.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_harvest::config::load_options;
//! use std::path::Path;
//!
//! let options = load_options(Path::new("harvest.toml")).unwrap();
//! println!("Rate limit: {}/s", options.rate_per_second);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CrawlOptions, OptionOverrides, BACKOFF_FACTOR, MAX_RETRY_DELAY_MS};

// Re-export parser functions
pub use parser::{load_options, resolve_options};
pub use validation::validate_sitemap_url;
