use crate::config::types::{CrawlOptions, OptionOverrides};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads crawl options from a TOML file
///
/// Every key is optional; missing keys keep their defaults.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CrawlOptions)` - Successfully loaded and validated options
/// * `Err(ConfigError)` - Failed to load, parse, or validate the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitemap_harvest::config::load_options;
///
/// let options = load_options(Path::new("harvest.toml")).unwrap();
/// println!("Retries: {}", options.max_retries);
/// ```
pub fn load_options(path: &Path) -> Result<CrawlOptions, ConfigError> {
    resolve_options(Some(path), OptionOverrides::default())
}

/// Resolves the final options for a run
///
/// Starts from the config file (or defaults when none is given), applies the
/// command-line overrides, then validates the result.
pub fn resolve_options(
    config_path: Option<&Path>,
    overrides: OptionOverrides,
) -> Result<CrawlOptions, ConfigError> {
    let base = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => CrawlOptions::default(),
    };

    let options = overrides.apply(base);
    validate(&options)?;
    Ok(options)
}
