use crate::config::types::CrawlOptions;
use crate::ConfigError;
use url::Url;

/// Validates a complete set of crawl options
pub fn validate(options: &CrawlOptions) -> Result<(), ConfigError> {
    validate_retry_policy(options)?;

    if options.request_timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_ms must be >= 1".to_string(),
        ));
    }

    if options.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the retry/backoff settings
///
/// Any retry count and initial delay is accepted; each wait is capped at
/// `max_retry_delay_ms` when the delay is computed.
fn validate_retry_policy(options: &CrawlOptions) -> Result<(), ConfigError> {
    if !options.backoff_factor.is_finite() || options.backoff_factor < 1.0 {
        return Err(ConfigError::Validation(format!(
            "backoff_factor must be a finite number >= 1.0, got {}",
            options.backoff_factor
        )));
    }

    Ok(())
}

/// Validates the sitemap URL given on the command line
pub fn validate_sitemap_url(sitemap_url: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(sitemap_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", sitemap_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Sitemap URL '{}' must use HTTP or HTTPS",
            sitemap_url
        )));
    }

    Ok(url)
}
