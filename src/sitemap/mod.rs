//! Sitemap reader
//!
//! This module handles:
//! - Downloading the root sitemap
//! - Following sitemap indexes down to a bounded depth
//! - Collecting page URLs in document order

mod parser;

pub use parser::{parse_sitemap, SitemapDocument};

use crate::HarvestError;
use reqwest::Client;

/// Fetches a sitemap and returns every page URL it lists
///
/// Sitemap indexes are followed depth-first in document order, at most
/// `max_depth` levels below the root. URLs are returned as listed, without
/// deduplication.
///
/// # Arguments
///
/// * `client` - HTTP client used for all sitemap requests
/// * `sitemap_url` - URL of the root sitemap
/// * `max_depth` - How many levels of nested indexes to follow
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Page URLs in sitemap order
/// * `Err(HarvestError::SitemapFetch)` - The root sitemap could not be read
///
/// A nested sitemap that fails is logged and skipped.
pub async fn fetch_sitemap_urls(
    client: &Client,
    sitemap_url: &str,
    max_depth: u32,
) -> Result<Vec<String>, HarvestError> {
    let root = fetch_document(client, sitemap_url)
        .await
        .map_err(|message| HarvestError::SitemapFetch {
            url: sitemap_url.to_string(),
            message,
        })?;

    let mut urls = Vec::new();
    // (document, depth), popped from the back
    let mut stack = vec![(root, 0u32)];

    while let Some((document, depth)) = stack.pop() {
        match document {
            SitemapDocument::UrlSet(locs) => urls.extend(locs),
            SitemapDocument::Index(children) => {
                if depth >= max_depth {
                    tracing::warn!(
                        "Sitemap index nested deeper than {} level(s); skipping {} child sitemap(s)",
                        max_depth,
                        children.len()
                    );
                    continue;
                }

                // Fetch in order, push reversed so the first child is handled first
                let mut fetched = Vec::with_capacity(children.len());
                for child in children {
                    match fetch_document(client, &child).await {
                        Ok(doc) => fetched.push((doc, depth + 1)),
                        Err(message) => {
                            tracing::warn!("Skipping sitemap {}: {}", child, message)
                        }
                    }
                }
                stack.extend(fetched.into_iter().rev());
            }
        }
    }

    tracing::debug!("Collected {} URL(s) from {}", urls.len(), sitemap_url);
    Ok(urls)
}

async fn fetch_document(client: &Client, url: &str) -> Result<SitemapDocument, String> {
    tracing::debug!("Fetching sitemap {}", url);

    let response = client.get(url).send().await.map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status));
    }

    let body = response.text().await.map_err(|e| e.to_string())?;
    parse_sitemap(&body)
}
