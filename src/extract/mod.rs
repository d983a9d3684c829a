//! Content extraction
//!
//! Turns a page URL into its primary content plus metadata. The coordinator
//! only sees the [`ContentExtractor`] trait, so tests and library users can
//! plug in their own extraction.

mod html;

pub use html::{build_http_client, extract_from_html, HtmlExtractor};

use crate::HarvestError;
use async_trait::async_trait;

/// Primary content and metadata extracted from one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedContent {
    /// Document title, if the page has one
    pub title: Option<String>,

    /// Short summary of the page
    pub excerpt: String,

    /// Name of the publishing site
    pub site_name: String,

    pub author: Option<String>,

    /// Publication date as found on the page
    pub published_at: Option<String>,

    /// Absolute URL of the lead image
    pub lead_image_url: Option<String>,

    /// Words in the primary content
    pub word_count: u64,

    /// Primary content converted to Markdown
    pub body_markdown: String,
}

/// Fetches a page and extracts its primary content
///
/// Implementations must be cheap to share across tasks; one instance serves
/// every URL of a run concurrently.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Extracts the content of `url`
    ///
    /// Any error is treated as a failed attempt and may be retried.
    async fn extract(&self, url: &str) -> Result<ExtractedContent, HarvestError>;
}
