//! HTTP fetcher and HTML content extractor
//!
//! This module handles:
//! - Building the shared HTTP client with the configured user agent
//! - Fetching pages and classifying transport errors
//! - Picking the page's primary content and stripping boilerplate
//! - Converting the content to Markdown and reading page metadata

use crate::config::CrawlOptions;
use crate::extract::{ContentExtractor, ExtractedContent};
use crate::url::host_of;
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

/// Candidates for the primary content container, best first
const CONTENT_ROOTS: &[&str] = &["article", "main", "[role='main']", "body"];

/// Elements removed from the content before conversion
const BOILERPLATE: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "iframe",
];

/// Longest excerpt taken from the body text
const MAX_EXCERPT_CHARS: usize = 200;

/// Builds the HTTP client shared by the sitemap reader and the extractor
///
/// # Arguments
///
/// * `options` - Run options (user agent and request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(options: &CrawlOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(options.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Extracts content from live HTML pages
pub struct HtmlExtractor {
    client: Client,
    timeout: Duration,
}

impl HtmlExtractor {
    /// Creates an extractor using `client`, whose own timeout is `timeout`
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn classify(&self, url: &str, error: reqwest::Error) -> HarvestError {
        if error.is_timeout() {
            HarvestError::Timeout {
                url: url.to_string(),
                after_ms: self.timeout.as_millis() as u64,
            }
        } else {
            HarvestError::Fetch {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl ContentExtractor for HtmlExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedContent, HarvestError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| self.classify(url, e))?;

        tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());
        Ok(extract_from_html(&body, &final_url))
    }
}

/// Extracts title, metadata and Markdown body from an HTML document
///
/// # Example
///
/// ```
/// use sitemap_harvest::extract::extract_from_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head>
///     <body><nav>Menu</nav><article><p>Hello world</p></article></body></html>"#;
/// let page = Url::parse("https://example.com/post").unwrap();
/// let content = extract_from_html(html, &page);
/// assert_eq!(content.title.as_deref(), Some("Test"));
/// assert_eq!(content.word_count, 2);
/// assert!(!content.body_markdown.contains("Menu"));
/// ```
pub fn extract_from_html(html: &str, page_url: &Url) -> ExtractedContent {
    let document = Html::parse_document(html);

    let title = meta_content(&document, "meta[property='og:title']")
        .or_else(|| first_text(&document, "title"))
        .or_else(|| first_text(&document, "h1"));

    let (content_html, text) = primary_content(&document);
    let word_count = text.split_whitespace().count() as u64;

    let excerpt = meta_content(&document, "meta[name='description']")
        .or_else(|| meta_content(&document, "meta[property='og:description']"))
        .or_else(|| first_paragraph(&content_html))
        .unwrap_or_default();

    let site_name = meta_content(&document, "meta[property='og:site_name']")
        .or_else(|| host_of(page_url.as_str()))
        .unwrap_or_default();

    let author = meta_content(&document, "meta[name='author']")
        .or_else(|| meta_content(&document, "meta[property='article:author']"));

    let published_at = meta_content(&document, "meta[property='article:published_time']")
        .or_else(|| first_attr(&document, "time[datetime]", "datetime"));

    let lead_image_url = meta_content(&document, "meta[property='og:image']")
        .and_then(|src| page_url.join(&src).ok())
        .map(|u| u.to_string());

    ExtractedContent {
        title,
        excerpt,
        site_name,
        author,
        published_at,
        lead_image_url,
        word_count,
        body_markdown: to_markdown(&content_html, &text),
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    (!trimmed.is_empty()).then_some(trimmed)
}

fn meta_content(document: &Html, css: &str) -> Option<String> {
    first_attr(document, css, "content")
}

fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .find_map(non_empty)
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .find_map(|el| non_empty(&el.text().collect::<String>()))
}

/// Returns the cleaned HTML of the content root and its visible text
fn primary_content(document: &Html) -> (String, String) {
    let root = CONTENT_ROOTS
        .iter()
        .filter_map(|css| selector(css))
        .find_map(|sel| document.select(&sel).next());

    let Some(root) = root else {
        return (String::new(), String::new());
    };

    let cleaned = strip_boilerplate(root);
    let text = Html::parse_fragment(&cleaned)
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");

    (cleaned, text)
}

/// Returns the inner HTML of `root` with every boilerplate subtree removed
fn strip_boilerplate(root: ElementRef<'_>) -> String {
    let mut fragment = Html::parse_fragment(&root.inner_html());

    let doomed: Vec<_> = BOILERPLATE
        .iter()
        .filter_map(|css| selector(css))
        .flat_map(|sel| fragment.select(&sel).map(|el| el.id()).collect::<Vec<_>>())
        .collect();

    // Whole subtrees go, so nested matches need no ordering
    for id in doomed {
        if let Some(mut node) = fragment.tree.get_mut(id) {
            node.detach();
        }
    }

    fragment.root_element().inner_html()
}

fn first_paragraph(content_html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(content_html);
    let text = first_text_in_fragment(&fragment, "p")?;

    if text.chars().count() <= MAX_EXCERPT_CHARS {
        return Some(text);
    }

    let truncated: String = text.chars().take(MAX_EXCERPT_CHARS).collect();
    Some(format!("{}...", truncated.trim_end()))
}

fn first_text_in_fragment(fragment: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    fragment
        .select(&sel)
        .find_map(|el| non_empty(&el.text().collect::<String>()))
}

fn to_markdown(content_html: &str, text: &str) -> String {
    let markdown = htmd::convert(content_html).unwrap_or_else(|e| {
        tracing::debug!("Markdown conversion failed, keeping plain text: {}", e);
        text.to_string()
    });

    collapse_blank_lines(&markdown)
}

/// Trims each line's trailing space and squeezes runs of blank lines to one
fn collapse_blank_lines(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut blank_run = 0;

    for line in markdown.trim().lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }

    out
}
