//! Document assembly
//!
//! A harvested page is written as a YAML metadata block followed by a
//! markdown heading and the page body:
//!
//! ```text
//! ---
//! title: Getting Started
//! excerpt: How to install the tool.
//! site_name: Example Docs
//! url: https://example.com/docs/start
//! word_count: 412
//! length: 2830
//! processed_at: 2026-10-18T09:30:00Z
//! ---
//!
//! # Getting Started
//!
//! ...body...
//! ```

use crate::extract::ExtractedContent;
use crate::HarvestError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Heading used when the page has no title
pub const UNTITLED: &str = "Untitled";

const DELIMITER: &str = "---";

/// Metadata block of a harvested document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub excerpt: String,
    pub site_name: String,
    pub url: String,
    pub word_count: u64,

    /// Length of the markdown body in characters
    pub length: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_image_url: Option<String>,

    /// When the document was assembled (not when it was fetched)
    pub processed_at: DateTime<Utc>,
}

/// A document ready to be written to disk
#[derive(Debug, Clone)]
pub struct SerializedDocument {
    pub metadata: DocumentMetadata,

    /// Full file content: metadata block, heading and body
    pub content: String,
}

/// Assembles the document for `url`, stamped with the current time
///
/// # Returns
///
/// * `Ok(SerializedDocument)` - The serialized document
/// * `Err(HarvestError::EmptyContent)` - The extracted body is blank
pub fn assemble(url: &str, extracted: ExtractedContent) -> Result<SerializedDocument, HarvestError> {
    assemble_at(url, extracted, Utc::now())
}

/// Assembles the document for `url` with an explicit processing time
pub fn assemble_at(
    url: &str,
    extracted: ExtractedContent,
    processed_at: DateTime<Utc>,
) -> Result<SerializedDocument, HarvestError> {
    let body = extracted.body_markdown.trim();
    if body.is_empty() {
        return Err(HarvestError::EmptyContent {
            url: url.to_string(),
        });
    }

    let title = extracted
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED)
        .to_string();

    let metadata = DocumentMetadata {
        title,
        excerpt: extracted.excerpt,
        site_name: extracted.site_name,
        url: url.to_string(),
        word_count: extracted.word_count,
        length: body.chars().count() as u64,
        author: extracted.author,
        published_at: extracted.published_at,
        lead_image_url: extracted.lead_image_url,
        processed_at,
    };

    let frontmatter = serde_yaml::to_string(&metadata)?;
    let content = format!(
        "{DELIMITER}\n{frontmatter}{DELIMITER}\n\n# {}\n\n{}\n",
        single_line(&metadata.title),
        body
    );

    Ok(SerializedDocument { metadata, content })
}

/// Splits a serialized document into its metadata and everything after the block
pub fn parse_document(text: &str) -> Result<(DocumentMetadata, String), HarvestError> {
    let rest = text
        .strip_prefix(DELIMITER)
        .and_then(|r| r.strip_prefix('\n'))
        .ok_or_else(|| {
            HarvestError::MalformedDocument("missing opening metadata delimiter".to_string())
        })?;

    let closing = format!("\n{DELIMITER}\n");
    let end = rest.find(&closing).ok_or_else(|| {
        HarvestError::MalformedDocument("missing closing metadata delimiter".to_string())
    })?;

    let metadata: DocumentMetadata = serde_yaml::from_str(&rest[..=end])?;
    let body = rest[end + closing.len()..].trim_start_matches('\n').to_string();

    Ok((metadata, body))
}

/// Collapses a title onto one line so it stays a single markdown heading
fn single_line(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}
