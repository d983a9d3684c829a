use crate::url::canonicalize_url;
use sha2::{Digest, Sha256};

/// Extension given to every output document
pub const DOCUMENT_EXTENSION: &str = "md";

/// Derives the output file name for a URL
///
/// The name is the hex-encoded SHA-256 digest of the canonical URL plus a
/// fixed extension. It is a single path segment (hex digits, one dot, the
/// extension), never empty, and identical across runs, so a re-run overwrites
/// the previous file instead of duplicating it.
///
/// # Examples
///
/// ```
/// use sitemap_harvest::output::derive_filename;
///
/// let name = derive_filename("https://example.com/blog/post?id=1");
/// assert_eq!(name.len(), 64 + ".md".len());
/// assert!(!name.contains('/'));
/// ```
pub fn derive_filename(url: &str) -> String {
    let canonical = canonicalize_url(url);
    let digest = Sha256::digest(canonical.as_bytes());
    format!("{}.{}", hex::encode(digest), DOCUMENT_EXTENSION)
}
