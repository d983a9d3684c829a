use url::Url;

/// Canonicalizes a URL string for use as a stable identity
///
/// # Canonicalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Parse the URL (lowercases scheme and host, drops the default port,
///    resolves dot segments, turns an empty path into `/`)
/// 3. Serialize it back
///
/// Query strings and fragments are kept verbatim: `?page=2` and `#top` name
/// different documents as far as the output is concerned.
///
/// Unparsable input falls back to the trimmed string, so this never fails.
///
/// # Examples
///
/// ```
/// use sitemap_harvest::url::canonicalize_url;
///
/// assert_eq!(
///     canonicalize_url("HTTPS://Example.COM:443"),
///     "https://example.com/"
/// );
/// ```
pub fn canonicalize_url(url_str: &str) -> String {
    let trimmed = url_str.trim();

    match Url::parse(trimmed) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::trace!("Keeping unparsable URL {:?} as-is: {}", trimmed, e);
            trimmed.to_string()
        }
    }
}

/// Returns the host of a URL, if it has one
pub fn host_of(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.to_lowercase()))
}
