use scraper::{Html, Selector};

/// What a sitemap document lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// A `<urlset>`: page URLs in document order
    UrlSet(Vec<String>),

    /// A `<sitemapindex>`: child sitemap URLs in document order
    Index(Vec<String>),
}

/// Parses a sitemap or sitemap index
///
/// `<loc>` values are trimmed and blank ones skipped. CDATA wrappers are
/// unwrapped. Namespaced extensions such as `<image:loc>` are ignored.
///
/// # Returns
///
/// * `Ok(SitemapDocument)` - The listed locations
/// * `Err(String)` - The document is neither a urlset nor a sitemap index
///
/// # Example
///
/// ```
/// use sitemap_harvest::sitemap::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/</loc></url>
///   <url><loc>https://example.com/about</loc></url>
/// </urlset>"#;
///
/// assert_eq!(
///     parse_sitemap(xml).unwrap(),
///     SitemapDocument::UrlSet(vec![
///         "https://example.com/".to_string(),
///         "https://example.com/about".to_string(),
///     ])
/// );
/// ```
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, String> {
    let unwrapped = xml.replace("<![CDATA[", "").replace("]]>", "");
    let document = Html::parse_document(&unwrapped);

    if has_element(&document, "sitemapindex") {
        return Ok(SitemapDocument::Index(locations(&document, "sitemap loc")));
    }

    if has_element(&document, "urlset") {
        return Ok(SitemapDocument::UrlSet(locations(&document, "url loc")));
    }

    Err("document has no <urlset> or <sitemapindex> root".to_string())
}

fn has_element(document: &Html, name: &str) -> bool {
    Selector::parse(name)
        .map(|sel| document.select(&sel).next().is_some())
        .unwrap_or(false)
}

fn locations(document: &Html, css: &str) -> Vec<String> {
    let Ok(sel) = Selector::parse(css) else {
        return Vec::new();
    };

    document
        .select(&sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}
