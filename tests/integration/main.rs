//! Integration tests for Sitemap-Harvest
//!
//! These tests use wiremock to serve sitemaps and pages and run the full
//! harvest cycle end-to-end into a temporary directory.

mod crawl_tests;
mod sitemap_tests;

use sitemap_harvest::CrawlOptions;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Options with no throttle and near-instant retries
pub fn create_test_options() -> CrawlOptions {
    CrawlOptions {
        max_retries: 1,
        initial_retry_delay_ms: 1,
        rate_per_second: 0,
        request_timeout_ms: 5_000,
        user_agent: "TestBot/1.0".to_string(),
        ..Default::default()
    }
}

/// Builds a `<urlset>` listing `urls`
pub fn create_test_urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("  <url><loc>{}</loc></url>\n", u))
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>\n",
        entries
    )
}

/// Builds a `<sitemapindex>` listing `sitemaps`
pub fn create_test_sitemap_index(sitemaps: &[String]) -> String {
    let entries: String = sitemaps
        .iter()
        .map(|u| format!("  <sitemap><loc>{}</loc></sitemap>\n", u))
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</sitemapindex>\n",
        entries
    )
}

/// Serves `body` as XML at `route`
pub async fn mount_xml(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

/// Serves a simple article page at `route`
pub async fn mount_page(server: &MockServer, route: &str, title: &str, text: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    r#"<html><head><title>{}</title></head><body>
                    <nav>Site menu</nav>
                    <article><p>{}</p></article>
                    </body></html>"#,
                    title, text
                ))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}
