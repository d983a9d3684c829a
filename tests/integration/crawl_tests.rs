use crate::{create_test_options, create_test_urlset, mount_page, mount_xml};
use sitemap_harvest::output::format_summary;
use sitemap_harvest::{
    derive_filename, parse_document, run_harvest, CrawlOptions, CrawlOutcome, HarvestError,
};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves a sitemap listing /a, /b and /c, where /b always fails
async fn create_test_site_with_broken_page(server: &MockServer, b_requests: u64, c_requests: u64) {
    let base = server.uri();
    let urls: Vec<String> = ["a", "b", "c"]
        .iter()
        .map(|p| format!("{}/{}", base, p))
        .collect();
    mount_xml(server, "/sitemap.xml", create_test_urlset(&urls)).await;

    mount_page(server, "/a", "Page A", "Alpha content").await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(500))
        .expect(b_requests)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    "<html><head><title>Page C</title></head><body><p>Gamma</p></body></html>",
                )
                .insert_header("content-type", "text/html"),
        )
        .expect(c_requests)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_writes_documents() {
    let server = MockServer::start().await;
    let base = server.uri();
    let urls = vec![format!("{}/first", base), format!("{}/second", base)];

    mount_xml(&server, "/sitemap.xml", create_test_urlset(&urls)).await;
    mount_page(&server, "/first", "First Post", "Hello from the first post").await;
    mount_page(&server, "/second", "Second Post", "Hello from the second post").await;

    let dir = tempfile::tempdir().unwrap();
    let sitemap = format!("{}/sitemap.xml", base);
    let summary = run_harvest(&sitemap, dir.path(), create_test_options())
        .await
        .expect("harvest failed");

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.exit_code(), 0);

    for (url, title) in urls.iter().zip(["First Post", "Second Post"]) {
        let file = dir.path().join(derive_filename(url));
        let text = std::fs::read_to_string(&file).expect("document missing");
        let (metadata, body) = parse_document(&text).unwrap();

        assert_eq!(&metadata.url, url);
        assert_eq!(metadata.title, title);
        assert!(metadata.word_count >= 5);
        assert!(body.starts_with(&format!("# {}", title)));
        assert!(body.contains("Hello from the"));
        assert!(!body.contains("Site menu"));
    }

    // Only the documents, no leftover temp files
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[tokio::test]
async fn test_continue_on_error_reports_partial_failure() {
    let server = MockServer::start().await;
    // One attempt plus two retries for /b
    create_test_site_with_broken_page(&server, 3, 1).await;

    let options = CrawlOptions {
        continue_on_error: true,
        max_retries: 2,
        ..create_test_options()
    };

    let dir = tempfile::tempdir().unwrap();
    let sitemap = format!("{}/sitemap.xml", server.uri());
    let summary = run_harvest(&sitemap, dir.path(), options).await.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert!(!summary.halted);
    assert_eq!(summary.exit_code(), 0);

    let failed: Vec<&CrawlOutcome> = summary.failures().collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].url().ends_with("/b"));
    assert_eq!(failed[0].attempts(), 3);

    let report = format_summary(&summary);
    assert!(report.contains("Failed URLs (1):"));
    assert!(report.contains("HTTP 500"));
}

#[tokio::test]
async fn test_first_failure_halts_run() {
    let server = MockServer::start().await;
    // /c is never requested
    create_test_site_with_broken_page(&server, 2, 0).await;

    let options = CrawlOptions {
        max_retries: 1,
        initial_retry_delay_ms: 10,
        rate_per_second: 2,
        ..create_test_options()
    };

    let dir = tempfile::tempdir().unwrap();
    let sitemap = format!("{}/sitemap.xml", server.uri());
    let summary = run_harvest(&sitemap, dir.path(), options).await.unwrap();

    assert!(summary.halted);
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 1);
}

#[tokio::test]
async fn test_failure_after_all_admitted_exits_non_zero() {
    let server = MockServer::start().await;
    // No throttle, so /c starts before /b runs out of retries
    create_test_site_with_broken_page(&server, 4, 1).await;

    let options = CrawlOptions {
        max_retries: 3,
        initial_retry_delay_ms: 5,
        ..create_test_options()
    };

    let dir = tempfile::tempdir().unwrap();
    let sitemap = format!("{}/sitemap.xml", server.uri());
    let summary = run_harvest(&sitemap, dir.path(), options).await.unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 0);
    assert!(summary.halted);
    assert_eq!(summary.exit_code(), 1);
}

#[tokio::test]
async fn test_rate_limit_spaces_out_starts() {
    let server = MockServer::start().await;
    let base = server.uri();
    let urls: Vec<String> = (0..5).map(|i| format!("{}/p{}", base, i)).collect();

    mount_xml(&server, "/sitemap.xml", create_test_urlset(&urls)).await;
    for i in 0..5 {
        mount_page(&server, &format!("/p{}", i), "Page", "Some words here").await;
    }

    let options = CrawlOptions {
        rate_per_second: 2,
        ..create_test_options()
    };

    let dir = tempfile::tempdir().unwrap();
    let started = Instant::now();
    let summary = run_harvest(&format!("{}/sitemap.xml", base), dir.path(), options)
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 5);
    // Starts at 0s, 0s, 1s, 1s, 2s
    assert!(
        started.elapsed() >= Duration::from_millis(1_900),
        "five starts at 2/s finished in {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_rate_limit_zero_is_unthrottled() {
    let server = MockServer::start().await;
    let base = server.uri();
    let urls: Vec<String> = (0..10).map(|i| format!("{}/p{}", base, i)).collect();

    mount_xml(&server, "/sitemap.xml", create_test_urlset(&urls)).await;
    for i in 0..10 {
        mount_page(&server, &format!("/p{}", i), "Page", "Some words here").await;
    }

    let dir = tempfile::tempdir().unwrap();
    let started = Instant::now();
    let summary = run_harvest(
        &format!("{}/sitemap.xml", base),
        dir.path(),
        create_test_options(),
    )
    .await
    .unwrap();

    assert_eq!(summary.succeeded, 10);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_empty_page_is_a_failure() {
    let server = MockServer::start().await;
    let base = server.uri();
    let urls = vec![format!("{}/blank", base)];

    mount_xml(&server, "/sitemap.xml", create_test_urlset(&urls)).await;
    Mock::given(method("GET"))
        .and(path("/blank"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><script>app()</script></body></html>"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let options = CrawlOptions {
        continue_on_error: true,
        ..create_test_options()
    };

    let dir = tempfile::tempdir().unwrap();
    let summary = run_harvest(&format!("{}/sitemap.xml", base), dir.path(), options)
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    assert!(matches!(
        &summary.outcomes[0],
        CrawlOutcome::Failure {
            error: HarvestError::EmptyContent { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_output_directory_is_created() {
    let server = MockServer::start().await;
    mount_xml(&server, "/sitemap.xml", create_test_urlset(&[])).await;

    let root = tempfile::tempdir().unwrap();
    let nested = root.path().join("archive").join("2026");

    let summary = run_harvest(
        &format!("{}/sitemap.xml", server.uri()),
        &nested,
        create_test_options(),
    )
    .await
    .unwrap();

    assert!(nested.is_dir());
    assert_eq!(summary.total, 0);
    assert_eq!(summary.exit_code(), 0);
}

#[tokio::test]
async fn test_unusable_output_directory_is_fatal() {
    let server = MockServer::start().await;
    let file = tempfile::NamedTempFile::new().unwrap();
    let below_a_file = file.path().join("out");

    let result = run_harvest(
        &format!("{}/sitemap.xml", server.uri()),
        &below_a_file,
        create_test_options(),
    )
    .await;

    match result {
        Err(e @ HarvestError::OutputDir { .. }) => assert!(e.is_fatal()),
        other => panic!("expected OutputDir error, got {:?}", other),
    }
}
