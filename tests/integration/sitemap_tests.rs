use crate::{create_test_options, create_test_sitemap_index, create_test_urlset, mount_xml};
use sitemap_harvest::extract::build_http_client;
use sitemap_harvest::sitemap::fetch_sitemap_urls;
use sitemap_harvest::{run_harvest, HarvestError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_urlset_order_is_preserved() {
    let server = MockServer::start().await;
    let base = server.uri();
    let urls = vec![
        format!("{}/z", base),
        format!("{}/a", base),
        format!("{}/a", base),
        format!("{}/m", base),
    ];
    mount_xml(&server, "/sitemap.xml", create_test_urlset(&urls)).await;

    let client = build_http_client(&create_test_options()).unwrap();
    let found = fetch_sitemap_urls(&client, &format!("{}/sitemap.xml", base), 2)
        .await
        .unwrap();

    // Duplicates are kept
    assert_eq!(found, urls);
}

#[tokio::test]
async fn test_sitemap_index_is_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap_index.xml",
        create_test_sitemap_index(&[
            format!("{}/posts.xml", base),
            format!("{}/missing.xml", base),
            format!("{}/pages.xml", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/posts.xml",
        create_test_urlset(&[format!("{}/post-1", base), format!("{}/post-2", base)]),
    )
    .await;
    mount_xml(
        &server,
        "/pages.xml",
        create_test_urlset(&[format!("{}/about", base)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = build_http_client(&create_test_options()).unwrap();
    let found = fetch_sitemap_urls(&client, &format!("{}/sitemap_index.xml", base), 2)
        .await
        .unwrap();

    assert_eq!(
        found,
        vec![
            format!("{}/post-1", base),
            format!("{}/post-2", base),
            format!("{}/about", base),
        ]
    );
}

#[tokio::test]
async fn test_index_depth_is_bounded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/root.xml",
        create_test_sitemap_index(&[format!("{}/nested.xml", base)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/nested.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(create_test_sitemap_index(&[
            format!("{}/leaf.xml", base),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/leaf.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(create_test_urlset(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let client = build_http_client(&create_test_options()).unwrap();
    let found = fetch_sitemap_urls(&client, &format!("{}/root.xml", base), 1)
        .await
        .unwrap();

    assert!(found.is_empty());
}

#[tokio::test]
async fn test_missing_sitemap_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let result = run_harvest(
        &format!("{}/sitemap.xml", server.uri()),
        dir.path(),
        create_test_options(),
    )
    .await;

    match result {
        Err(e @ HarvestError::SitemapFetch { .. }) => {
            assert!(e.is_fatal());
            assert!(e.to_string().contains("404"));
        }
        other => panic!("expected SitemapFetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_sitemap_document_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Welcome!</body></html>"),
        )
        .mount(&server)
        .await;

    let client = build_http_client(&create_test_options()).unwrap();
    let result = fetch_sitemap_urls(&client, &format!("{}/sitemap.xml", server.uri()), 2).await;

    assert!(matches!(result, Err(HarvestError::SitemapFetch { .. })));
}
