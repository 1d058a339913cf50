//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small site and run the full crawl
//! cycle end-to-end over HTTP.

use tokio_util::sync::CancellationToken;
use url_crawler::config::Config;
use url_crawler::crawler::{run_crawl, CrawlOptions, Crawler, HttpFetcher, Termination};
use url_crawler::output::{render_report, OutputFormat};
use url_crawler::ReferenceKind;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted at the mock server
fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.crawler.root_url = format!("{}/", server.uri());
    config.crawler.max_concurrent_pages_open = 4;
    config.crawler.request_timeout_secs = 5;
    config.crawler.connect_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, route: &str, body: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_site_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"
        <a href="/about">About</a>
        <a href="/blog">Blog</a>
        <img src="/logo.png">
        "#,
        1,
    )
    .await;
    mount_page(&server, "/about", r#"<a href="/">Home</a>"#, 1).await;
    mount_page(
        &server,
        "/blog",
        r#"<a href="/blog/post">Post</a><a href="/about">About</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/blog/post", "<p>No references</p>", 1).await;

    let config = create_test_config(&server);
    let report = run_crawl(&config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.termination, Termination::Exhausted);
    assert_eq!(report.levels, 3);
    assert!(report.failed_pages.is_empty());

    let urls: Vec<&str> = report.pages.urls().collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/about", base),
            format!("{}/blog", base),
            format!("{}/blog/post", base),
        ]
    );

    let root = report.pages.get(&format!("{}/", base)).unwrap();
    assert_eq!(root.len(), 3);
    assert_eq!(
        root.get(&format!("{}/logo.png", base)),
        Some(ReferenceKind::Image)
    );
    assert!(report
        .pages
        .get(&format!("{}/blog/post", base))
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_root_without_trailing_slash_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/">Home</a><a href="/a">A</a>"#, 1).await;
    mount_page(&server, "/a", r#"<a href="/">Home</a>"#, 1).await;

    let mut config = create_test_config(&server);
    config.crawler.root_url = base.clone();
    let report = run_crawl(&config, CancellationToken::new()).await.unwrap();

    let urls: Vec<&str> = report.pages.urls().collect();
    assert_eq!(urls, vec![format!("{}/", base), format!("{}/a", base)]);
    assert_eq!(report.root_url, format!("{}/", base));
}

#[tokio::test]
async fn test_off_domain_links_dropped_and_images_kept() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"
        <a href="/b">B</a>
        <a href="http://other.example/x">Elsewhere</a>
        <img src="http://cdn.example/pic.png">
        "#,
        1,
    )
    .await;
    mount_page(&server, "/b", "", 1).await;

    let report = run_crawl(&create_test_config(&server), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 2);
    assert!(!report.pages.contains("http://other.example/x"));

    let root = report.pages.get(&format!("{}/", base)).unwrap();
    assert!(!root.contains("http://other.example/x"));
    assert_eq!(
        root.get("http://cdn.example/pic.png"),
        Some(ReferenceKind::Image)
    );
    assert_eq!(root.get(&format!("{}/b", base)), Some(ReferenceKind::Link));
}

#[tokio::test]
async fn test_off_domain_links_recorded_but_not_followed() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="http://other.example/x">Elsewhere</a>"#,
        1,
    )
    .await;

    let mut config = create_test_config(&server);
    config.crawler.record_off_domain_links = true;
    let report = run_crawl(&config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.pages.len(), 1);
    let root = report.pages.get(&format!("{}/", server.uri())).unwrap();
    assert_eq!(root.get("http://other.example/x"), Some(ReferenceKind::Link));
}

#[tokio::test]
async fn test_server_error_records_empty_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/broken">Broken</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_crawl(&create_test_config(&server), CancellationToken::new())
        .await
        .unwrap();

    let broken = format!("{}/broken", base);
    assert!(report.pages.get(&broken).unwrap().is_empty());
    assert!(report.failed_pages.contains(&broken));
    assert_eq!(report.termination, Termination::Exhausted);
}

#[tokio::test]
async fn test_non_html_page_is_not_parsed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/report.pdf">Report</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/hidden">not html</a>"#, "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/hidden", "", 0).await;

    let report = run_crawl(&create_test_config(&server), CancellationToken::new())
        .await
        .unwrap();

    let pdf = format!("{}/report.pdf", base);
    assert!(report.pages.get(&pdf).unwrap().is_empty());
    assert!(report.failed_pages.contains(&pdf));
    assert!(!report.pages.contains(&format!("{}/hidden", base)));
}

#[tokio::test]
async fn test_depth_limit_over_http() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/one">One</a>"#, 1).await;
    mount_page(&server, "/one", r#"<a href="/two">Two</a>"#, 1).await;
    mount_page(&server, "/two", "", 0).await;

    let mut config = create_test_config(&server);
    config.crawler.max_depth = 2;
    let report = run_crawl(&config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.termination, Termination::DepthLimit);
    assert_eq!(report.pages.len(), 2);
}

#[tokio::test]
async fn test_repeated_crawls_are_identical() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><img src="/i.png">"#,
        2,
    )
    .await;
    mount_page(&server, "/a", r#"<a href="/b">B</a>"#, 2).await;
    mount_page(&server, "/b", r#"<a href="/a">A</a>"#, 2).await;

    let config = create_test_config(&server);
    let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler).unwrap();
    let crawler = Crawler::new(
        &config.crawler.root_url,
        fetcher,
        CrawlOptions::from(&config.crawler),
    )
    .unwrap();

    let first = crawler.crawl().await;
    let second = crawler.crawl().await;

    assert_eq!(first.pages, second.pages);
    assert_eq!(
        render_report(&first, OutputFormat::Text).unwrap(),
        render_report(&second, OutputFormat::Text).unwrap()
    );
}

#[tokio::test]
async fn test_unreachable_root_yields_empty_record() {
    let mut config = Config::default();
    config.crawler.root_url = "http://127.0.0.1:9/".to_string();
    config.crawler.connect_timeout_secs = 2;
    config.crawler.request_timeout_secs = 2;

    let report = run_crawl(&config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.pages.len(), 1);
    assert!(report.pages.get("http://127.0.0.1:9/").unwrap().is_empty());
    assert_eq!(report.failed_pages.len(), 1);
    assert_eq!(report.levels, 1);
}
