//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end: HTTP renderer, filesystem sink, crawl graph.

use sitegraph::config::{Config, LogMode};
use sitegraph::crawler::crawl;
use sitegraph::storage::FsSink;
use sitegraph::{CrawlPhase, Fingerprint, SitegraphError};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing under `root`
fn create_test_config(seed: &str, root: &Path, max_pages: usize) -> Config {
    let mut config = Config::from_seed(seed, &root.display().to_string(), max_pages);
    config.renderer.navigation_timeout_ms = 1_000;
    config.renderer.quiescence_timeout_ms = 500;
    config.renderer.user_agent = "SitegraphTest/1.0".to_string();
    config
}

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

/// Number of GET requests the server saw per path
async fn request_counts(server: &MockServer) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for request in server.received_requests().await.unwrap_or_default() {
        *counts.entry(request.url.path().to_string()).or_insert(0) += 1;
    }
    counts
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("Failed to open CSV");
    reader
        .records()
        .map(|r| r.expect("Bad CSV row").iter().map(str::to_string).collect())
        .collect()
}

/// Home links to /a, /b and an external site; /b links to a broken page
async fn mount_small_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><body>
            <img src="/logo.png">
            <a href="/a">A</a>
            <a href="/b">B</a>
            <a href="https://other.example/">Elsewhere</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        server,
        "/a",
        r#"<html><body><a href="/">Home</a><a href="/b">B</a></body></html>"#,
    )
    .await;
    mount_page(
        server,
        "/b",
        r#"<html><body><a href="/broken">Broken</a></body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    mount_small_site(&mock_server).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let seed = format!("{}/", mock_server.uri());
    let config = create_test_config(&seed, dir.path(), 20);

    let outcome = crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.phase, CrawlPhase::Drained);
    assert_eq!(
        outcome.visited_urls().collect::<Vec<_>>(),
        vec![
            seed.clone(),
            format!("{}/a", mock_server.uri()),
            format!("{}/b", mock_server.uri()),
            format!("{}/broken", mock_server.uri()),
        ]
    );
    assert_eq!(outcome.processed_count(), 3);
    assert_eq!(outcome.failed_count(), 1);

    // Graph holds in-scope edges only, including the edge to the broken page
    let graph = &outcome.graph;
    assert!(graph.contains_edge(&seed, &format!("{}/a", mock_server.uri())));
    assert!(graph.contains_edge(&format!("{}/a", mock_server.uri()), &seed));
    assert!(graph.contains_edge(
        &format!("{}/b", mock_server.uri()),
        &format!("{}/broken", mock_server.uri())
    ));
    assert!(!graph.nodes().contains("https://other.example/"));
    assert_eq!(graph.edge_count(), 5);
}

#[tokio::test]
async fn test_each_page_requested_once() {
    let mock_server = MockServer::start().await;
    mount_small_site(&mock_server).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let seed = format!("{}/", mock_server.uri());
    let config = create_test_config(&seed, dir.path(), 20);

    crawl(&config).await.expect("Crawl failed");

    let counts = request_counts(&mock_server).await;
    assert_eq!(counts.len(), 4);
    for (route, count) in counts {
        assert_eq!(count, 1, "{} was requested {} times", route, count);
    }
}

#[tokio::test]
async fn test_output_files_written() {
    let mock_server = MockServer::start().await;
    mount_small_site(&mock_server).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let seed = format!("{}/", mock_server.uri());
    let config = create_test_config(&seed, dir.path(), 20);

    crawl(&config).await.expect("Crawl failed");

    // Extraction log: header, then one row per image and per link
    let rows = read_rows(&dir.path().join("crawl_assets.csv"));
    assert_eq!(rows[0], vec!["Page URL", "Image SRC", "Link HREF"]);
    assert!(rows.contains(&vec![
        seed.clone(),
        format!("{}/logo.png", mock_server.uri()),
        String::new()
    ]));
    assert!(rows.contains(&vec![
        seed.clone(),
        String::new(),
        "https://other.example/".to_string()
    ]));
    // 1 image + 3 links on home, 2 links on /a, 1 link on /b
    assert_eq!(rows.len(), 1 + 4 + 2 + 1);

    // Manifest: one row per visited page, failures included
    let manifest = read_rows(&dir.path().join("pages.csv"));
    assert_eq!(manifest.len(), 5);
    assert!(manifest
        .iter()
        .any(|row| row[0].ends_with("/broken") && row[3] == "failed"));

    // Markup saved under the fingerprinted folder
    let markup_path = dir
        .path()
        .join(FsSink::page_folder(&seed, &Fingerprint::of(&seed)))
        .join("index.html");
    let markup = std::fs::read_to_string(markup_path).expect("Home markup missing");
    assert!(markup.contains("other.example"));
}

#[tokio::test]
async fn test_budget_limits_crawl() {
    let mock_server = MockServer::start().await;
    mount_small_site(&mock_server).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let seed = format!("{}/", mock_server.uri());
    let config = create_test_config(&seed, dir.path(), 2);

    let outcome = crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.visited_count(), 2);
    assert_eq!(outcome.phase, CrawlPhase::BudgetExhausted);
    assert!(outcome.abandoned >= 1);
    assert_eq!(request_counts(&mock_server).await.len(), 2);
}

#[tokio::test]
async fn test_navigation_timeout_isolated() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/slow">Slow</a><a href="/fast">Fast</a>"#,
    )
    .await;
    mount_page(&mock_server, "/fast", "<p>fast</p>").await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>slow</p>", "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let seed = format!("{}/", mock_server.uri());
    let config = create_test_config(&seed, dir.path(), 10);

    let outcome = crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.visited_count(), 3);
    let slow = outcome
        .record(&format!("{}/slow", mock_server.uri()))
        .expect("Slow page not visited");
    assert!(!slow.is_success());
    assert!(outcome
        .record(&format!("{}/fast", mock_server.uri()))
        .expect("Fast page not visited")
        .is_success());
}

#[tokio::test]
async fn test_non_html_page_fails() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/report.pdf">Report</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let seed = format!("{}/", mock_server.uri());
    let config = create_test_config(&seed, dir.path(), 10);

    let outcome = crawl(&config).await.expect("Crawl failed");

    let report = outcome
        .record(&format!("{}/report.pdf", mock_server.uri()))
        .expect("Report not visited");
    assert!(report
        .outcome
        .failure_reason()
        .expect("Report should have failed")
        .contains("application/pdf"));
}

#[tokio::test]
async fn test_concurrent_crawl_matches_sequential_order() {
    let mock_server = MockServer::start().await;
    mount_small_site(&mock_server).await;

    let sequential_dir = TempDir::new().expect("Failed to create temp dir");
    let concurrent_dir = TempDir::new().expect("Failed to create temp dir");
    let seed = format!("{}/", mock_server.uri());

    let sequential = crawl(&create_test_config(&seed, sequential_dir.path(), 20))
        .await
        .expect("Crawl failed");

    let mut config = create_test_config(&seed, concurrent_dir.path(), 20);
    config.crawler.max_concurrent_pages = 4;
    let concurrent = crawl(&config).await.expect("Crawl failed");

    assert_eq!(
        sequential.visited_urls().collect::<Vec<_>>(),
        concurrent.visited_urls().collect::<Vec<_>>()
    );
    assert_eq!(sequential.graph, concurrent.graph);
}

#[tokio::test]
async fn test_append_mode_keeps_earlier_rows() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="https://other.example/">x</a>"#).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let seed = format!("{}/", mock_server.uri());
    let mut config = create_test_config(&seed, dir.path(), 5);
    config.output.log_mode = LogMode::Append;

    crawl(&config).await.expect("First crawl failed");
    crawl(&config).await.expect("Second crawl failed");

    let rows = read_rows(&dir.path().join("crawl_assets.csv"));
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows.iter()
            .filter(|row| row[0] == "Page URL")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_unusable_output_root_is_fatal() {
    let mock_server = MockServer::start().await;
    mount_small_site(&mock_server).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = dir.path().join("not_a_directory");
    std::fs::write(&blocker, "occupied").expect("Failed to create file");

    let seed = format!("{}/", mock_server.uri());
    let config = create_test_config(&seed, &blocker, 10);

    let result = crawl(&config).await;
    assert!(matches!(result, Err(SitegraphError::Storage(_))));
    assert!(request_counts(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_invalid_config_is_fatal() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config("not a url", dir.path(), 10);

    let result = crawl(&config).await;
    assert!(matches!(result, Err(SitegraphError::Config(_))));
}
