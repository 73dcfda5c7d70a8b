//! Integration tests for the category scanner
//!
//! These tests use wiremock to serve forum listing pages and run full scans
//! against them end-to-end.

use prefix_census::config::{Config, PrefixFilter};
use prefix_census::crawler::{scan, CategoryScanner};
use prefix_census::progress::{NoProgress, ScanProgress};
use prefix_census::token::AuthToken;
use prefix_census::{CensusError, FetchError, PageError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATEGORY: u32 = 663;

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, prefixes: Vec<PrefixFilter>) -> Config {
    let mut config = Config::default();
    config.forum.base_url = base_url.to_string();
    config.forum.category_id = CATEGORY;
    config.http.user_agents = vec!["TestBot/1.0".to_string()];
    config.prefixes = prefixes;
    config
}

fn token() -> AuthToken {
    AuthToken::new("test-token")
}

/// A listing page with `threads` entries and an optional pagination control
fn listing_page(threads: usize, last_page: Option<u32>, start_id: usize) -> String {
    let navigation = match last_page {
        Some(last) => {
            let links: String = (1..=last)
                .map(|n| format!(r#"<a href="/forums/{}/page-{}">{}</a>"#, CATEGORY, n, n))
                .collect();
            format!(r#"<div class="PageNav" data-last="{}"><nav>{}</nav></div>"#, last, links)
        }
        None => String::new(),
    };

    let items: String = (0..threads)
        .map(|i| {
            format!(
                r#"<div id="thread-{}" class="discussionListItem"><h3>Thread</h3></div>"#,
                start_id + i
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Category</title></head><body>
        {}
        <div class="discussionList"><div class="latestThreads _insertLoadedContent">{}</div></div>
        </body></html>"#,
        navigation, items
    )
}

async fn mount_page(server: &MockServer, route: &str, prefix_id: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("state", "active"))
        .and(query_param("prefix_id[]", prefix_id.to_string()))
        .and(header("cookie", "dfuid=test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Records every progress update
#[derive(Debug, Default)]
struct RecordingProgress {
    started: Vec<(String, u32)>,
    pages: Vec<(String, u32, u64)>,
    finished: Vec<(String, u64)>,
}

impl ScanProgress for RecordingProgress {
    fn filter_started(&mut self, filter: &PrefixFilter, pages: u32) {
        self.started.push((filter.name.clone(), pages));
    }

    fn page_counted(&mut self, filter: &PrefixFilter, page: u32, cumulative: u64) {
        self.pages.push((filter.name.clone(), page, cumulative));
    }

    fn filter_finished(&mut self, filter: &PrefixFilter, total: u64) {
        self.finished.push((filter.name.clone(), total));
    }
}

#[tokio::test]
async fn test_scan_sums_threads_across_pages() {
    let server = MockServer::start().await;
    let route = format!("/forums/{}", CATEGORY);

    mount_page(&server, &route, 217, listing_page(2, Some(2), 1)).await;
    mount_page(&server, &format!("{}/page-1", route), 217, listing_page(2, Some(2), 1)).await;
    mount_page(&server, &format!("{}/page-2", route), 217, listing_page(5, Some(2), 100)).await;

    let config = create_test_config(&server.uri(), vec![PrefixFilter::new("Любитель", 217)]);
    let scanner = CategoryScanner::new(config).expect("Failed to create scanner");

    let mut progress = RecordingProgress::default();
    let result = scanner
        .scan(CATEGORY, &[PrefixFilter::new("Любитель", 217)], &token(), &mut progress)
        .await
        .expect("Scan failed");

    assert_eq!(result.get("Любитель"), Some(7));
    assert_eq!(result.tallies()[0].pages, 2);

    assert_eq!(progress.started, vec![("Любитель".to_string(), 2)]);
    assert_eq!(
        progress.pages,
        vec![
            ("Любитель".to_string(), 1, 2),
            ("Любитель".to_string(), 2, 7),
        ]
    );
    assert_eq!(progress.finished, vec![("Любитель".to_string(), 7)]);
}

#[tokio::test]
async fn test_scan_single_page_without_navigation() {
    let server = MockServer::start().await;
    let route = format!("/forums/{}", CATEGORY);

    mount_page(&server, &route, 496, listing_page(4, None, 1)).await;
    mount_page(&server, &format!("{}/page-1", route), 496, listing_page(4, None, 1)).await;

    let config = create_test_config(&server.uri(), vec![PrefixFilter::new("Студия", 496)]);
    let report = scan(config, &token(), &mut NoProgress)
        .await
        .expect("Scan failed");

    assert_eq!(report.category_id, CATEGORY);
    assert_eq!(report.result.get("Студия"), Some(4));
    assert_eq!(report.result.tallies()[0].pages, 1);
    assert!(report.finished_at >= report.started_at);
}

#[tokio::test]
async fn test_scan_keeps_filter_order() {
    let server = MockServer::start().await;
    let route = format!("/forums/{}", CATEGORY);

    mount_page(&server, &route, 464, listing_page(3, None, 1)).await;
    mount_page(&server, &format!("{}/page-1", route), 464, listing_page(3, None, 1)).await;
    mount_page(&server, &route, 215, listing_page(1, Some(3), 1)).await;
    for page in 1..=3 {
        mount_page(
            &server,
            &format!("{}/page-{}", route, page),
            215,
            listing_page(page as usize, Some(3), page as usize * 10),
        )
        .await;
    }

    let prefixes = vec![
        PrefixFilter::new("Новичок", 464),
        PrefixFilter::new("Профи", 215),
    ];
    let config = create_test_config(&server.uri(), prefixes);
    let report = scan(config, &token(), &mut NoProgress)
        .await
        .expect("Scan failed");

    let names: Vec<&str> = report
        .result
        .tallies()
        .iter()
        .map(|tally| tally.name.as_str())
        .collect();
    assert_eq!(names, vec!["Новичок", "Профи"]);
    assert_eq!(report.result.get("Новичок"), Some(3));
    assert_eq!(report.result.get("Профи"), Some(6));
    assert_eq!(report.result.total_threads(), 9);
}

#[tokio::test]
async fn test_missing_thread_container_aborts_scan() {
    let server = MockServer::start().await;
    let route = format!("/forums/{}", CATEGORY);

    mount_page(&server, &route, 217, listing_page(2, Some(2), 1)).await;
    mount_page(&server, &format!("{}/page-1", route), 217, listing_page(2, Some(2), 1)).await;
    mount_page(
        &server,
        &format!("{}/page-2", route),
        217,
        "<html><body><p>Access denied</p></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&server.uri(), vec![PrefixFilter::new("Любитель", 217)]);
    let mut progress = RecordingProgress::default();
    let result = scan(config, &token(), &mut progress).await;

    match result {
        Err(CensusError::Page { url, source }) => {
            assert!(url.contains("/page-2"));
            assert!(matches!(source, PageError::Structure));
        }
        other => panic!("expected structure error, got {:?}", other),
    }
    assert_eq!(progress.pages.len(), 1);
    assert!(progress.finished.is_empty());
}

#[tokio::test]
async fn test_unparseable_page_count_aborts_scan() {
    let server = MockServer::start().await;
    let route = format!("/forums/{}", CATEGORY);

    let body = r#"<html><body>
        <div class="PageNav"><nav><a href="page-1">1</a><a href="page-2">Next</a></nav></div>
        <div class="latestThreads _insertLoadedContent"><div id="thread-1"></div></div>
        </body></html>"#;
    mount_page(&server, &route, 404, body.to_string()).await;

    let config = create_test_config(&server.uri(), vec![PrefixFilter::new("Художник", 404)]);
    let result = scan(config, &token(), &mut NoProgress).await;

    assert!(matches!(
        result,
        Err(CensusError::Page {
            source: PageError::PageCount { .. },
            ..
        })
    ));
}

#[tokio::test]
async fn test_http_error_aborts_scan() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), vec![PrefixFilter::new("Полупрофи", 216)]);
    let result = scan(config, &token(), &mut NoProgress).await;

    assert!(matches!(
        result,
        Err(CensusError::Fetch(FetchError::Status { status: 500, .. }))
    ));
}

#[tokio::test]
async fn test_user_agent_and_extra_headers_are_sent() {
    let server = MockServer::start().await;
    let route = format!("/forums/{}", CATEGORY);

    for route in [route.clone(), format!("{}/page-1", route)] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("user-agent", "TestBot/1.0"))
            .and(header("accept-language", "ru-RU"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(1, None, 1)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut config = create_test_config(&server.uri(), vec![PrefixFilter::new("Профи", 215)]);
    config
        .http
        .headers
        .insert("Accept-Language".to_string(), "ru-RU".to_string());

    let report = scan(config, &token(), &mut NoProgress)
        .await
        .expect("Scan failed");
    assert_eq!(report.result.get("Профи"), Some(1));

    server.verify().await;
}
