//! Integration tests for site checks
//!
//! These tests use wiremock to stand in for the checked site and run
//! fetch → parse → store against an in-memory database.

use page_analyzer::checker::{CheckService, HttpFetcher};
use page_analyzer::config::FetcherConfig;
use page_analyzer::storage::{CheckRepository, Database};
use page_analyzer::Pipeline;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>  Example Domain  </title>
    <meta name="Description" content="An example page for tests">
</head>
<body>
    <h1>Hello <em>there</em></h1>
    <h1>Second heading</h1>
</body>
</html>"#;

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&FetcherConfig {
        user_agent: "CheckTestBot/1.0".to_string(),
        timeout_secs: 2,
    })
    .expect("Failed to build fetcher")
}

/// A pipeline over a fresh database with one registered address
///
/// The mock server listens on 127.0.0.1, which registration rejects, so
/// checks against it go through a [`CheckService`] sharing the database.
fn setup() -> (Pipeline, CheckService<HttpFetcher, CheckRepository>, i64) {
    let db = Database::open_in_memory().expect("Failed to open database");
    let pipeline = Pipeline::new(db.clone(), fetcher());
    let address_id = pipeline
        .register("https://example.com/landing?ref=test")
        .expect("Failed to register address")
        .address
        .id;
    let service = CheckService::new(fetcher(), CheckRepository::new(db));
    (pipeline, service, address_id)
}

/// Returns a local URL with nothing listening on it
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn test_successful_check_stores_extracted_fields() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (pipeline, service, address_id) = setup();
    let outcome = service
        .perform_check(address_id, &mock_server.uri())
        .await
        .unwrap();

    assert!(outcome.success);

    let (_, checks) = pipeline.history(address_id).unwrap().unwrap();
    assert_eq!(checks.len(), 1);
    let check = &checks[0];
    assert_eq!(check.id, outcome.check_id);
    assert_eq!(check.status_code, Some(200));
    assert_eq!(check.h1.as_deref(), Some("Hello there"));
    assert_eq!(check.title.as_deref(), Some("Example Domain"));
    assert_eq!(
        check.description.as_deref(),
        Some("An example page for tests")
    );
}

#[tokio::test]
async fn test_not_found_is_stored_with_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<h1>Not Found</h1>"))
        .mount(&mock_server)
        .await;

    let (pipeline, service, address_id) = setup();
    let outcome = service
        .perform_check(address_id, &mock_server.uri())
        .await
        .unwrap();

    assert!(!outcome.success);
    let check = pipeline.checks().find_by_id(outcome.check_id).unwrap().unwrap();
    assert_eq!(check.status_code, Some(404));
    assert_eq!(check.h1, None);
    assert_eq!(check.title, None);
    assert_eq!(check.description.as_deref(), Some("request_error"));
}

#[tokio::test]
async fn test_unreachable_site_is_stored_without_status() {
    let (pipeline, service, address_id) = setup();

    let outcome = service
        .perform_check(address_id, &closed_port_url())
        .await
        .unwrap();

    assert!(!outcome.success);
    let check = pipeline.checks().find_by_id(outcome.check_id).unwrap().unwrap();
    assert_eq!(check.status_code, None);
    assert_eq!(check.description.as_deref(), Some("connect_error"));
}

#[tokio::test]
async fn test_summary_reflects_latest_check() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let (pipeline, service, address_id) = setup();
    let other = pipeline.register("http://other.org").unwrap().address;

    service
        .perform_check(address_id, &closed_port_url())
        .await
        .unwrap();
    service
        .perform_check(address_id, &mock_server.uri())
        .await
        .unwrap();

    let summaries = pipeline.summaries().unwrap();
    assert_eq!(summaries.len(), 2);

    // Newest address first
    assert_eq!(summaries[0].id, other.id);
    assert_eq!(summaries[0].last_check_at, None);
    assert_eq!(summaries[0].last_status_code, None);

    assert_eq!(summaries[1].id, address_id);
    assert_eq!(summaries[1].name, "https://example.com");
    assert_eq!(summaries[1].last_status_code, Some(503));
    assert!(summaries[1].last_check_at.is_some());

    let (_, checks) = pipeline.history(address_id).unwrap().unwrap();
    assert_eq!(checks.len(), 2);
    assert_eq!(checks[0].status_code, Some(503));
    assert_eq!(checks[1].status_code, None);
}

#[tokio::test]
async fn test_registration_is_idempotent_across_spellings() {
    let (pipeline, _service, address_id) = setup();

    let again = pipeline.register("  HTTPS://EXAMPLE.COM/other  ").unwrap();
    assert!(!again.created);
    assert_eq!(again.address.id, address_id);

    assert!(pipeline.register("not a url").is_err());
    assert_eq!(pipeline.summaries().unwrap().len(), 1);
}
