//! Job form submissions against a wiremock backend.

use std::sync::Arc;

use crossterm::event::KeyCode;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::api::ServerMessage;
use crate::core::lifecycle::SubmitState;
use crate::tests::common::{http_services, press, services_with, typing, wait_until};
use crate::tests::mocks::MockGateway;
use crate::tui::views::scrape_form::ScrapeFormState;
use crate::tui::views::search_form::SearchFormState;

#[tokio::test]
async fn test_scrape_submit_sends_defaults_and_shows_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape/sinta"))
        .and(body_json(json!({
            "sinta_ranks": [1, 2],
            "filter_area_codes": [],
            "max_pages": 10,
            "collection_name": "sinta_scrape_001",
            "overwrite": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Scraping started" })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut form = ScrapeFormState::new();
    assert!(form.handle_input(&press(KeyCode::Enter), &services));
    assert!(form.submit_state().is_in_flight());
    assert!(!form.can_submit());

    // a second Enter while in flight sends nothing
    form.handle_input(&press(KeyCode::Enter), &services);

    assert!(
        wait_until(|| {
            form.poll();
            !form.submit_state().is_in_flight()
        })
        .await
    );
    assert_eq!(
        form.submit_state(),
        &SubmitState::Succeeded("Scraping started".to_string())
    );
    // fields survive a successful submit
    assert_eq!(form.validated().unwrap().collection_name, "sinta_scrape_001");
}

#[tokio::test]
async fn test_scrape_failure_shows_backend_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape/sinta"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "detail": "Collection exists" })))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut form = ScrapeFormState::new();
    form.submit(&services);
    assert!(
        wait_until(|| {
            form.poll();
            !form.submit_state().is_in_flight()
        })
        .await
    );
    assert_eq!(
        form.submit_state(),
        &SubmitState::Failed("Collection exists".to_string())
    );
}

#[tokio::test]
async fn test_invalid_scrape_never_calls_backend() {
    // no expectations: any gateway call would panic the task and hang the form
    let dir = TempDir::new().unwrap();
    let (services, _rx) = services_with(Arc::new(MockGateway::new()), dir.path());

    let mut form = ScrapeFormState::new();
    // deselect ranks 1 and 2
    form.handle_input(&press(KeyCode::Char(' ')), &services);
    form.handle_input(&press(KeyCode::Right), &services);
    form.handle_input(&press(KeyCode::Char(' ')), &services);

    form.handle_input(&press(KeyCode::Enter), &services);
    assert_eq!(form.submit_state(), &SubmitState::Idle);
}

#[tokio::test]
async fn test_search_offers_journals_and_submits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collections": ["articles_sinta_001", "sinta_001", "sinta_002"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/scrape/garuda"))
        .and(body_json(json!({ "query": "deep learning", "source_collection": "sinta_001" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Search queued" })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut form = SearchFormState::new();
    form.load(&services);
    assert!(
        wait_until(|| {
            form.poll();
            !form.sources().is_empty()
        })
        .await
    );
    assert_eq!(form.sources(), &["sinta_001".to_string(), "sinta_002".to_string()]);
    assert_eq!(form.selected_source(), Some("sinta_001"));

    for event in typing("deep learning") {
        form.handle_input(&event, &services);
    }
    form.handle_input(&press(KeyCode::Enter), &services);
    assert!(
        wait_until(|| {
            form.poll();
            !form.submit_state().is_in_flight()
        })
        .await
    );
    assert_eq!(
        form.submit_state(),
        &SubmitState::Succeeded("Search queued".to_string())
    );
}

#[tokio::test]
async fn test_search_without_query_is_rejected_locally() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_list_collections()
        .returning(|| Ok(vec!["sinta_001".to_string()]));
    gateway
        .expect_submit_search()
        .never()
        .returning(|_| Ok(ServerMessage::default()));
    let dir = TempDir::new().unwrap();
    let (services, _rx) = services_with(Arc::new(gateway), dir.path());

    let mut form = SearchFormState::new();
    form.load(&services);
    assert!(
        wait_until(|| {
            form.poll();
            form.selected_source().is_some()
        })
        .await
    );

    form.handle_input(&press(KeyCode::Enter), &services);
    assert_eq!(form.submit_state(), &SubmitState::Idle);
}
