//! Detail viewer flows: fetch, render, expand, links and supersede.

use std::time::Duration;

use crossterm::event::KeyCode;
use ratatui::{backend::TestBackend, Terminal};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::collection::Variant;
use crate::core::detail::{DetailState, LOAD_FAILED};
use crate::tests::common::{http_services, key, rendered_contains, wait_until};
use crate::tui::services::Services;
use crate::tui::views::detail_modal::{DetailModal, ARTICLE_WINDOW};

async fn mount_export(server: &MockServer, name: &str, body: Value, delay: Option<Duration>) {
    let mut response = ResponseTemplate::new(200).set_body_json(body);
    if let Some(delay) = delay {
        response = response.set_delay(delay);
    }
    Mock::given(method("POST"))
        .and(path("/export"))
        .and(body_json(json!({ "collection_name": name })))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn settle(modal: &mut DetailModal) -> bool {
    wait_until(|| {
        modal.poll();
        !matches!(modal.detail().state(), DetailState::Loading { .. })
    })
    .await
}

fn render(modal: &DetailModal) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(120, 48)).unwrap();
    terminal.draw(|frame| modal.render(frame, frame.area())).unwrap();
    terminal
}

fn open(modal: &mut DetailModal, name: &str, services: &Services) {
    modal.open(name, services);
    assert!(matches!(modal.detail().state(), DetailState::Loading { .. }));
}

// =============================================================================
// Journal collections
// =============================================================================

#[tokio::test]
async fn test_journal_row_badge_and_expanded_fields() {
    let server = MockServer::start().await;
    mount_export(
        &server,
        "sinta_001",
        json!([{
            "name": "J1",
            "sinta": 2,
            "sinta_link": "http://x",
            "garuda_link": "no garuda link"
        }]),
        None,
    )
    .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut modal = DetailModal::new();
    open(&mut modal, "sinta_001", &services);
    let terminal = render(&modal);
    assert!(rendered_contains(terminal.backend().buffer(), "Loading..."));

    assert!(settle(&mut modal).await);
    assert_eq!(modal.detail().count_line().as_deref(), Some("1 journal"));

    let terminal = render(&modal);
    let buffer = terminal.backend().buffer();
    assert!(rendered_contains(buffer, "sinta 001"));
    assert!(rendered_contains(buffer, "J1"));
    assert!(rendered_contains(buffer, "Sinta 2"));
    assert!(!rendered_contains(buffer, "Sinta Link"));

    modal.handle_key(&key(KeyCode::Enter), &services);
    let terminal = render(&modal);
    let buffer = terminal.backend().buffer();
    assert!(rendered_contains(buffer, "Sinta Level: Sinta 2"));
    assert!(rendered_contains(buffer, "Sinta Link: http://x"));
    assert!(!rendered_contains(buffer, "Garuda Link"));
    assert!(!rendered_contains(buffer, "no garuda link"));

    let links: Vec<String> = modal.selected_links().into_iter().map(|l| l.url).collect();
    assert_eq!(links, vec!["http://x".to_string()]);
}

#[tokio::test]
async fn test_rows_expand_independently_and_reset_on_reopen() {
    let server = MockServer::start().await;
    mount_export(
        &server,
        "sinta_001",
        json!([{ "name": "A" }, { "name": "B" }, {}]),
        None,
    )
    .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut modal = DetailModal::new();
    open(&mut modal, "sinta_001", &services);
    assert!(settle(&mut modal).await);
    assert_eq!(modal.detail().row_count(), 3);

    modal.handle_key(&key(KeyCode::Char('j')), &services);
    modal.handle_key(&key(KeyCode::Char('j')), &services);
    modal.handle_key(&key(KeyCode::Char(' ')), &services);
    assert!(modal.detail().is_expanded(2));
    assert!(!modal.detail().is_expanded(0));

    let terminal = render(&modal);
    assert!(rendered_contains(terminal.backend().buffer(), "Journal 3"));

    open(&mut modal, "sinta_001", &services);
    assert!(settle(&mut modal).await);
    assert!(!modal.detail().is_expanded(2));
    assert_eq!(modal.selected(), 0);
}

#[tokio::test]
async fn test_fetch_failure_shows_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "boom" })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut modal = DetailModal::new();
    open(&mut modal, "sinta_001", &services);
    assert!(settle(&mut modal).await);

    let DetailState::Failed { error, variant, .. } = modal.detail().state() else {
        panic!("expected failed state");
    };
    assert_eq!(error, "boom");
    assert_eq!(*variant, Variant::Journal);

    tokio::time::sleep(Duration::from_millis(50)).await;
    modal.poll();
    let terminal = render(&modal);
    let buffer = terminal.backend().buffer();
    assert!(rendered_contains(buffer, LOAD_FAILED));
    assert!(rendered_contains(buffer, "boom"));
}

#[tokio::test]
async fn test_non_array_body_is_a_load_failure() {
    let server = MockServer::start().await;
    mount_export(&server, "sinta_001", json!({ "detail": "nope" }), None).await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut modal = DetailModal::new();
    open(&mut modal, "sinta_001", &services);
    assert!(settle(&mut modal).await);
    assert!(matches!(modal.detail().state(), DetailState::Failed { .. }));
}

// =============================================================================
// Supersede
// =============================================================================

#[tokio::test]
async fn test_reopen_supersedes_slow_fetch() {
    let server = MockServer::start().await;
    mount_export(
        &server,
        "sinta_slow",
        json!([{ "name": "Slow" }]),
        Some(Duration::from_millis(300)),
    )
    .await;
    mount_export(&server, "sinta_fast", json!([{ "name": "Fast" }]), None).await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut modal = DetailModal::new();
    open(&mut modal, "sinta_slow", &services);
    open(&mut modal, "sinta_fast", &services);
    assert!(settle(&mut modal).await);

    // outlive the slow response and make sure it never lands
    tokio::time::sleep(Duration::from_millis(400)).await;
    modal.poll();

    assert_eq!(modal.detail().name(), Some("sinta_fast"));
    let rows = modal.detail().rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Fast");
}

#[tokio::test]
async fn test_close_discards_in_flight_result() {
    let server = MockServer::start().await;
    mount_export(
        &server,
        "sinta_001",
        json!([{ "name": "Late" }]),
        Some(Duration::from_millis(100)),
    )
    .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut modal = DetailModal::new();
    open(&mut modal, "sinta_001", &services);
    modal.handle_key(&key(KeyCode::Esc), &services);
    assert!(!modal.is_open());

    tokio::time::sleep(Duration::from_millis(250)).await;
    modal.poll();
    assert_eq!(modal.detail().state(), &DetailState::Idle);
}

#[tokio::test]
async fn test_empty_name_stays_idle() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut modal = DetailModal::new();
    modal.open("", &services);
    assert!(!modal.is_open());
    assert_eq!(modal.detail().state(), &DetailState::Idle);
}

// =============================================================================
// Article groups
// =============================================================================

fn article_group(results: usize) -> Value {
    let articles: Vec<Value> = (1..=results)
        .map(|i| {
            if i == 2 {
                json!({ "title": "", "download_link": "no sinta link" })
            } else {
                json!({ "title": format!("Paper {i}"), "download_link": format!("http://d/{i}") })
            }
        })
        .collect();
    json!([{
        "journal_name": "Jurnal Teknik",
        "results_count": results,
        "sinta_level": 3,
        "garuda_link": "http://garuda/j",
        "query": "machine learning",
        "results": articles
    }])
}

#[tokio::test]
async fn test_article_group_lists_articles_with_downloads() {
    let server = MockServer::start().await;
    mount_export(&server, "articles_sinta_001", article_group(3), None).await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut modal = DetailModal::new();
    open(&mut modal, "articles_sinta_001", &services);
    assert!(settle(&mut modal).await);
    assert_eq!(modal.detail().count_line().as_deref(), Some("1 document"));

    modal.handle_key(&key(KeyCode::Enter), &services);
    let terminal = render(&modal);
    let buffer = terminal.backend().buffer();
    assert!(rendered_contains(buffer, "3 articles"));
    assert!(rendered_contains(buffer, "Sinta 3"));
    assert!(rendered_contains(buffer, "Journal Garuda Link: http://garuda/j"));
    assert!(rendered_contains(buffer, "Search Query: machine learning"));
    assert!(rendered_contains(buffer, "Article List (3)"));
    assert!(rendered_contains(buffer, "1. Paper 1"));
    assert!(rendered_contains(buffer, "2. No Title"));

    let links: Vec<String> = modal.selected_links().into_iter().map(|l| l.url).collect();
    assert_eq!(
        links,
        vec![
            "http://garuda/j".to_string(),
            "http://d/1".to_string(),
            "http://d/3".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_link_cursor_and_article_window() {
    let total = ARTICLE_WINDOW + 4;
    let server = MockServer::start().await;
    mount_export(&server, "articles_big", article_group(total), None).await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut modal = DetailModal::new();
    open(&mut modal, "articles_big", &services);
    assert!(settle(&mut modal).await);

    // collapsed rows expose no links
    modal.handle_key(&key(KeyCode::Tab), &services);
    assert_eq!(modal.link_cursor(), None);

    modal.handle_key(&key(KeyCode::Enter), &services);
    let terminal = render(&modal);
    assert!(rendered_contains(
        terminal.backend().buffer(),
        &format!("showing 1-{ARTICLE_WINDOW} of {total}")
    ));

    // wrap backwards onto the last download, which sits past the window
    modal.handle_key(&key(KeyCode::BackTab), &services);
    let last = modal.selected_links().len() - 1;
    assert_eq!(modal.link_cursor(), Some(last));
    assert_eq!(modal.active_link().unwrap().url, format!("http://d/{total}"));
    assert_eq!(modal.article_offset(), total - ARTICLE_WINDOW);

    modal.handle_key(&key(KeyCode::Tab), &services);
    assert_eq!(modal.link_cursor(), Some(0));
    assert_eq!(modal.active_link().unwrap().url, "http://garuda/j");

    for _ in 0..total {
        modal.handle_key(&key(KeyCode::Char('K')), &services);
    }
    assert_eq!(modal.article_offset(), 0);
    modal.handle_key(&key(KeyCode::Char('J')), &services);
    assert_eq!(modal.article_offset(), 1);
}
