//! Collection list flows against a wiremock backend.
//!
//! Covers listing and partitioning, refresh failure, export to disk, and the
//! password gated delete with both backend answers.

use std::time::Duration;

use crossterm::event::KeyCode;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::deletion::{DELETED, INCORRECT_PASSWORD};
use crate::core::export::EXPORT_FAILED;
use crate::core::listing::LIST_FAILED;
use crate::tests::common::{http_services, press, typing, wait_until};
use crate::tui::events::{AppEvent, NotificationLevel};
use crate::tui::services::Services;
use crate::tui::views::alert::AlertLevel;
use crate::tui::views::collections::CollectionsViewState;

async fn mount_list(server: &MockServer, names: &[&str], times: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "collections": names })));
    match times {
        Some(n) => mock.up_to_n_times(n).expect(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

async fn loaded_view(services: &Services, expected: usize) -> CollectionsViewState {
    let mut view = CollectionsViewState::new();
    view.load(services);
    let settled = wait_until(|| {
        view.poll(services);
        !view.index().is_loading()
    })
    .await;
    assert!(settled, "list refresh never finished");
    assert_eq!(view.index().names().len(), expected);
    view
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_partitions_by_variant() {
    let server = MockServer::start().await;
    mount_list(&server, &["sinta_001", "articles_sinta_001"], None).await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let view = loaded_view(&services, 2).await;
    let partition = view.index().partition();
    assert_eq!(partition.journals, vec!["sinta_001".to_string()]);
    assert_eq!(partition.article_groups, vec!["articles_sinta_001".to_string()]);
    assert_eq!(view.index().error(), None);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_list() {
    let server = MockServer::start().await;
    mount_list(&server, &["sinta_001"], Some(1)).await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "db down" })))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut view = loaded_view(&services, 1).await;

    view.handle_input(&press(KeyCode::Char('r')), &services);
    assert!(view.index().is_loading());
    assert!(
        wait_until(|| {
            view.poll(&services);
            !view.index().is_loading()
        })
        .await
    );

    assert_eq!(view.index().error(), Some(LIST_FAILED));
    assert_eq!(view.index().names(), &["sinta_001".to_string()]);
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn test_export_writes_raw_body_and_notifies() {
    let server = MockServer::start().await;
    mount_list(&server, &["sinta_001"], None).await;
    let body = r#"[{"name":"J1","sinta":2}]"#;
    Mock::given(method("POST"))
        .and(path("/export"))
        .and(body_json(json!({ "collection_name": "sinta_001" })))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let (services, mut rx) = http_services(&server, dir.path());

    let mut view = loaded_view(&services, 1).await;
    view.handle_input(&press(KeyCode::Char('e')), &services);
    assert!(view.is_exporting());
    assert!(
        wait_until(|| {
            view.poll(&services);
            !view.is_exporting()
        })
        .await
    );

    let written = std::fs::read_to_string(dir.path().join("sinta_001.json")).unwrap();
    assert_eq!(written, body);
    assert!(view.alert().is_none());

    let Ok(AppEvent::Notification(notification)) = rx.try_recv() else {
        panic!("expected an export notification");
    };
    assert_eq!(notification.level, NotificationLevel::Success);
    assert!(notification.message.contains("sinta_001.json"));
}

#[tokio::test]
async fn test_export_failure_raises_alert() {
    let server = MockServer::start().await;
    mount_list(&server, &["sinta_001"], None).await;
    Mock::given(method("POST"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Collection not found" })))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut view = loaded_view(&services, 1).await;
    view.handle_input(&press(KeyCode::Char('e')), &services);
    assert!(wait_until(|| {
        view.poll(&services);
        view.alert().is_some()
    })
    .await);

    let alert = view.alert().unwrap();
    assert_eq!(alert.level, AlertLevel::Error);
    assert_eq!(alert.title, EXPORT_FAILED);
    assert_eq!(alert.message, "Collection not found");
    assert!(!dir.path().join("sinta_001.json").exists());
    assert_eq!(view.index().names().len(), 1);

    // the alert swallows keys until dismissed
    assert!(view.handle_input(&press(KeyCode::Char('d')), &services));
    assert!(!view.prompt().is_open());
    view.handle_input(&press(KeyCode::Esc), &services);
    assert!(view.alert().is_none());
}

// =============================================================================
// Delete
// =============================================================================

async fn submit_delete(view: &mut CollectionsViewState, services: &Services, password: &str) {
    view.handle_input(&press(KeyCode::Char('d')), services);
    assert_eq!(view.prompt().target(), Some("sinta_001"));
    for event in typing(password) {
        view.handle_input(&event, services);
    }
    view.handle_input(&press(KeyCode::Enter), services);
    assert!(view.prompt().is_submitting());

    let answered = wait_until(|| {
        view.poll(services);
        view.alert().is_some()
    })
    .await;
    assert!(answered, "delete never answered");
}

#[tokio::test]
async fn test_wrong_password_is_denied_without_refresh() {
    let server = MockServer::start().await;
    // only the initial load may hit the list endpoint
    mount_list(&server, &["sinta_001"], Some(1)).await;
    Mock::given(method("DELETE"))
        .and(path("/collections/sinta_001"))
        .and(body_json(json!({ "collection_name": "sinta_001", "password": "wrong" })))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "detail": "Forbidden" })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut view = loaded_view(&services, 1).await;
    submit_delete(&mut view, &services, "wrong").await;

    assert!(!view.prompt().is_open());
    let alert = view.alert().unwrap();
    assert_eq!(alert.level, AlertLevel::Error);
    assert_eq!(alert.message, INCORRECT_PASSWORD);
    assert!(!view.index().is_loading());
    assert_eq!(view.index().names(), &["sinta_001".to_string()]);
}

#[tokio::test]
async fn test_correct_password_deletes_and_refreshes() {
    let server = MockServer::start().await;
    mount_list(&server, &["sinta_001", "articles_x"], Some(1)).await;
    mount_list(&server, &["articles_x"], None).await;
    Mock::given(method("DELETE"))
        .and(path("/collections/sinta_001"))
        .and(body_json(json!({ "collection_name": "sinta_001", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut view = loaded_view(&services, 2).await;
    submit_delete(&mut view, &services, "secret").await;

    assert!(!view.prompt().is_open());
    let alert = view.alert().unwrap();
    assert_eq!(alert.level, AlertLevel::Success);
    assert_eq!(alert.message, DELETED);

    // the row disappears only once the refreshed list arrives
    assert!(
        wait_until(|| {
            view.poll(&services);
            !view.index().is_loading()
        })
        .await
    );
    assert_eq!(view.index().names(), &["articles_x".to_string()]);
}

#[tokio::test]
async fn test_delete_during_refresh_still_refreshes_afterwards() {
    let server = MockServer::start().await;
    mount_list(&server, &["sinta_001", "sinta_002"], Some(1)).await;
    // manual refresh whose answer predates the delete
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "collections": ["sinta_001", "sinta_002"] }))
                .set_delay(Duration::from_millis(600)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, &["sinta_002"], Some(1)).await;
    Mock::given(method("DELETE"))
        .and(path("/collections/sinta_001"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut view = loaded_view(&services, 2).await;
    view.handle_input(&press(KeyCode::Char('r')), &services);
    assert!(view.index().is_loading());
    submit_delete(&mut view, &services, "pw").await;
    assert_eq!(view.alert().unwrap().message, DELETED);

    assert!(
        wait_until(|| {
            view.poll(&services);
            !view.index().is_loading()
        })
        .await
    );
    assert_eq!(view.index().names(), &["sinta_002".to_string()]);
}

#[tokio::test]
async fn test_other_delete_failure_reports_detail() {
    let server = MockServer::start().await;
    mount_list(&server, &["sinta_001"], Some(1)).await;
    Mock::given(method("DELETE"))
        .and(path("/collections/sinta_001"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "disk full" })))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let (services, _rx) = http_services(&server, dir.path());

    let mut view = loaded_view(&services, 1).await;
    submit_delete(&mut view, &services, "pw").await;

    let alert = view.alert().unwrap();
    assert_eq!(alert.message, "Failed to delete collection: disk full");
    assert_eq!(view.index().names().len(), 1);
}
