//! Test Fixtures

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use tokio::sync::mpsc;
use wiremock::MockServer;

use crate::core::api::{ApiGateway, HttpGateway};
use crate::tui::events::AppEvent;
use crate::tui::services::Services;

/// Attempts made by [`wait_until`] before giving up.
const SETTLE_ATTEMPTS: usize = 200;

/// Services backed by `api`, exporting into `dir`.
pub fn services_with(
    api: Arc<dyn ApiGateway>,
    dir: &Path,
) -> (Services, mpsc::UnboundedReceiver<AppEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Services::with_gateway(api, dir.to_path_buf(), tx), rx)
}

/// Services talking HTTP to a wiremock server.
pub fn http_services(
    server: &MockServer,
    dir: &Path,
) -> (Services, mpsc::UnboundedReceiver<AppEvent>) {
    let gateway = HttpGateway::new(&server.uri(), Duration::from_secs(5))
        .expect("mock server uri is a valid base url");
    services_with(Arc::new(gateway), dir)
}

/// Run `check` between short sleeps until it returns true.
pub async fn wait_until<F: FnMut() -> bool>(mut check: F) -> bool {
    for _ in 0..SETTLE_ATTEMPTS {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Await `fut` with a generous upper bound.
pub async fn bounded<T>(fut: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("operation did not finish in time")
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn press(code: KeyCode) -> Event {
    Event::Key(key(code))
}

/// Key events for typing `text`.
pub fn typing(text: &str) -> Vec<Event> {
    text.chars().map(|c| press(KeyCode::Char(c))).collect()
}

/// Rows of a rendered buffer as plain text.
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width.max(1))
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect()
}

/// Whether any rendered row contains `needle`.
pub fn rendered_contains(buffer: &Buffer, needle: &str) -> bool {
    buffer_lines(buffer).iter().any(|line| line.contains(needle))
}
