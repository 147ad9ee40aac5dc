use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::api::{ApiError, ApiGateway, HttpGateway};

use super::events::{AppEvent, Notification, NotificationLevel};

/// Centralized handle to backend access shared by all views.
///
/// Created once at startup, then passed by reference to views. The gateway
/// sits behind a trait object so tests can swap in a stub backend.
pub struct Services {
    pub api: Arc<dyn ApiGateway>,
    pub export_dir: PathBuf,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Build the HTTP gateway from config.
    ///
    /// Fails only for an unusable base URL or TLS setup.
    pub fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<Self, ApiError> {
        let gateway = HttpGateway::new(&config.api.base_url, config.api.timeout())?;
        log::info!(
            "Using backend {} (timeout {}s)",
            gateway.base_url(),
            config.api.timeout_secs
        );
        let export_dir = config.export_dir();
        log::info!("Exports go to {}", export_dir.display());

        Ok(Self::with_gateway(Arc::new(gateway), export_dir, event_tx))
    }

    pub fn with_gateway(
        api: Arc<dyn ApiGateway>,
        export_dir: PathBuf,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            api,
            export_dir,
            event_tx,
        }
    }

    /// Push a transient notification into the overlay.
    pub fn notify(&self, message: impl Into<String>, level: NotificationLevel) {
        let _ = self.event_tx.send(AppEvent::Notification(Notification {
            id: 0,
            message: message.into(),
            level,
            ttl_ticks: 0,
        }));
    }

    /// Open a URL in the system browser without blocking the event loop.
    pub fn open_link(&self, url: &str) {
        match open::that_detached(url) {
            Ok(()) => log::info!("Opened link {url}"),
            Err(e) => {
                log::warn!("Failed to open {url}: {e}");
                self.notify(format!("Could not open link: {e}"), NotificationLevel::Error);
            }
        }
    }
}
