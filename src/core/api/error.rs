//! Error types for the scraping backend gateway.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by [`super::ApiGateway`] calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client-side timeout elapsed before a response arrived.
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Connection refused, DNS failure, reset, and other transport faults.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `detail` field of the error body, when the backend sent one.
        detail: Option<String>,
    },

    /// A 2xx body did not have the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// The configured base URL cannot address an endpoint.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Creates a status error from a code and optional detail.
    #[must_use]
    pub fn status(status: u16, detail: Option<String>) -> Self {
        Self::Status { status, detail }
    }

    /// HTTP status code, for status errors.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for a 403 rejection (wrong deletion password).
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status_code() == Some(403)
    }

    /// Returns true when the backend could not be reached at all.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transport(_))
    }

    /// Text shown to the operator: the backend `detail` if present, else the
    /// error's display text.
    #[must_use]
    pub fn operator_message(&self) -> String {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Extract a human-readable `detail` from a FastAPI-style error body.
///
/// `detail` is either a string or a list of validation entries carrying `msg`.
pub(crate) fn detail_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|e| e.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}
