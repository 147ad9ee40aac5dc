//! Typed gateway to the scraping backend.
//!
//! The gateway carries no business logic: it maps each backend operation to
//! one HTTP call and turns the response into a typed value or an [`ApiError`].

mod client;
mod error;

pub use client::HttpGateway;
pub use error::{ApiError, Result};

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::core::deletion::DeletionRequest;
use crate::core::jobs::{ScrapeSintaRequest, SearchGarudaRequest};

/// Body of `GET /collections`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionList {
    #[serde(default)]
    pub collections: Vec<String>,
}

/// Body of `POST /export`.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRequest<'a> {
    pub collection_name: &'a str,
}

/// `{ message }` acknowledgement returned by job endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: String,
}

/// Operations exposed by the scraping backend.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// List the names of every stored collection.
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Raw JSON body of a whole collection. Used both for download and for the
    /// detail viewer.
    async fn export_collection(&self, name: &str) -> Result<Bytes>;

    /// Delete a collection. The request is consumed so the credential does not
    /// outlive the call.
    async fn delete_collection(&self, request: DeletionRequest) -> Result<()>;

    /// Start a Sinta journal scrape.
    async fn submit_scrape(&self, request: &ScrapeSintaRequest) -> Result<ServerMessage>;

    /// Start a Garuda article search over a journal collection.
    async fn submit_search(&self, request: &SearchGarudaRequest) -> Result<ServerMessage>;

    /// Health probe against the backend root.
    async fn ping(&self) -> Result<()>;
}
