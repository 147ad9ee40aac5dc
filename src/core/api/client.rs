use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::{detail_from_body, ApiError, Result};
use super::{ApiGateway, CollectionList, ExportRequest, ServerMessage};
use crate::core::deletion::DeletionRequest;
use crate::core::jobs::{ScrapeSintaRequest, SearchGarudaRequest};

/// HTTP implementation of [`ApiGateway`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpGateway {
    /// Build a gateway for `base_url`, applying `timeout` to every request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url.trim()).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    fn transport(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }

    /// Pass 2xx responses through; turn anything else into `ApiError::Status`.
    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = detail_from_body(&body);
        warn!(status = status.as_u16(), detail = ?detail, "Backend returned error status");
        Err(ApiError::status(status.as_u16(), detail))
    }

    async fn json<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let bytes = response.bytes().await.map_err(|e| self.transport(e))?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    #[instrument(skip(self))]
    async fn list_collections(&self) -> Result<Vec<String>> {
        let url = self.endpoint("collections")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        let list: CollectionList = self.json(self.check(response).await?).await?;
        debug!(count = list.collections.len(), "Listed collections");
        Ok(list.collections)
    }

    #[instrument(skip(self))]
    async fn export_collection(&self, name: &str) -> Result<Bytes> {
        let url = self.endpoint("export")?;
        let response = self
            .client
            .post(url)
            .json(&ExportRequest {
                collection_name: name,
            })
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        let bytes = self
            .check(response)
            .await?
            .bytes()
            .await
            .map_err(|e| self.transport(e))?;
        debug!(bytes = bytes.len(), "Exported collection");
        Ok(bytes)
    }

    #[instrument(skip(self, request), fields(collection = %request.collection_name))]
    async fn delete_collection(&self, request: DeletionRequest) -> Result<()> {
        let path = format!(
            "collections/{}",
            urlencoding::encode(&request.collection_name)
        );
        let url = self.endpoint(&path)?;
        let response = self
            .client
            .delete(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        drop(request);
        self.check(response).await?;
        Ok(())
    }

    #[instrument(skip(self, request), fields(collection = %request.collection_name))]
    async fn submit_scrape(&self, request: &ScrapeSintaRequest) -> Result<ServerMessage> {
        let url = self.endpoint("scrape/sinta")?;
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        self.json(self.check(response).await?).await
    }

    #[instrument(skip(self, request), fields(source = %request.source_collection))]
    async fn submit_search(&self, request: &SearchGarudaRequest) -> Result<ServerMessage> {
        let url = self.endpoint("scrape/garuda")?;
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        self.json(self.check(response).await?).await
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> Result<()> {
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        self.check(response).await?;
        Ok(())
    }
}
