//! Mock implementations for testing
//!
//! `MockGateway` stands in for the HTTP gateway where a test only needs a
//! canned answer and no wire traffic.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use mockall::mock;

use crate::core::api::{ApiGateway, Result, ServerMessage};
use crate::core::deletion::DeletionRequest;
use crate::core::jobs::{ScrapeSintaRequest, SearchGarudaRequest};

mock! {
    pub Gateway {}

    #[async_trait]
    impl ApiGateway for Gateway {
        async fn list_collections(&self) -> Result<Vec<String>>;
        async fn export_collection(&self, name: &str) -> Result<Bytes>;
        async fn delete_collection(&self, request: DeletionRequest) -> Result<()>;
        async fn submit_scrape(&self, request: &ScrapeSintaRequest) -> Result<ServerMessage>;
        async fn submit_search(&self, request: &SearchGarudaRequest) -> Result<ServerMessage>;
        async fn ping(&self) -> Result<()>;
    }
}
