//! Typed wrappers over the platform API endpoints.
//!
//! Thin layer used by the CLI and downstream tooling: each method delegates
//! to the request client and deserializes the JSON body into a model type.

mod types;

use anyhow::{Context, Result};
use log::debug;

pub use types::{Document, Load, MessageAck, MessagePost, NewDocument};
use types::{DocumentList, LoadList};

use crate::http::{ApiClient, RequestOptions};

/// Typed view of the platform API.
pub struct PlatformApi {
    client: ApiClient,
}

impl PlatformApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying request client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_loads(&self) -> Result<Vec<Load>> {
        let value = self
            .client
            .get_json("/loads", RequestOptions::default())
            .await?;
        let parsed: LoadList =
            serde_json::from_value(value).context("Failed to parse loads response")?;
        debug!("Fetched {} loads", parsed.loads.len());
        Ok(parsed.loads)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_load(&self, id: &str) -> Result<Load> {
        let value = self
            .client
            .get_json(&format!("/loads/{}", id), RequestOptions::default())
            .await?;
        serde_json::from_value(value).context("Failed to parse load response")
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        let value = self
            .client
            .get_json("/documents", RequestOptions::default())
            .await?;
        let parsed: DocumentList =
            serde_json::from_value(value).context("Failed to parse documents response")?;
        Ok(parsed.documents)
    }

    #[tracing::instrument(skip(self, document))]
    pub async fn submit_document(&self, document: &NewDocument) -> Result<Document> {
        let value = self
            .client
            .post_json("/documents", document, RequestOptions::default())
            .await?;
        serde_json::from_value(value).context("Failed to parse document response")
    }

    #[tracing::instrument(skip(self, message))]
    pub async fn send_message(&self, message: &MessagePost) -> Result<MessageAck> {
        let value = self
            .client
            .post_json("/messages", message, RequestOptions::default())
            .await?;
        serde_json::from_value(value).context("Failed to parse message acknowledgement")
    }
}
