// src/services/remote.rs

//! Client for the remote notice store.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, Notice};
use crate::utils::http::create_async_client;

/// The remote system of record for notices.
#[async_trait]
pub trait NoticeSink: Send + Sync {
    /// Persist one notice, returning the stored copy.
    async fn create(&self, notice: &Notice) -> Result<Notice>;

    /// Fetch the full current collection.
    async fn list(&self) -> Result<Vec<Notice>>;
}

/// HTTP client for the `notifications/` collection.
pub struct RemoteStore {
    client: Client,
    collection_url: Url,
}

impl RemoteStore {
    pub fn new(client: Client, collection_url: Url) -> Self {
        Self {
            client,
            collection_url,
        }
    }

    /// Create a store client from the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = create_async_client(&config.crawler)?;
        Ok(Self::new(client, config.remote.collection_url()?))
    }
}

#[async_trait]
impl NoticeSink for RemoteStore {
    async fn create(&self, notice: &Notice) -> Result<Notice> {
        let url = self.collection_url.as_str();
        let response = self
            .client
            .post(self.collection_url.clone())
            .json(notice)
            .send()
            .await
            .map_err(|e| AppError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::sync(notice.key(), format!("status {status}")));
        }

        response
            .json::<Notice>()
            .await
            .map_err(|e| AppError::sync(notice.key(), format!("unreadable response: {e}")))
    }

    async fn list(&self) -> Result<Vec<Notice>> {
        let url = self.collection_url.as_str();
        let response = self
            .client
            .get(self.collection_url.clone())
            .send()
            .await
            .map_err(|e| AppError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::network(url, format!("status {status}")));
        }

        response
            .json::<Vec<Notice>>()
            .await
            .map_err(|e| AppError::network(url, e))
    }
}
