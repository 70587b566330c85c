// src/services/fetcher.rs

//! Listing page fetcher.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::utils::http::fetch_text;
use crate::utils::url::fill_template;

/// Source of raw listing page markup.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the markup of the listing page with the given index.
    async fn fetch_page(&self, page: u32) -> Result<String>;
}

/// Fetches listing pages over HTTP, one attempt per page.
pub struct HttpPageFetcher {
    client: Client,
    list_url: String,
}

impl HttpPageFetcher {
    /// Create a fetcher for a `{page}` URL template.
    pub fn new(client: Client, list_url: impl Into<String>) -> Self {
        Self {
            client,
            list_url: list_url.into(),
        }
    }

    /// URL of the listing page with the given index.
    pub fn page_url(&self, page: u32) -> String {
        fill_template(&self.list_url, "page", &page.to_string())
    }
}

#[async_trait]
impl PageSource for HttpPageFetcher {
    async fn fetch_page(&self, page: u32) -> Result<String> {
        let url = self.page_url(page);
        log::debug!("Fetching listing page {page}: {url}");
        fetch_text(&self.client, &url).await
    }
}
