// src/utils/http.rs

//! HTTP client utilities.

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Create a configured asynchronous HTTP client.
///
/// No timeout is set unless the configuration asks for one.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Fetch a URL and return its body, treating non-2xx statuses as failures.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::network(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::network(url, format!("status {status}")));
    }

    response.text().await.map_err(|e| AppError::network(url, e))
}
