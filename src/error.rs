// src/error.rs

//! Unified error handling for the scraper and sync pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport or status failure while fetching a page or talking to the remote store
    #[error("Network error for {context}: {message}")]
    Network { context: String, message: String },

    /// Page markup could not be turned into a document with rows
    #[error("Parse error for {context}: {message}")]
    Parse { context: String, message: String },

    /// Remote store rejected a notice
    #[error("Sync error for notice {code}: {message}")]
    Sync { code: String, message: String },

    /// A whole pipeline run did not complete cleanly
    #[error("Run failed: {0}")]
    Run(String),

    /// Local persistence failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client failed before a request could be sent
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a network error with context.
    pub fn network(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Network {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a whole-page parse error.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a sync error for the notice with the given key.
    pub fn sync(code: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Sync {
            code: code.into(),
            message: message.to_string(),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl fmt::Display) -> Self {
        Self::Storage(message.to_string())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a run-level failure.
    pub fn run(message: impl Into<String>) -> Self {
        Self::Run(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error came from the network layer.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Http(_))
    }
}
