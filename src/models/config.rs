//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::BoardSelectors;
use crate::utils::parse_selector;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Notice board location and markup selectors
    #[serde(default)]
    pub board: BoardConfig,

    /// Remote notice store
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Sync dispatch behavior
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Background task registration
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Local archive of saved notices
    #[serde(default)]
    pub archive: ArchiveConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == Some(0) {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.pages.is_empty() {
            return Err(AppError::validation("crawler.pages is empty"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if !self.board.list_url.contains("{page}") {
            return Err(AppError::validation(
                "board.list_url must contain a {page} placeholder",
            ));
        }
        if !self.board.detail_url.contains("{id}") {
            return Err(AppError::validation(
                "board.detail_url must contain an {id} placeholder",
            ));
        }
        if self.board.selectors.link_attr.trim().is_empty() {
            return Err(AppError::validation("board.selectors.link_attr is empty"));
        }
        for (_, selector) in self.board.selectors.entries() {
            parse_selector(selector)?;
        }
        self.remote.collection_url()?;
        if self.schedule.task_name.trim().is_empty() {
            return Err(AppError::validation("schedule.task_name is empty"));
        }
        if self.schedule.minimum_interval_secs == 0 {
            return Err(AppError::validation(
                "schedule.minimum_interval_secs must be > 0",
            ));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; the transport default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Listing page indices fetched on every run
    #[serde(default = "defaults::pages")]
    pub pages: Vec<u32>,

    /// Maximum concurrent page fetches
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: None,
            pages: defaults::pages(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Notice board location and markup layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Listing page URL; `{page}` is replaced by the page index
    #[serde(default = "defaults::list_url")]
    pub list_url: String,

    /// Detail page URL; `{id}` is replaced by the id quoted in the click handler
    #[serde(default = "defaults::detail_url")]
    pub detail_url: String,

    /// CSS selectors for rows and fields
    #[serde(default)]
    pub selectors: BoardSelectors,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            list_url: defaults::list_url(),
            detail_url: defaults::detail_url(),
            selectors: BoardSelectors::default(),
        }
    }
}

/// Remote notice store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// API base URL (with trailing slash)
    #[serde(default = "defaults::remote_base_url")]
    pub base_url: String,

    /// Collection endpoint relative to `base_url`
    #[serde(default = "defaults::remote_endpoint")]
    pub endpoint: String,
}

impl RemoteConfig {
    /// Absolute URL of the notice collection.
    pub fn collection_url(&self) -> Result<url::Url> {
        let base = url::Url::parse(&self.base_url)?;
        Ok(base.join(&self.endpoint)?)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::remote_base_url(),
            endpoint: defaults::remote_endpoint(),
        }
    }
}

/// What the dispatcher does after a failed create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Keep posting the remaining notices and report the failures
    #[default]
    BestEffort,
    /// Stop at the first failure; the rest of the run is skipped
    HaltOnFailure,
}

/// Sync dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DispatchConfig {
    #[serde(default)]
    pub policy: DispatchPolicy,

    /// Read the remote collection first and skip codes it already holds
    #[serde(default)]
    pub skip_known: bool,
}

/// Background task registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "defaults::task_name")]
    pub task_name: String,

    /// Minimum interval between runs; the scheduler may run less often
    #[serde(default = "defaults::minimum_interval")]
    pub minimum_interval_secs: u64,

    /// Drop the registration when the process exits
    #[serde(default)]
    pub stop_on_terminate: bool,

    /// Resume the registration when the scheduler starts up again
    #[serde(default = "defaults::start_on_boot")]
    pub start_on_boot: bool,

    /// Where registrations are persisted
    #[serde(default = "defaults::schedule_state_file")]
    pub state_file: PathBuf,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            task_name: defaults::task_name(),
            minimum_interval_secs: defaults::minimum_interval(),
            stop_on_terminate: false,
            start_on_boot: defaults::start_on_boot(),
            state_file: defaults::schedule_state_file(),
        }
    }
}

/// Local archive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "defaults::archive_dir")]
    pub dir: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            dir: defaults::archive_dir(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; apot/0.1)".into()
    }
    pub fn pages() -> Vec<u32> {
        vec![1, 2, 3]
    }
    pub fn max_concurrent() -> usize {
        3
    }

    // Board defaults
    pub fn list_url() -> String {
        "https://www.jbnu.ac.kr/web/news/notice/sub01.do?pageIndex={page}&menu=2377".into()
    }
    pub fn detail_url() -> String {
        "https://www.jbnu.ac.kr/web/Board/{id}/detailView.do?pageIndex=1&menu=2377".into()
    }

    // Remote defaults
    pub fn remote_base_url() -> String {
        "https://backend.apot.pro/api/v1/".into()
    }
    pub fn remote_endpoint() -> String {
        "notifications/".into()
    }

    // Schedule defaults
    pub fn task_name() -> String {
        "background-fetch".into()
    }
    pub fn minimum_interval() -> u64 {
        60
    }
    pub fn start_on_boot() -> bool {
        true
    }
    pub fn schedule_state_file() -> PathBuf {
        PathBuf::from("storage/schedule.json")
    }

    // Archive defaults
    pub fn archive_dir() -> PathBuf {
        PathBuf::from("storage/saved")
    }
}
