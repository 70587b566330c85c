// src/models/mod.rs

//! Domain models for the notice pipeline.

mod config;
mod notice;
mod selectors;

pub use config::{
    ArchiveConfig, BoardConfig, Config, CrawlerConfig, DispatchConfig, DispatchPolicy,
    RemoteConfig, ScheduleConfig,
};
pub use notice::{MALFORMED_CODE_KEY, Notice};
pub use selectors::BoardSelectors;
