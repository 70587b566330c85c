//! Pipeline entry points.
//!
//! - `collect_notices`: fetch and extract every listing page
//! - `Pipeline::run`: collect, then dispatch to the remote store

pub mod crawl;
pub mod sync;

pub use crawl::{CrawlOutcome, collect_notices};
pub use sync::{Pipeline, PipelineReport};
