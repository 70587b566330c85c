// src/pipeline/sync.rs

//! One full synchronization run: crawl, then dispatch.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Config;
use crate::scheduler::TaskOutcome;
use crate::services::{
    ClassSelectorExtractor, DispatchReport, HttpPageFetcher, NoticeExtractor, NoticeSink,
    PageSource, RemoteStore, SyncDispatcher,
};
use crate::utils::http::create_async_client;

use super::crawl::{CrawlOutcome, collect_notices};

/// Result of one pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub crawl: CrawlOutcome,
    pub dispatch: DispatchReport,
}

impl PipelineReport {
    /// Advisory outcome for the scheduler.
    pub fn outcome(&self) -> TaskOutcome {
        if self.crawl.all_pages_failed() || !self.dispatch.is_success() {
            TaskOutcome::Failed
        } else if self.dispatch.sent.is_empty() {
            TaskOutcome::NoData
        } else {
            TaskOutcome::NewData
        }
    }
}

/// Fetch → extract → dispatch.
pub struct Pipeline {
    source: Arc<dyn PageSource>,
    extractor: Arc<dyn NoticeExtractor>,
    dispatcher: SyncDispatcher,
    pages: Vec<u32>,
    max_concurrent: usize,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn PageSource>,
        extractor: Arc<dyn NoticeExtractor>,
        dispatcher: SyncDispatcher,
        pages: Vec<u32>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            source,
            extractor,
            dispatcher,
            pages,
            max_concurrent,
        }
    }

    /// Wire the HTTP fetcher, class-selector extractor and remote store.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = create_async_client(&config.crawler)?;
        let source = HttpPageFetcher::new(client.clone(), &config.board.list_url);
        let extractor = ClassSelectorExtractor::new(&config.board)?;
        let sink: Arc<dyn NoticeSink> =
            Arc::new(RemoteStore::new(client, config.remote.collection_url()?));

        Ok(Self::new(
            Arc::new(source),
            Arc::new(extractor),
            SyncDispatcher::new(sink, config.dispatch.clone()),
            config.crawler.pages.clone(),
            config.crawler.max_concurrent,
        ))
    }

    /// Run the extraction only, without dispatching.
    pub async fn crawl(&self) -> CrawlOutcome {
        collect_notices(
            self.source.as_ref(),
            self.extractor.as_ref(),
            &self.pages,
            self.max_concurrent,
        )
        .await
    }

    /// Run one full pass. Failures are recorded in the report, never raised.
    pub async fn run(&self) -> PipelineReport {
        let started_at = Utc::now();

        let crawl = self.crawl().await;
        log::info!(
            "Collected {} notices from {}/{} pages",
            crawl.notices.len(),
            crawl.page_total - crawl.page_failures,
            crawl.page_total
        );

        let dispatch = self.dispatcher.dispatch(crawl.notices.clone()).await;
        log::info!(
            "Dispatched {} notices with {:?} ({} failed, {} skipped, {} already known)",
            dispatch.sent.len(),
            self.dispatcher.policy(),
            dispatch.failed.len(),
            dispatch.skipped,
            dispatch.already_known
        );

        PipelineReport {
            started_at,
            finished_at: Utc::now(),
            crawl,
            dispatch,
        }
    }
}
