// src/pipeline/crawl.rs

//! Fetch and extract every configured listing page.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};

use crate::models::Notice;
use crate::services::{NoticeExtractor, PageSource};

/// Summary of a crawl pass.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Notices in page order, then row order within a page
    pub notices: Vec<Notice>,
    pub page_total: usize,
    pub page_failures: usize,
    /// Rows dropped because an earlier page already had their code
    pub duplicates: usize,
}

impl CrawlOutcome {
    pub fn all_pages_failed(&self) -> bool {
        self.page_total > 0 && self.page_failures == self.page_total
    }
}

/// Fetch all pages and return their notices once every fetch has finished.
///
/// Pages are fetched concurrently but consumed in the order given. A page
/// that fails to fetch or parse contributes nothing and does not affect the
/// others.
pub async fn collect_notices(
    source: &dyn PageSource,
    extractor: &dyn NoticeExtractor,
    pages: &[u32],
    concurrency: usize,
) -> CrawlOutcome {
    let mut outcome = CrawlOutcome {
        page_total: pages.len(),
        ..CrawlOutcome::default()
    };

    let mut page_stream = stream::iter(pages.iter().copied())
        .map(|page| async move { (page, source.fetch_page(page).await) })
        .buffered(concurrency.max(1));

    let mut seen = HashSet::new();
    while let Some((page, fetched)) = page_stream.next().await {
        let notices = match fetched.and_then(|html| extractor.extract(&html)) {
            Ok(notices) => notices,
            Err(error) => {
                outcome.page_failures += 1;
                if error.is_network() {
                    log::warn!("Listing page {} unreachable: {}", page, error);
                } else {
                    log::warn!("Listing page {} unreadable: {}", page, error);
                }
                continue;
            }
        };

        log::debug!("Listing page {}: {} rows", page, notices.len());
        for notice in notices {
            if let Some(code) = notice.code {
                if !seen.insert(code) {
                    outcome.duplicates += 1;
                    continue;
                }
            }
            outcome.notices.push(notice);
        }
    }

    outcome
}
