// src/services/feed.rs

//! Read model of the remote collection for display.

use std::sync::Arc;

use crate::error::Result;
use crate::models::Notice;
use crate::services::NoticeSink;

/// Last successfully fetched remote collection, newest first.
pub struct NoticeFeed {
    sink: Arc<dyn NoticeSink>,
    notices: Vec<Notice>,
}

impl NoticeFeed {
    pub fn new(sink: Arc<dyn NoticeSink>) -> Self {
        Self {
            sink,
            notices: Vec::new(),
        }
    }

    /// Re-read the collection.
    ///
    /// On failure the previously held notices are kept as they were.
    pub async fn refresh(&mut self) -> Result<usize> {
        let mut notices = self.sink.list().await?;
        notices.sort_by(Notice::cmp_newest_first);
        self.notices = notices;
        Ok(self.notices.len())
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn find(&self, code: i64) -> Option<&Notice> {
        self.notices.iter().find(|n| n.code == Some(code))
    }
}
