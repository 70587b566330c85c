//! Service layer for the notice pipeline.
//!
//! - Page fetching (`HttpPageFetcher`)
//! - Row extraction (`ClassSelectorExtractor`)
//! - Remote store access (`RemoteStore`, `NoticeFeed`)
//! - Sequential dispatch (`SyncDispatcher`)

mod dispatcher;
mod extractor;
mod feed;
mod fetcher;
mod remote;

pub use dispatcher::{DispatchReport, FailedDispatch, SyncDispatcher};
pub use extractor::{ClassSelectorExtractor, NoticeExtractor, derive_link};
pub use feed::NoticeFeed;
pub use fetcher::{HttpPageFetcher, PageSource};
pub use remote::{NoticeSink, RemoteStore};
