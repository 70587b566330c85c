//! End-to-end pipeline runs over in-memory pages and a recording store.

use std::collections::HashMap;
use std::sync::Arc;

use apot::error::{AppError, Result};
use apot::models::{BoardConfig, DispatchConfig, DispatchPolicy, Notice};
use apot::pipeline::Pipeline;
use apot::scheduler::TaskOutcome;
use apot::services::{ClassSelectorExtractor, NoticeSink, PageSource, SyncDispatcher};
use apot::storage::{FileStore, LocalArchive};
use async_trait::async_trait;
use tokio::sync::Mutex;

struct StaticPages(HashMap<u32, String>);

#[async_trait]
impl PageSource for StaticPages {
    async fn fetch_page(&self, page: u32) -> Result<String> {
        self.0
            .get(&page)
            .cloned()
            .ok_or_else(|| AppError::network(format!("page {page}"), "connection refused"))
    }
}

#[derive(Default)]
struct RecordingStore {
    reject: Vec<i64>,
    received: Mutex<Vec<Option<i64>>>,
}

#[async_trait]
impl NoticeSink for RecordingStore {
    async fn create(&self, notice: &Notice) -> Result<Notice> {
        self.received.lock().await.push(notice.code);
        match notice.code {
            Some(code) if self.reject.contains(&code) => {
                Err(AppError::sync(notice.key(), "status 400 Bad Request"))
            }
            _ => Ok(notice.clone()),
        }
    }

    async fn list(&self) -> Result<Vec<Notice>> {
        Ok(Vec::new())
    }
}

fn row(code: &str, id: &str) -> String {
    format!(
        r#"<tr class="tr-normal">
            <td class="brd-num">{code}</td>
            <td><span class="tag-type-01">Notice</span></td>
            <td><a class="title" onclick="javascript:viewDetail('{id}');">Item {code}</a></td>
            <td class="brd-writer">Registrar</td>
            <td><ul class="etc-list"><li>PDF attached</li></ul></td>
        </tr>"#
    )
}

fn page(rows: &[(&str, &str)]) -> String {
    let body: String = rows.iter().map(|(code, id)| row(code, id)).collect();
    format!("<html><body><table><tbody>{body}</tbody></table></body></html>")
}

fn three_pages() -> StaticPages {
    StaticPages(HashMap::from([
        (1, page(&[("30", "a"), ("29", "b")])),
        (2, page(&[("20", "c"), ("19", "d")])),
        (3, page(&[("10", "e")])),
    ]))
}

fn pipeline(source: StaticPages, store: Arc<RecordingStore>, policy: DispatchPolicy) -> Pipeline {
    let board = BoardConfig {
        detail_url: "https://board.test/{id}/view".to_string(),
        ..BoardConfig::default()
    };
    let dispatcher = SyncDispatcher::new(
        store,
        DispatchConfig {
            policy,
            skip_known: false,
        },
    );
    Pipeline::new(
        Arc::new(source),
        Arc::new(ClassSelectorExtractor::new(&board).unwrap()),
        dispatcher,
        vec![1, 2, 3],
        3,
    )
}

#[tokio::test]
async fn dispatches_in_page_order() {
    let store = Arc::new(RecordingStore::default());
    let report = pipeline(three_pages(), store.clone(), DispatchPolicy::BestEffort)
        .run()
        .await;

    assert_eq!(
        *store.received.lock().await,
        vec![Some(30), Some(29), Some(20), Some(19), Some(10)]
    );
    assert_eq!(report.outcome(), TaskOutcome::NewData);
    assert_eq!(report.dispatch.sent[0].link, "https://board.test/a/view");
    assert_eq!(report.dispatch.sent[0].etc, "PDF attached");
    assert!(report.finished_at >= report.started_at);
}

#[tokio::test]
async fn best_effort_keeps_sending_after_rejection() {
    let store = Arc::new(RecordingStore {
        reject: vec![29],
        ..Default::default()
    });
    let report = pipeline(three_pages(), store.clone(), DispatchPolicy::BestEffort)
        .run()
        .await;

    assert_eq!(store.received.lock().await.len(), 5);
    assert_eq!(report.dispatch.sent.len(), 4);
    assert_eq!(report.dispatch.failed[0].notice.code, Some(29));
    assert_eq!(report.outcome(), TaskOutcome::Failed);
}

#[tokio::test]
async fn halt_on_failure_stops_at_rejection() {
    let store = Arc::new(RecordingStore {
        reject: vec![29],
        ..Default::default()
    });
    let report = pipeline(three_pages(), store.clone(), DispatchPolicy::HaltOnFailure)
        .run()
        .await;

    assert_eq!(*store.received.lock().await, vec![Some(30), Some(29)]);
    assert_eq!(report.dispatch.skipped, 3);
    assert_eq!(report.outcome(), TaskOutcome::Failed);
}

#[tokio::test]
async fn failed_page_does_not_block_others() {
    let mut pages = three_pages();
    pages.0.remove(&2);
    let store = Arc::new(RecordingStore::default());
    let report = pipeline(pages, store.clone(), DispatchPolicy::BestEffort)
        .run()
        .await;

    assert_eq!(report.crawl.page_failures, 1);
    assert_eq!(
        *store.received.lock().await,
        vec![Some(30), Some(29), Some(10)]
    );
    assert_eq!(report.outcome(), TaskOutcome::NewData);
}

#[tokio::test]
async fn unreachable_board_fails_without_dispatch() {
    let store = Arc::new(RecordingStore::default());
    let report = pipeline(
        StaticPages(HashMap::new()),
        store.clone(),
        DispatchPolicy::BestEffort,
    )
    .run()
    .await;

    assert_eq!(report.crawl.page_failures, 3);
    assert!(report.crawl.notices.is_empty());
    assert!(store.received.lock().await.is_empty());
    assert_eq!(report.outcome(), TaskOutcome::Failed);
}

#[tokio::test]
async fn empty_board_is_no_data() {
    let pages = StaticPages(HashMap::from([
        (1, page(&[])),
        (2, page(&[])),
        (3, page(&[])),
    ]));
    let store = Arc::new(RecordingStore::default());
    let report = pipeline(pages, store, DispatchPolicy::BestEffort).run().await;

    assert!(report.crawl.notices.is_empty());
    assert_eq!(report.outcome(), TaskOutcome::NoData);
}

#[tokio::test]
async fn crawled_notices_survive_archive_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(RecordingStore::default());
    let crawl = pipeline(three_pages(), store, DispatchPolicy::BestEffort)
        .crawl()
        .await;

    let archive = LocalArchive::new(FileStore::new(dir.path()));
    for notice in &crawl.notices {
        assert!(archive.save(notice).await);
    }
    assert!(archive.delete("19").await);

    let reopened = LocalArchive::new(FileStore::new(dir.path()));
    let codes: Vec<_> = reopened.read_all().await.into_iter().map(|n| n.code).collect();
    assert_eq!(codes, vec![Some(10), Some(20), Some(29), Some(30)]);

    assert!(reopened.clear().await);
    assert!(reopened.read_all().await.is_empty());
}
