// src/services/dispatcher.rs

//! Sequential dispatch of notices to the remote store.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{DispatchConfig, DispatchPolicy, Notice};
use crate::services::NoticeSink;

/// A notice the remote store did not accept.
#[derive(Debug)]
pub struct FailedDispatch {
    pub notice: Notice,
    pub error: AppError,
}

/// Summary of one dispatch pass.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Notices the store accepted, in send order
    pub sent: Vec<Notice>,
    /// Notices the store rejected or never received
    pub failed: Vec<FailedDispatch>,
    /// Notices not attempted because the pass halted early
    pub skipped: usize,
    /// Notices left out because the store already held their code
    pub already_known: usize,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped == 0
    }
}

/// Posts notices one at a time, in order.
pub struct SyncDispatcher {
    sink: Arc<dyn NoticeSink>,
    config: DispatchConfig,
}

impl SyncDispatcher {
    pub fn new(sink: Arc<dyn NoticeSink>, config: DispatchConfig) -> Self {
        Self { sink, config }
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.config.policy
    }

    /// Send every notice and report what happened to each.
    pub async fn dispatch(&self, notices: Vec<Notice>) -> DispatchReport {
        let mut report = DispatchReport::default();

        let notices = if self.config.skip_known {
            let known = self.known_codes().await;
            let before = notices.len();
            let fresh: Vec<Notice> = notices
                .into_iter()
                .filter(|n| n.code.is_none_or(|code| !known.contains(&code)))
                .collect();
            report.already_known = before - fresh.len();
            fresh
        } else {
            notices
        };

        let total = notices.len();
        for (index, notice) in notices.into_iter().enumerate() {
            match self.sink.create(&notice).await {
                Ok(_) => {
                    log::debug!("Dispatched notice {}", notice.key());
                    report.sent.push(notice);
                }
                Err(error) => {
                    log::warn!("Failed to dispatch notice {}: {}", notice.key(), error);
                    report.failed.push(FailedDispatch { notice, error });

                    if self.config.policy == DispatchPolicy::HaltOnFailure {
                        report.skipped = total - index - 1;
                        if report.skipped > 0 {
                            log::warn!(
                                "Halting dispatch, {} notices not sent this run",
                                report.skipped
                            );
                        }
                        break;
                    }
                }
            }
        }

        report
    }

    /// Codes already held remotely; empty if the store cannot be read.
    async fn known_codes(&self) -> HashSet<i64> {
        match self.sink.list().await {
            Ok(existing) => existing.into_iter().filter_map(|n| n.code).collect(),
            Err(error) => {
                log::warn!("Could not read remote notices, sending all: {}", error);
                HashSet::new()
            }
        }
    }
}
