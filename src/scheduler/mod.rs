// src/scheduler/mod.rs

//! Background task registration.
//!
//! The pipeline is registered as a named recurring task with a host
//! scheduler. The host decides when (and whether) the task actually runs;
//! the task only reports an advisory [`TaskOutcome`] back. Retry and backoff
//! are left entirely to the host.

mod interval;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::ScheduleConfig;
use crate::pipeline::Pipeline;

pub use interval::IntervalScheduler;

/// Advisory result of one background run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskOutcome {
    NewData,
    NoData,
    Failed,
}

/// How a task asks to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRegistration {
    pub name: String,
    /// Lower bound between runs; not a guarantee
    pub minimum_interval: Duration,
    pub stop_on_terminate: bool,
    pub start_on_boot: bool,
}

impl TaskRegistration {
    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self {
            name: config.task_name.clone(),
            minimum_interval: Duration::from_secs(config.minimum_interval_secs),
            stop_on_terminate: config.stop_on_terminate,
            start_on_boot: config.start_on_boot,
        }
    }
}

/// A unit of background work.
#[async_trait]
pub trait BackgroundTask: Send + Sync {
    async fn run(&self) -> TaskOutcome;
}

/// Something that invokes registered tasks periodically.
#[async_trait]
pub trait HostScheduler: Send + Sync {
    async fn register(
        &self,
        registration: TaskRegistration,
        task: Arc<dyn BackgroundTask>,
    ) -> Result<()>;

    async fn unregister(&self, name: &str) -> Result<()>;
}

/// The sync pipeline as a background task.
pub struct SyncTask {
    pipeline: Pipeline,
}

impl SyncTask {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl BackgroundTask for SyncTask {
    async fn run(&self) -> TaskOutcome {
        log::info!("Background sync started");
        let report = self.pipeline.run().await;
        let outcome = report.outcome();

        let elapsed = report.finished_at - report.started_at;
        match outcome {
            TaskOutcome::Failed => log::error!(
                "Background sync failed after {}ms: {} page failures, {} dispatch failures",
                elapsed.num_milliseconds(),
                report.crawl.page_failures,
                report.dispatch.failed.len()
            ),
            _ => log::info!(
                "Background sync finished in {}ms: {:?}",
                elapsed.num_milliseconds(),
                outcome
            ),
        }
        outcome
    }
}

/// Register the sync pipeline with a host scheduler.
pub async fn register_sync_task(
    scheduler: &dyn HostScheduler,
    registration: TaskRegistration,
    pipeline: Pipeline,
) -> Result<TaskRegistration> {
    scheduler
        .register(registration.clone(), Arc::new(SyncTask::new(pipeline)))
        .await?;
    log::info!(
        "Registered task '{}' (minimum interval {}s)",
        registration.name,
        registration.minimum_interval.as_secs()
    );
    Ok(registration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_from_default_config() {
        let registration = TaskRegistration::from_config(&ScheduleConfig::default());
        assert_eq!(registration.name, "background-fetch");
        assert_eq!(registration.minimum_interval, Duration::from_secs(60));
        assert!(!registration.stop_on_terminate);
        assert!(registration.start_on_boot);
    }
}
