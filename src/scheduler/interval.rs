// src/scheduler/interval.rs

//! In-process host scheduler driven by tokio intervals.
//!
//! Registrations that should outlive the process are persisted to a JSON
//! state file so a restarted scheduler can resume them.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use crate::error::{AppError, Result};
use crate::utils::fs::{load_json, save_json};

use super::{BackgroundTask, HostScheduler, TaskRegistration};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedRegistration {
    registration: TaskRegistration,
    registered_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SchedulerState {
    #[serde(default)]
    tasks: Vec<PersistedRegistration>,
}

type Entry = (TaskRegistration, Arc<dyn BackgroundTask>);

/// Runs each registered task on its own interval, one invocation at a time.
pub struct IntervalScheduler {
    state_file: PathBuf,
    tasks: Mutex<HashMap<String, Entry>>,
}

impl IntervalScheduler {
    pub fn new(state_file: impl Into<PathBuf>) -> Self {
        Self {
            state_file: state_file.into(),
            tasks: Mutex::new(HashMap::new()),
        }
    }

    async fn load_state(&self) -> Result<SchedulerState> {
        Ok(load_json(&self.state_file).await?.unwrap_or_default())
    }

    /// Registrations persisted by this or a previous process.
    pub async fn persisted(&self) -> Result<Vec<TaskRegistration>> {
        Ok(self
            .load_state()
            .await?
            .tasks
            .into_iter()
            .map(|p| p.registration)
            .collect())
    }

    /// Persisted registrations that should start again on startup.
    pub async fn resumable(&self) -> Result<Vec<TaskRegistration>> {
        Ok(self
            .persisted()
            .await?
            .into_iter()
            .filter(|r| r.start_on_boot)
            .collect())
    }

    /// The persisted registration named like `fallback` if it asked to start
    /// on boot, otherwise `fallback` itself.
    pub async fn resume_or(&self, fallback: TaskRegistration) -> Result<TaskRegistration> {
        let resumed = self
            .resumable()
            .await?
            .into_iter()
            .find(|r| r.name == fallback.name);

        match resumed {
            Some(registration) => {
                log::info!(
                    "Resuming task '{}' every {}s from a previous run",
                    registration.name,
                    registration.minimum_interval.as_secs()
                );
                Ok(registration)
            }
            None => Ok(fallback),
        }
    }

    /// Registrations active in this process.
    pub async fn registered(&self) -> Vec<TaskRegistration> {
        self.tasks
            .lock()
            .await
            .values()
            .map(|(registration, _)| registration.clone())
            .collect()
    }

    /// Run every registered task until `shutdown` completes.
    ///
    /// The first invocation of each task happens immediately. Ticks missed
    /// while a run is still in progress are skipped, not queued.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let entries: Vec<Entry> = self.tasks.lock().await.values().cloned().collect();
        if entries.is_empty() {
            log::warn!("No tasks registered, scheduler idle until shutdown");
        }

        let mut loops = JoinSet::new();
        for (registration, task) in entries {
            loops.spawn(run_task_loop(registration, task));
        }

        shutdown.await;
        log::info!("Scheduler shutting down");
        loops.shutdown().await;
        Ok(())
    }
}

#[async_trait]
impl HostScheduler for IntervalScheduler {
    async fn register(
        &self,
        registration: TaskRegistration,
        task: Arc<dyn BackgroundTask>,
    ) -> Result<()> {
        if registration.minimum_interval.is_zero() {
            return Err(AppError::validation(format!(
                "task '{}' needs a non-zero interval",
                registration.name
            )));
        }

        let mut state = self.load_state().await?;
        state
            .tasks
            .retain(|p| p.registration.name != registration.name);
        if !registration.stop_on_terminate {
            state.tasks.push(PersistedRegistration {
                registration: registration.clone(),
                registered_at: Utc::now(),
            });
        }
        save_json(&self.state_file, &state).await?;

        self.tasks
            .lock()
            .await
            .insert(registration.name.clone(), (registration, task));
        Ok(())
    }

    async fn unregister(&self, name: &str) -> Result<()> {
        self.tasks.lock().await.remove(name);

        let mut state = self.load_state().await?;
        state.tasks.retain(|p| p.registration.name != name);
        save_json(&self.state_file, &state).await
    }
}

async fn run_task_loop(registration: TaskRegistration, task: Arc<dyn BackgroundTask>) {
    let mut ticker = tokio::time::interval(registration.minimum_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let outcome = task.run().await;
        log::debug!("Task '{}' reported {:?}", registration.name, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TaskOutcome;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingTask {
        runs: AtomicUsize,
        running: AtomicBool,
        overlapped: AtomicBool,
    }

    #[async_trait]
    impl BackgroundTask for CountingTask {
        async fn run(&self) -> TaskOutcome {
            if self.running.swap(true, Ordering::SeqCst) {
                self.overlapped.store(true, Ordering::SeqCst);
            }
            tokio::time::sleep(Duration::from_millis(15)).await;
            self.runs.fetch_add(1, Ordering::SeqCst);
            self.running.store(false, Ordering::SeqCst);
            TaskOutcome::NoData
        }
    }

    fn registration(name: &str, stop_on_terminate: bool) -> TaskRegistration {
        TaskRegistration {
            name: name.to_string(),
            minimum_interval: Duration::from_millis(5),
            stop_on_terminate,
            start_on_boot: true,
        }
    }

    #[tokio::test]
    async fn test_runs_without_overlap() {
        let tmp = TempDir::new().unwrap();
        let scheduler = IntervalScheduler::new(tmp.path().join("schedule.json"));
        let task = Arc::new(CountingTask::default());

        scheduler
            .register(registration("sync", false), task.clone())
            .await
            .unwrap();
        scheduler
            .run_until(tokio::time::sleep(Duration::from_millis(100)))
            .await
            .unwrap();

        assert!(task.runs.load(Ordering::SeqCst) >= 2);
        assert!(!task.overlapped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_registration_survives_restart() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("schedule.json");

        let first = IntervalScheduler::new(&path);
        first
            .register(registration("sync", false), Arc::new(CountingTask::default()))
            .await
            .unwrap();
        first
            .register(registration("ephemeral", true), Arc::new(CountingTask::default()))
            .await
            .unwrap();
        assert_eq!(first.registered().await.len(), 2);

        let restarted = IntervalScheduler::new(&path);
        let resumable = restarted.resumable().await.unwrap();
        assert_eq!(resumable, vec![registration("sync", false)]);
        assert!(restarted.registered().await.is_empty());

        restarted.unregister("sync").await.unwrap();
        assert!(restarted.persisted().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resume_prefers_persisted_registration() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("schedule.json");

        let mut persisted = registration("sync", false);
        persisted.minimum_interval = Duration::from_secs(900);
        IntervalScheduler::new(&path)
            .register(persisted.clone(), Arc::new(CountingTask::default()))
            .await
            .unwrap();

        let restarted = IntervalScheduler::new(&path);
        let fallback = registration("sync", false);
        assert_eq!(restarted.resume_or(fallback).await.unwrap(), persisted);

        let other = registration("other", false);
        assert_eq!(restarted.resume_or(other.clone()).await.unwrap(), other);
    }

    #[tokio::test]
    async fn test_resume_ignores_tasks_not_starting_on_boot() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("schedule.json");

        let mut persisted = registration("sync", false);
        persisted.start_on_boot = false;
        persisted.minimum_interval = Duration::from_secs(900);
        IntervalScheduler::new(&path)
            .register(persisted, Arc::new(CountingTask::default()))
            .await
            .unwrap();

        let fallback = registration("sync", false);
        let resumed = IntervalScheduler::new(&path)
            .resume_or(fallback.clone())
            .await
            .unwrap();
        assert_eq!(resumed, fallback);
    }

    #[tokio::test]
    async fn test_rejects_zero_interval() {
        let tmp = TempDir::new().unwrap();
        let scheduler = IntervalScheduler::new(tmp.path().join("schedule.json"));
        let mut zero = registration("sync", false);
        zero.minimum_interval = Duration::ZERO;

        assert!(
            scheduler
                .register(zero, Arc::new(CountingTask::default()))
                .await
                .is_err()
        );
    }
}
