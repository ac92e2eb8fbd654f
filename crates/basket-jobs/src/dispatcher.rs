//! Dispatcher that hands due jobs to their handlers.

use crate::error::{JobError, JobResult};
use crate::job::JobData;
use crate::metrics;
use crate::scheduler::DeferredActionScheduler;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Handles due jobs of one job type.
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// Job name this handler is registered under.
    fn job_name(&self) -> &'static str;

    /// Runs a due job.
    async fn handle(&self, job: JobData) -> JobResult<()>;
}

/// Dispatcher configuration.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// How often to look for due jobs.
    pub poll_interval: Duration,

    /// Maximum jobs taken per tick.
    pub batch_size: usize,

    /// Per-job handler timeout.
    pub job_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            batch_size: 50,
            job_timeout: Duration::from_secs(30),
        }
    }
}

/// Dispatcher statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherStats {
    /// Jobs whose handler succeeded.
    pub jobs_processed: u64,
    /// Jobs whose handler failed, timed out, or had no handler.
    pub jobs_failed: u64,
}

/// Polls a scheduler for due jobs and routes them to handlers by job name.
///
/// Jobs are taken at most once; a failed handler is logged and the job is
/// dropped, since deferred actions are auxiliary.
pub struct JobDispatcher {
    scheduler: Arc<dyn DeferredActionScheduler>,
    config: DispatcherConfig,
    handlers: RwLock<HashMap<String, Arc<dyn JobHandler>>>,
    shutdown_tx: broadcast::Sender<()>,
    stop_requested: AtomicBool,
    running: AtomicBool,
    jobs_processed: AtomicU64,
    jobs_failed: AtomicU64,
}

impl JobDispatcher {
    /// Create a new dispatcher.
    pub fn new(scheduler: Arc<dyn DeferredActionScheduler>, config: DispatcherConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            scheduler,
            config,
            handlers: RwLock::new(HashMap::new()),
            shutdown_tx,
            stop_requested: AtomicBool::new(false),
            running: AtomicBool::new(false),
            jobs_processed: AtomicU64::new(0),
            jobs_failed: AtomicU64::new(0),
        }
    }

    /// Register a handler under its job name, replacing any previous one.
    pub fn register(&self, handler: Arc<dyn JobHandler>) {
        let name = handler.job_name();
        self.handlers.write().insert(name.to_string(), handler);
        info!(job_type = name, "Registered job handler");
    }

    /// Take due jobs once and run their handlers.
    ///
    /// Returns the number of jobs taken.
    pub async fn tick(&self) -> JobResult<usize> {
        let jobs = self
            .scheduler
            .take_due(Utc::now(), self.config.batch_size)
            .await?;
        let count = jobs.len();

        for job in jobs {
            self.dispatch(job).await;
        }

        if let Ok(pending) = self.scheduler.pending().await {
            metrics::set_pending(pending);
        }

        Ok(count)
    }

    async fn dispatch(&self, job: JobData) {
        let job_id = job.id.clone();
        let job_name = job.name.clone();
        let handler = self.handlers.read().get(&job_name).cloned();

        let result = match handler {
            Some(handler) => match timeout(self.config.job_timeout, handler.handle(job)).await {
                Ok(result) => result,
                Err(_) => Err(JobError::Timeout(self.config.job_timeout.as_secs())),
            },
            None => Err(JobError::UnknownJob(job_name.clone())),
        };

        match result {
            Ok(()) => {
                self.jobs_processed.fetch_add(1, Ordering::Relaxed);
                metrics::record_dispatched(&job_name);
                debug!(job_id = %job_id, job_type = %job_name, "Job completed");
            }
            Err(e) => {
                self.jobs_failed.fetch_add(1, Ordering::Relaxed);
                metrics::record_failed(&job_name);
                warn!(job_id = %job_id, job_type = %job_name, error = %e, "Job failed");
            }
        }
    }

    /// Run until [`JobDispatcher::shutdown`] is called.
    pub async fn run(&self) -> JobResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(JobError::Internal("Dispatcher already running".to_string()));
        }

        info!(
            poll_interval_ms = self.config.poll_interval.as_millis(),
            batch_size = self.config.batch_size,
            "Starting job dispatcher"
        );

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        if self.stop_requested.load(Ordering::SeqCst) {
            self.running.store(false, Ordering::SeqCst);
            return Ok(());
        }

        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Received shutdown signal, stopping job dispatcher");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        error!(error = %e, "Failed to take due jobs");
                    }
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Signal the dispatcher to stop after its current tick.
    ///
    /// A dispatcher that has not started yet returns from `run` immediately.
    pub fn shutdown(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());
    }

    /// Returns true while [`JobDispatcher::run`] is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns processing statistics.
    pub fn stats(&self) -> DispatcherStats {
        DispatcherStats {
            jobs_processed: self.jobs_processed.load(Ordering::Relaxed),
            jobs_failed: self.jobs_failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{Job, JobId};
    use crate::memory::MemoryJobScheduler;
    use crate::scheduler::SchedulerExt;
    use parking_lot::Mutex;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Ping {
        n: u32,
    }

    impl Job for Ping {
        const NAME: &'static str = "ping";
    }

    #[derive(Default)]
    struct RecordingHandler {
        seen: Mutex<Vec<u32>>,
        fail: bool,
    }

    #[async_trait]
    impl JobHandler for RecordingHandler {
        fn job_name(&self) -> &'static str {
            Ping::NAME
        }

        async fn handle(&self, job: JobData) -> JobResult<()> {
            let ping: Ping = job.deserialize()?;
            self.seen.lock().push(ping.n);
            if self.fail {
                return Err(JobError::ExecutionFailed("boom".to_string()));
            }
            Ok(())
        }
    }

    fn setup(fail: bool) -> (Arc<MemoryJobScheduler>, Arc<RecordingHandler>, JobDispatcher) {
        let scheduler = Arc::new(MemoryJobScheduler::new());
        let handler = Arc::new(RecordingHandler {
            fail,
            ..RecordingHandler::default()
        });
        let dispatcher = JobDispatcher::new(scheduler.clone(), DispatcherConfig::default());
        dispatcher.register(handler.clone());
        (scheduler, handler, dispatcher)
    }

    #[tokio::test]
    async fn test_tick_dispatches_only_due_jobs() {
        let (scheduler, handler, dispatcher) = setup(false);
        scheduler.schedule(&Ping { n: 1 }, Duration::ZERO).await.unwrap();
        scheduler.schedule(&Ping { n: 2 }, Duration::from_secs(3600)).await.unwrap();

        assert_eq!(dispatcher.tick().await.unwrap(), 1);
        assert_eq!(*handler.seen.lock(), vec![1]);
        assert_eq!(scheduler.pending().await.unwrap(), 1);
        assert_eq!(dispatcher.stats().jobs_processed, 1);
    }

    #[tokio::test]
    async fn test_cancelled_job_is_never_dispatched() {
        let (scheduler, handler, dispatcher) = setup(false);
        let id = scheduler.schedule(&Ping { n: 7 }, Duration::ZERO).await.unwrap();
        scheduler.cancel(&id).await.unwrap();

        assert_eq!(dispatcher.tick().await.unwrap(), 0);
        assert!(handler.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_failed_handler_is_counted_and_dropped() {
        let (scheduler, _handler, dispatcher) = setup(true);
        scheduler.schedule(&Ping { n: 3 }, Duration::ZERO).await.unwrap();

        dispatcher.tick().await.unwrap();
        assert_eq!(dispatcher.stats().jobs_failed, 1);
        assert_eq!(scheduler.pending().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_job_counts_as_failure() {
        let (scheduler, _handler, dispatcher) = setup(false);
        let data = JobData::new("unknown", "default", "{}".to_string(), Duration::ZERO);
        let _: JobId = scheduler.schedule_data(data).await.unwrap();

        dispatcher.tick().await.unwrap();
        assert_eq!(dispatcher.stats().jobs_failed, 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (_scheduler, _handler, dispatcher) = setup(false);
        let dispatcher = Arc::new(dispatcher);

        let runner = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.run().await })
        };

        while !dispatcher.is_running() {
            tokio::task::yield_now().await;
        }
        dispatcher.shutdown();

        runner.await.unwrap().unwrap();
        assert!(!dispatcher.is_running());
    }

    #[tokio::test]
    async fn test_shutdown_before_run_returns_immediately() {
        let (_scheduler, _handler, dispatcher) = setup(false);
        dispatcher.shutdown();

        dispatcher.run().await.unwrap();
        assert!(!dispatcher.is_running());
    }
}
