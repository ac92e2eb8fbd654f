//! Deferred action scheduler abstraction.

use crate::error::JobResult;
use crate::job::{Job, JobData, JobId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Schedules payloads to become due after a delay and cancels them by token.
///
/// Works on serialized [`JobData`] to stay dyn-compatible; use
/// [`SchedulerExt::schedule`] for typed jobs.
#[async_trait]
pub trait DeferredActionScheduler: Send + Sync {
    /// Stores a job until its `scheduled_at` time passes and returns its token.
    async fn schedule_data(&self, job: JobData) -> JobResult<JobId>;

    /// Cancels a pending job.
    ///
    /// Returns `JobError::NotFound` if the token is unknown, already due and
    /// taken, or already cancelled.
    async fn cancel(&self, job_id: &JobId) -> JobResult<()>;

    /// Removes and returns up to `limit` jobs due at `now`, oldest first.
    ///
    /// A job is handed out at most once.
    async fn take_due(&self, now: DateTime<Utc>, limit: usize) -> JobResult<Vec<JobData>>;

    /// Number of jobs waiting to become due.
    async fn pending(&self) -> JobResult<u64>;

    /// Health check.
    async fn health_check(&self) -> JobResult<()>;
}

/// Typed helpers on top of [`DeferredActionScheduler`].
#[async_trait]
pub trait SchedulerExt: DeferredActionScheduler {
    /// Serializes `job` and schedules it to run after `delay`.
    async fn schedule<J: Job>(&self, job: &J, delay: Duration) -> JobResult<JobId> {
        let data = JobData::from_job(job, delay)?;
        self.schedule_data(data).await
    }
}

impl<T: DeferredActionScheduler + ?Sized> SchedulerExt for T {}
