//! In-process scheduler backend.
//!
//! Used when Redis is disabled for local development, and by tests. Jobs do
//! not survive a restart.

use crate::error::{JobError, JobResult};
use crate::job::{JobData, JobId};
use crate::metrics;
use crate::scheduler::DeferredActionScheduler;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

/// Scheduler that keeps pending jobs in a map guarded by a mutex.
#[derive(Debug, Default)]
pub struct MemoryJobScheduler {
    jobs: Mutex<HashMap<JobId, JobData>>,
}

impl MemoryJobScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a pending job by ID.
    pub fn get(&self, job_id: &JobId) -> Option<JobData> {
        self.jobs.lock().get(job_id).cloned()
    }
}

#[async_trait]
impl DeferredActionScheduler for MemoryJobScheduler {
    async fn schedule_data(&self, job: JobData) -> JobResult<JobId> {
        let job_id = job.id.clone();
        debug!(job_id = %job_id, queue = %job.queue, scheduled_at = %job.scheduled_at, "Scheduled job");
        metrics::record_scheduled(&job.queue);
        self.jobs.lock().insert(job_id.clone(), job);
        Ok(job_id)
    }

    async fn cancel(&self, job_id: &JobId) -> JobResult<()> {
        match self.jobs.lock().remove(job_id) {
            Some(_) => {
                metrics::record_cancelled();
                debug!(job_id = %job_id, "Cancelled job");
                Ok(())
            }
            None => Err(JobError::NotFound(job_id.to_string())),
        }
    }

    async fn take_due(&self, now: DateTime<Utc>, limit: usize) -> JobResult<Vec<JobData>> {
        let mut jobs = self.jobs.lock();

        let mut due: Vec<(DateTime<Utc>, JobId)> = jobs
            .values()
            .filter(|job| job.is_due(now))
            .map(|job| (job.scheduled_at, job.id.clone()))
            .collect();
        due.sort_by_key(|(at, _)| *at);
        due.truncate(limit);

        Ok(due
            .into_iter()
            .filter_map(|(_, id)| jobs.remove(&id))
            .collect())
    }

    async fn pending(&self) -> JobResult<u64> {
        Ok(self.jobs.lock().len() as u64)
    }

    async fn health_check(&self) -> JobResult<()> {
        Ok(())
    }
}
