//! Redis scheduler implementation.

use super::RedisKeys;
use crate::error::{JobError, JobResult};
use crate::job::{JobData, JobId};
use crate::metrics;
use crate::scheduler::DeferredActionScheduler;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::Pool;
use redis::AsyncCommands;
use tracing::{debug, error, info};

/// Redis-backed deferred action scheduler.
///
/// Job data lives under `{prefix}:job:{id}`; due times live in the
/// `{prefix}:delayed` sorted set. Both are written and removed together in
/// MULTI/EXEC pipelines.
pub struct RedisJobScheduler {
    pool: Pool,
    keys: RedisKeys,
}

impl RedisJobScheduler {
    /// Create a new Redis scheduler.
    pub fn new(pool: Pool, key_prefix: impl Into<String>) -> Self {
        Self {
            pool,
            keys: RedisKeys::new(key_prefix),
        }
    }

    /// Get a connection from the pool.
    async fn conn(&self) -> JobResult<deadpool_redis::Connection> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl DeferredActionScheduler for RedisJobScheduler {
    async fn schedule_data(&self, job: JobData) -> JobResult<JobId> {
        let job_id = job.id.clone();
        let job_json = job.to_json()?;
        let score = job.scheduled_at.timestamp_millis();

        let mut conn = self.conn().await?;

        let _: () = redis::pipe()
            .atomic()
            .set(self.keys.job(job_id.as_str()), &job_json)
            .ignore()
            .zadd(self.keys.delayed(), job_id.as_str(), score)
            .ignore()
            .query_async(&mut *conn)
            .await?;

        metrics::record_scheduled(&job.queue);
        debug!(
            job_id = %job_id,
            queue = %job.queue,
            scheduled_at = %job.scheduled_at,
            "Scheduled delayed job"
        );

        Ok(job_id)
    }

    async fn cancel(&self, job_id: &JobId) -> JobResult<()> {
        let mut conn = self.conn().await?;

        let (removed, _deleted): (i64, i64) = redis::pipe()
            .atomic()
            .zrem(self.keys.delayed(), job_id.as_str())
            .del(self.keys.job(job_id.as_str()))
            .query_async(&mut *conn)
            .await?;

        if removed == 0 {
            return Err(JobError::NotFound(job_id.to_string()));
        }

        metrics::record_cancelled();
        info!(job_id = %job_id, "Cancelled job");

        Ok(())
    }

    async fn take_due(&self, now: DateTime<Utc>, limit: usize) -> JobResult<Vec<JobData>> {
        let mut conn = self.conn().await?;
        let delayed_key = self.keys.delayed();

        let ids: Vec<String> = conn
            .zrangebyscore_limit(&delayed_key, 0i64, now.timestamp_millis(), 0, isize::try_from(limit).unwrap_or(isize::MAX))
            .await?;

        let mut taken = Vec::with_capacity(ids.len());

        for id in ids {
            // ZREM decides which dispatcher owns the job.
            let claimed: i64 = conn.zrem(&delayed_key, &id).await?;
            if claimed == 0 {
                continue;
            }

            let job_key = self.keys.job(&id);
            let (job_json, _): (Option<String>, i64) = redis::pipe()
                .atomic()
                .get(&job_key)
                .del(&job_key)
                .query_async(&mut *conn)
                .await?;

            match job_json.as_deref().map(JobData::from_json) {
                Some(Ok(job)) => taken.push(job),
                Some(Err(e)) => error!(job_id = %id, error = %e, "Failed to deserialize job data"),
                None => error!(job_id = %id, "Job data missing for due job"),
            }
        }

        if !taken.is_empty() {
            debug!(count = taken.len(), "Took due jobs");
        }

        Ok(taken)
    }

    async fn pending(&self) -> JobResult<u64> {
        let mut conn = self.conn().await?;
        let count: u64 = conn.zcard(self.keys.delayed()).await?;
        Ok(count)
    }

    async fn health_check(&self) -> JobResult<()> {
        let mut conn = self.conn().await?;
        let _: String = redis::cmd("PING").query_async(&mut *conn).await?;
        Ok(())
    }
}
