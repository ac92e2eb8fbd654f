//! Job error types.

use basket_core::BasketError;
use thiserror::Error;

/// Result type for job operations.
pub type JobResult<T> = Result<T, JobError>;

/// Job-related errors.
#[derive(Debug, Error)]
pub enum JobError {
    /// Handler failed while running a job.
    #[error("Job execution failed: {0}")]
    ExecutionFailed(String),

    /// Job timed out.
    #[error("Job timed out after {0} seconds")]
    Timeout(u64),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Redis pool error.
    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    /// Job not found.
    #[error("Job not found: {0}")]
    NotFound(String),

    /// No handler registered for the job name.
    #[error("No handler registered for job type: {0}")]
    UnknownJob(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<BasketError> for JobError {
    fn from(err: BasketError) -> Self {
        JobError::ExecutionFailed(err.to_string())
    }
}

impl From<JobError> for BasketError {
    fn from(err: JobError) -> Self {
        BasketError::SchedulingFailure(err.to_string())
    }
}
