//! Job trait and definitions.

use crate::error::JobResult;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Unique job identifier, the opaque token handed back by `schedule`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Creates a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the job ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Trait for typed job payloads.
///
/// The payload is serialized into [`JobData`] when scheduled and handed back
/// to the handler registered under [`Job::NAME`] once it is due.
pub trait Job: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Unique name for this job type.
    const NAME: &'static str;

    /// Queue name for this job type.
    const QUEUE: &'static str = "default";

    /// Correlation value recorded with the job, used for log context.
    fn correlation_id(&self) -> Option<String> {
        None
    }
}

/// Serialized job data stored by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobData {
    /// Job ID.
    pub id: JobId,

    /// Job type name.
    pub name: String,

    /// Queue name.
    pub queue: String,

    /// Serialized job payload.
    pub payload: String,

    /// When the job was created.
    pub created_at: DateTime<Utc>,

    /// When the job becomes due.
    pub scheduled_at: DateTime<Utc>,

    /// Correlation ID for tracing.
    pub correlation_id: Option<String>,
}

impl JobData {
    /// Creates job data from raw parts, due `delay` from now.
    pub fn new(name: impl Into<String>, queue: impl Into<String>, payload: String, delay: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            name: name.into(),
            queue: queue.into(),
            payload,
            created_at: now,
            scheduled_at: now + ChronoDuration::from_std(delay).unwrap_or_default(),
            correlation_id: None,
        }
    }

    /// Creates job data from a Job instance.
    pub fn from_job<J: Job>(job: &J, delay: Duration) -> JobResult<Self> {
        let payload = serde_json::to_string(job)?;
        let mut data = Self::new(J::NAME, J::QUEUE, payload, delay);
        data.correlation_id = job.correlation_id();
        Ok(data)
    }

    /// Deserialize the job payload.
    pub fn deserialize<J: Job>(&self) -> JobResult<J> {
        Ok(serde_json::from_str(&self.payload)?)
    }

    /// Returns true once the job's due time has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_at <= now
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> JobResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> JobResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestJob {
        message: String,
    }

    impl Job for TestJob {
        const NAME: &'static str = "test_job";
        const QUEUE: &'static str = "test";

        fn correlation_id(&self) -> Option<String> {
            Some(self.message.clone())
        }
    }

    #[test]
    fn test_job_id_generation() {
        assert_ne!(JobId::new(), JobId::new());
    }

    #[test]
    fn test_job_id_serializes_as_plain_string() {
        let id = JobId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }

    #[test]
    fn test_job_data_from_job() {
        let job = TestJob {
            message: "hello".to_string(),
        };

        let data = JobData::from_job(&job, Duration::from_secs(30)).unwrap();
        assert_eq!(data.name, "test_job");
        assert_eq!(data.queue, "test");
        assert_eq!(data.correlation_id.as_deref(), Some("hello"));
        assert!(!data.is_due(Utc::now()));
        assert!(data.is_due(Utc::now() + ChronoDuration::seconds(31)));

        let restored = JobData::from_json(&data.to_json().unwrap()).unwrap();
        assert_eq!(restored.deserialize::<TestJob>().unwrap(), job);
    }
}
