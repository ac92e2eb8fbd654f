//! Redis-backed scheduler implementation.

mod scheduler;

pub use scheduler::RedisJobScheduler;

/// Redis key builder for deferred actions.
#[derive(Debug, Clone)]
pub struct RedisKeys {
    prefix: String,
}

impl RedisKeys {
    /// Create a new key builder with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Delayed jobs key (sorted set of job ids scored by due time in ms).
    pub fn delayed(&self) -> String {
        format!("{}:delayed", self.prefix)
    }

    /// Job data key (string: serialized job data).
    pub fn job(&self, job_id: &str) -> String {
        format!("{}:job:{}", self.prefix, job_id)
    }
}

impl Default for RedisKeys {
    fn default() -> Self {
        Self::new("basket:jobs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_keys() {
        let keys = RedisKeys::new("test");

        assert_eq!(keys.delayed(), "test:delayed");
        assert_eq!(keys.job("123"), "test:job:123");
    }

    #[test]
    fn test_default_prefix() {
        assert_eq!(RedisKeys::default().delayed(), "basket:jobs:delayed");
    }
}
