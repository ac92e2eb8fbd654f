//! Redis-based cache implementation.

use super::CacheInterface;
use basket_core::{BasketError, BasketResult};
use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::{AsyncCommands, Script};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

/// Overwrites `KEYS[1]` with `ARGV[2]` if it currently holds `ARGV[1]`,
/// keeping its TTL. Needs Redis 6.0 for `KEEPTTL`.
const COMPARE_AND_SWAP_LUA: &str = r"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    redis.call('SET', KEYS[1], ARGV[2], 'KEEPTTL')
    return 1
end
return 0
";

static COMPARE_AND_SWAP: LazyLock<Script> = LazyLock::new(|| Script::new(COMPARE_AND_SWAP_LUA));

/// Whole seconds for `SET EX`, never below one second.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Redis-based cache service.
///
/// Every command goes through the shared connection pool; the pool and the
/// Redis client apply their own timeouts.
pub struct RedisCacheService {
    /// Redis connection pool.
    pool: Pool,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> BasketResult<deadpool_redis::Connection> {
        self.pool.get().await.map_err(|e| {
            BasketError::store_unavailable(format!("Failed to get Redis connection: {e}"))
        })
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    async fn get_raw(&self, key: &str) -> BasketResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            BasketError::store_unavailable(format!("Failed to get key '{key}': {e}"))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> BasketResult<()> {
        let mut conn = self.get_conn().await?;

        let result = match ttl {
            Some(ttl) => conn.set_ex::<_, _, ()>(key, value, ttl_secs(ttl)).await,
            None => conn.set::<_, _, ()>(key, value).await,
        };

        result.map_err(|e| {
            BasketError::store_unavailable(format!("Failed to set key '{key}': {e}"))
        })?;

        debug!(key, ttl_secs = ttl.map(|t| t.as_secs()), "Stored key");
        Ok(())
    }

    async fn compare_and_swap_raw(&self, key: &str, expected: &str, value: &str) -> BasketResult<bool> {
        let mut conn = self.get_conn().await?;
        let swapped: i64 = COMPARE_AND_SWAP
            .key(key)
            .arg(expected)
            .arg(value)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                BasketError::store_unavailable(format!("Failed to swap key '{key}': {e}"))
            })?;

        debug!(key, swapped = swapped == 1, "Compare-and-swap");
        Ok(swapped == 1)
    }

    async fn delete(&self, key: &str) -> BasketResult<bool> {
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| {
            BasketError::store_unavailable(format!("Failed to delete key '{key}': {e}"))
        })?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn health_check(&self) -> BasketResult<()> {
        let mut conn = self.get_conn().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| BasketError::store_unavailable(format!("Redis PING failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_rounds_sub_second_up() {
        assert_eq!(ttl_secs(Duration::ZERO), 1);
        assert_eq!(ttl_secs(Duration::from_millis(300)), 1);
        assert_eq!(ttl_secs(Duration::from_secs(90)), 90);
    }
}
