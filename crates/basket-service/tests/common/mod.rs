//! Redis container shared by the backend integration tests.

use deadpool_redis::{Config, Connection, Pool, Runtime};
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::redis::Redis;

/// Redis server in a throwaway container plus a pool connected to it.
///
/// Uses a 7.x image because compare-and-swap relies on `SET ... KEEPTTL`.
pub struct TestRedis {
    _container: ContainerAsync<Redis>,
    pool: Pool,
}

impl TestRedis {
    pub async fn new() -> Self {
        let container = Redis::default()
            .with_tag("7.2")
            .start()
            .await
            .expect("Failed to start Redis container");

        let port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Failed to get Redis port");

        let pool = Config::from_url(format!("redis://127.0.0.1:{port}"))
            .create_pool(Some(Runtime::Tokio1))
            .expect("Failed to create Redis pool");

        Self {
            _container: container,
            pool,
        }
    }

    pub fn pool(&self) -> Pool {
        self.pool.clone()
    }

    pub async fn conn(&self) -> Connection {
        self.pool.get().await.expect("Failed to get Redis connection")
    }

    /// Remaining TTL of `key` in seconds, `-1` without expiry, `-2` if missing.
    pub async fn ttl(&self, key: &str) -> i64 {
        redis::cmd("TTL")
            .arg(key)
            .query_async(&mut *self.conn().await)
            .await
            .expect("TTL failed")
    }
}
