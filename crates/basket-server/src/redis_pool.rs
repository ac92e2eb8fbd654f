//! Redis connection pool shared by the cart store and the reminder scheduler.

use basket_config::RedisConfig;
use basket_core::{BasketError, BasketResult};
use deadpool_redis::{Config, Pool, Runtime};
use tracing::info;

/// Builds the pool and checks that Redis answers.
///
/// A malformed URL is a configuration error; an unreachable server is
/// `StoreUnavailable`.
pub async fn connect(config: &RedisConfig) -> BasketResult<Pool> {
    let pool = Config::from_url(&config.url)
        .builder()
        .map_err(|e| BasketError::Configuration(format!("Invalid Redis URL '{}': {e}", config.url)))?
        .max_size(config.pool_size)
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| BasketError::Configuration(format!("Invalid Redis pool settings: {e}")))?;

    ping(&pool).await?;

    info!(pool_size = config.pool_size, "Connected to Redis");
    Ok(pool)
}

async fn ping(pool: &Pool) -> BasketResult<()> {
    let mut conn = pool
        .get()
        .await
        .map_err(|e| BasketError::store_unavailable(format!("Failed to connect to Redis: {e}")))?;

    deadpool_redis::redis::cmd("PING")
        .query_async::<String>(&mut *conn)
        .await
        .map_err(|e| BasketError::store_unavailable(format!("Redis PING failed: {e}")))?;
    Ok(())
}
