//! Cache interface trait for abstracted key-value operations.

use basket_core::BasketResult;
use async_trait::async_trait;
use std::time::Duration;

/// Key-value store holding serialized values.
///
/// Uses JSON strings for type-erased storage to maintain dyn-compatibility.
/// Backend failures surface as `BasketError::StoreUnavailable`.
#[async_trait]
pub trait CacheInterface: Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> BasketResult<Option<String>>;

    /// Set a raw JSON value, replacing any previous value in full.
    ///
    /// A `ttl` of `None` keeps the entry until it is deleted.
    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> BasketResult<()>;

    /// Replace the value at `key` only if it still equals `expected`.
    ///
    /// The entry keeps its remaining expiry. Returns `false` without writing
    /// if the key is missing or holds anything else.
    async fn compare_and_swap_raw(&self, key: &str, expected: &str, value: &str) -> BasketResult<bool>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> BasketResult<bool>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> BasketResult<()>;
}

/// Extension trait with typed methods for convenience.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> BasketResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> BasketResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

// Blanket implementation for all CacheInterface implementations
impl<T: CacheInterface + ?Sized> CacheExt for T {}
