//! Key-value cache infrastructure for cart storage.
//!
//! Carts are stored as JSON strings under one key per username. The Redis
//! backend is used in deployments; the in-memory backend serves local runs
//! with Redis disabled and tests.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use memory_cache::MemoryCacheService;
pub use redis_cache::RedisCacheService;
