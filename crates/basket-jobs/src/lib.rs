//! Basket Jobs - Deferred Action Scheduling
//!
//! Schedules side effects that should run a fixed delay after a cart write
//! (checkout reminders) and lets the cart coordinator cancel them by token.
//!
//! - Typed job definitions with serde serialization
//! - A dyn-compatible [`DeferredActionScheduler`] with Redis and in-memory backends
//! - A [`JobDispatcher`] that takes due jobs and routes them to handlers by name
//!
//! # Architecture
//!
//! ```text
//!  CartCoordinator ──schedule(payload, delay)──▶ DeferredActionScheduler
//!        │                                        │  {prefix}:job:{id}
//!        └────────cancel(token)─────────────────▶ │  {prefix}:delayed (zset)
//!                                                 │
//!                                    take_due ◀───┘
//!                                       │
//!                                 JobDispatcher ──▶ JobHandler (by job name)
//! ```

pub mod dispatcher;
pub mod error;
pub mod job;
pub mod memory;
pub mod metrics;
pub mod redis;
pub mod scheduler;

pub use dispatcher::{DispatcherConfig, DispatcherStats, JobDispatcher, JobHandler};
pub use error::{JobError, JobResult};
pub use job::{Job, JobData, JobId};
pub use memory::MemoryJobScheduler;
pub use crate::metrics::register_metrics;
pub use crate::redis::RedisJobScheduler;
pub use scheduler::{DeferredActionScheduler, SchedulerExt};
