//! # Basket Server Library
//!
//! Wiring and startup utilities for the basket cache service binary.

pub mod app;
pub mod logging;
pub mod redis_pool;
pub mod startup;
