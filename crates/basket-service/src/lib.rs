//! # Basket Service
//!
//! Cart coordination for the basket cache service: reads and writes cart
//! aggregates in a key-value cache and keeps the attached checkout reminder
//! in step with cart state.

pub mod cache;
pub mod cart_service;
pub mod coordinator;
pub mod dto;
mod keyed_lock;
pub mod policy;
pub mod reminder;

pub use cache::*;
pub use cart_service::*;
pub use coordinator::{CartCoordinator, ReminderSettings};
pub use dto::*;
pub use policy::{DisabledPolicy, FirstWritePolicy, NonEmptyCartPolicy, ReminderPolicy};
pub use reminder::*;
