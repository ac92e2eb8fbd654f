//! # Basket Core
//!
//! Core types, the cart aggregate, and error definitions shared by every
//! layer of the basket cache service.

pub mod domain;
pub mod error;
pub mod result;

pub use domain::*;
pub use error::*;
pub use result::*;
