//! Domain model for the basket service.

pub mod cart;

pub use cart::{Cart, CartItem, CartUpdateOptions};
