//! REST API controllers.

pub mod cart_controller;
pub mod health_controller;

pub use health_controller::*;
