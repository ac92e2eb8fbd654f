//! Application state for Axum handlers.

use basket_service::CartService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub cart_service: Arc<dyn CartService>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(cart_service: Arc<dyn CartService>) -> Self {
        Self { cart_service }
    }
}
