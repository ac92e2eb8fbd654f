//! Cart controller.

use crate::{
    extractors::JsonBody,
    responses::{ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Router,
};
use basket_core::BasketError;
use basket_service::{CartResponse, UpdateCartRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Body returned by a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCartResponse {
    pub username: String,
    pub deleted: bool,
}

/// Creates the cart router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", put(update_cart))
        .route("/:username", get(get_cart).delete(delete_cart))
}

/// Get a user's cart.
async fn get_cart(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<CartResponse> {
    debug!("Get cart request: {}", username);

    let cart = state
        .cart_service
        .get_cart(&username)
        .await?
        .ok_or_else(|| AppError(BasketError::not_found("Cart", &username)))?;

    ok(cart)
}

/// Replace a user's cart.
async fn update_cart(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateCartRequest>,
) -> ApiResult<CartResponse> {
    debug!("Update cart request: {}", request.username);

    let cart = state.cart_service.update_cart(request).await?;
    ok(cart)
}

/// Delete a user's cart.
async fn delete_cart(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<ApiResponse<DeleteCartResponse>> {
    debug!("Delete cart request: {}", username);

    if !state.cart_service.delete_cart(&username).await? {
        return Err(AppError(BasketError::not_found("Cart", &username)));
    }

    ok(ApiResponse::success(DeleteCartResponse {
        username,
        deleted: true,
    }))
}
