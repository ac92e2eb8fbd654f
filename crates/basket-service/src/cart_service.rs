//! Cart service trait definition.

use crate::coordinator::CartCoordinator;
use crate::dto::{CartResponse, UpdateCartRequest};
use async_trait::async_trait;
use basket_core::BasketResult;

/// Cart service used by the HTTP adapter.
#[async_trait]
pub trait CartService: Send + Sync {
    /// Gets a user's cart, or `None` if the user has none.
    async fn get_cart(&self, username: &str) -> BasketResult<Option<CartResponse>>;

    /// Replaces a user's cart.
    async fn update_cart(&self, request: UpdateCartRequest) -> BasketResult<CartResponse>;

    /// Deletes a user's cart. Returns whether one existed.
    async fn delete_cart(&self, username: &str) -> BasketResult<bool>;

    /// Checks that the cart store is reachable.
    async fn health_check(&self) -> BasketResult<()>;
}

#[async_trait]
impl CartService for CartCoordinator {
    async fn get_cart(&self, username: &str) -> BasketResult<Option<CartResponse>> {
        Ok(self.get(username).await?.map(CartResponse::from))
    }

    async fn update_cart(&self, request: UpdateCartRequest) -> BasketResult<CartResponse> {
        let cart = self.upsert(request.into(), None).await?;
        Ok(CartResponse::from(cart))
    }

    async fn delete_cart(&self, username: &str) -> BasketResult<bool> {
        self.delete(username).await
    }

    async fn health_check(&self) -> BasketResult<()> {
        CartCoordinator::health_check(self).await
    }
}
