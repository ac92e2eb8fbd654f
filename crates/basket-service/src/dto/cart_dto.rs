//! Cart DTOs.

use basket_core::{Cart, CartItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request body for replacing a cart.
///
/// A `deferredActionId` sent by the caller is accepted for shape
/// compatibility and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub username: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default, skip_serializing)]
    pub deferred_action_id: Option<String>,
}

impl From<UpdateCartRequest> for Cart {
    fn from(request: UpdateCartRequest) -> Self {
        Self {
            username: request.username,
            email_address: request.email_address,
            items: request.items,
            deferred_action_id: None,
        }
    }
}

/// Cart response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub username: String,
    pub email_address: String,
    pub items: Vec<CartItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deferred_action_id: Option<String>,
    pub total_price: Decimal,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let total_price = cart.total_price();
        Self {
            username: cart.username,
            email_address: cart.email_address,
            items: cart.items,
            deferred_action_id: cart.deferred_action_id,
            total_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_drops_caller_token() {
        let request: UpdateCartRequest = serde_json::from_value(json!({
            "username": "alice",
            "emailAddress": "alice@example.com",
            "items": [{ "productId": "p-1", "quantity": 1, "price": 2.5 }],
            "deferredActionId": "forged"
        }))
        .unwrap();

        let cart = Cart::from(request);
        assert!(cart.deferred_action_id.is_none());
        assert_eq!(cart.items.len(), 1);
    }

    #[test]
    fn test_response_carries_total_price() {
        let cart = Cart::new("alice", "alice@example.com")
            .with_item(CartItem::new("p-1", 2, Decimal::new(1000, 2)))
            .with_item(CartItem::new("p-2", 1, Decimal::new(550, 2)));

        let value = serde_json::to_value(CartResponse::from(cart)).unwrap();
        assert_eq!(value["totalPrice"], "25.50");
        assert_eq!(value["emailAddress"], "alice@example.com");
        assert!(value.get("deferredActionId").is_none());
    }
}
