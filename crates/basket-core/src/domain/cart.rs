//! Cart aggregate.

use crate::{BasketError, BasketResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product identifier.
    pub product_id: String,
    /// Display name captured when the item was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Number of units, always positive.
    pub quantity: u32,
    /// Unit price, never negative.
    pub price: Decimal,
}

impl CartItem {
    /// Creates a new cart item.
    pub fn new(product_id: impl Into<String>, quantity: u32, price: Decimal) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: None,
            quantity,
            price,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// The full basket of one user, stored as a single value under its username.
///
/// `deferred_action_id` is owned by the cart coordinator: it is only set while
/// a reminder is outstanding for this exact cart state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Owner and store key.
    pub username: String,
    /// Address used for checkout reminders.
    #[serde(default)]
    pub email_address: String,
    /// Ordered cart lines.
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Token of the outstanding deferred reminder, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferred_action_id: Option<String>,
}

impl Cart {
    /// Creates an empty cart for a user.
    pub fn new(username: impl Into<String>, email_address: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email_address: email_address.into(),
            items: Vec::new(),
            deferred_action_id: None,
        }
    }

    /// Appends an item.
    #[must_use]
    pub fn with_item(mut self, item: CartItem) -> Self {
        self.items.push(item);
        self
    }

    /// Sum of price times quantity over all items.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Returns true if the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true while a deferred reminder is outstanding.
    #[must_use]
    pub fn has_deferred_action(&self) -> bool {
        self.deferred_action_id.is_some()
    }

    /// Checks the aggregate invariants.
    pub fn validate(&self) -> BasketResult<()> {
        if self.username.trim().is_empty() {
            return Err(BasketError::validation("username must not be empty"));
        }

        for item in &self.items {
            if item.product_id.trim().is_empty() {
                return Err(BasketError::validation("productId must not be empty"));
            }
            if item.quantity == 0 {
                return Err(BasketError::validation(format!(
                    "quantity for product '{}' must be positive",
                    item.product_id
                )));
            }
            if item.price < Decimal::ZERO {
                return Err(BasketError::validation(format!(
                    "price for product '{}' must not be negative",
                    item.product_id
                )));
            }
        }

        Ok(())
    }
}

/// Options for a cart write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartUpdateOptions {
    /// Expiry of the cache entry. `None` keeps the entry until deleted.
    pub ttl: Option<Duration>,
}

impl CartUpdateOptions {
    /// Options with an entry expiry.
    #[must_use]
    pub const fn with_ttl(ttl: Duration) -> Self {
        Self { ttl: Some(ttl) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cart() -> Cart {
        Cart::new("alice", "alice@example.com")
            .with_item(CartItem::new("p-1", 2, Decimal::new(1000, 2)))
            .with_item(CartItem::new("p-2", 1, Decimal::new(550, 2)))
    }

    #[test]
    fn test_total_price() {
        assert_eq!(sample_cart().total_price(), Decimal::new(2550, 2));
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        let cart = Cart::new("bob", "bob@example.com");
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_validate_accepts_empty_cart() {
        assert!(Cart::new("bob", "").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_username() {
        let err = Cart::new("  ", "x@example.com").validate().unwrap_err();
        assert!(matches!(err, BasketError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let cart = Cart::new("alice", "").with_item(CartItem::new("p-1", 0, Decimal::ONE));
        assert!(cart.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let cart = Cart::new("alice", "").with_item(CartItem::new("p-1", 1, Decimal::new(-1, 0)));
        assert!(cart.validate().is_err());
    }

    #[test]
    fn test_json_shape_is_camel_case() {
        let mut cart = sample_cart();
        cart.deferred_action_id = Some("job-1".to_string());

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["emailAddress"], "alice@example.com");
        assert_eq!(json["deferredActionId"], "job-1");
        assert_eq!(json["items"][0]["productId"], "p-1");
        assert_eq!(json["items"][1]["price"], "5.50");
    }

    #[test]
    fn test_deserialize_accepts_numeric_prices_and_missing_fields() {
        let json = r#"{"username":"dave","items":[{"productId":"p-9","quantity":3,"price":1.25}]}"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.email_address, "");
        assert!(cart.deferred_action_id.is_none());
        assert_eq!(cart.total_price(), Decimal::new(375, 2));
    }
}
