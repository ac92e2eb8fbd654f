//! Checkout reminder job payload.

use basket_core::Cart;
use basket_jobs::Job;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Reminder sent to a user who left items in their cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReminder {
    /// Cart owner.
    pub username: String,
    /// Recipient address.
    pub email_address: String,
    /// Subject line.
    pub subject: String,
    /// Rendered message body.
    pub body: String,
    /// Cart total when the reminder was scheduled.
    pub total_price: Decimal,
}

impl Job for CheckoutReminder {
    const NAME: &'static str = "checkout_reminder";
    const QUEUE: &'static str = "reminders";

    fn correlation_id(&self) -> Option<String> {
        Some(self.username.clone())
    }
}

impl CheckoutReminder {
    /// Builds the reminder for the given cart state.
    #[must_use]
    pub fn for_cart(cart: &Cart, subject: &str, checkout_url: &str) -> Self {
        Self {
            username: cart.username.clone(),
            email_address: cart.email_address.clone(),
            subject: subject.to_string(),
            body: render_body(cart, checkout_url),
            total_price: cart.total_price(),
        }
    }
}

fn render_body(cart: &Cart, checkout_url: &str) -> String {
    let mut body = format!("Hello {},\n\n", cart.username);
    body.push_str("You still have items waiting in your cart:\n\n");

    for item in &cart.items {
        let name = item.product_name.as_deref().unwrap_or(&item.product_id);
        let _ = writeln!(body, "  - {} x {} @ {}", item.quantity, name, item.price);
    }

    let _ = write!(
        body,
        "\nTotal: {}\n\nComplete your order: {}?username={}\n",
        cart.total_price(),
        checkout_url.trim_end_matches('/'),
        cart.username
    );

    body
}
