//! Reminder eligibility policies.
//!
//! A policy decides, for each cart write, whether a checkout reminder should
//! be scheduled for the new cart state. Any
//! `Fn(Option<&Cart>, &Cart) -> bool` closure is a policy.

use basket_config::ReminderPolicyKind;
use basket_core::Cart;
use std::sync::Arc;

/// Decides whether a cart write schedules a reminder.
pub trait ReminderPolicy: Send + Sync {
    /// `previous` is the stored cart before the write, `next` the cart being
    /// written. `next` never carries a deferred action token.
    fn should_schedule(&self, previous: Option<&Cart>, next: &Cart) -> bool;
}

impl<F> ReminderPolicy for F
where
    F: Fn(Option<&Cart>, &Cart) -> bool + Send + Sync,
{
    fn should_schedule(&self, previous: Option<&Cart>, next: &Cart) -> bool {
        self(previous, next)
    }
}

/// Schedules on every write of a cart that has items.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyCartPolicy;

impl ReminderPolicy for NonEmptyCartPolicy {
    fn should_schedule(&self, _previous: Option<&Cart>, next: &Cart) -> bool {
        !next.is_empty() && !next.has_deferred_action()
    }
}

/// Schedules only when the write creates the cart, and the cart has items.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstWritePolicy;

impl ReminderPolicy for FirstWritePolicy {
    fn should_schedule(&self, previous: Option<&Cart>, next: &Cart) -> bool {
        previous.is_none() && !next.is_empty()
    }
}

/// Never schedules.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPolicy;

impl ReminderPolicy for DisabledPolicy {
    fn should_schedule(&self, _previous: Option<&Cart>, _next: &Cart) -> bool {
        false
    }
}

/// Builds the built-in policy named in configuration.
#[must_use]
pub fn from_kind(kind: ReminderPolicyKind) -> Arc<dyn ReminderPolicy> {
    match kind {
        ReminderPolicyKind::NonEmptyCart => Arc::new(NonEmptyCartPolicy),
        ReminderPolicyKind::FirstWrite => Arc::new(FirstWritePolicy),
        ReminderPolicyKind::Disabled => Arc::new(DisabledPolicy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::CartItem;
    use rust_decimal::Decimal;

    fn filled() -> Cart {
        Cart::new("alice", "alice@example.com").with_item(CartItem::new("p-1", 1, Decimal::ONE))
    }

    #[test]
    fn test_non_empty_cart_policy() {
        let empty = Cart::new("alice", "alice@example.com");
        assert!(NonEmptyCartPolicy.should_schedule(None, &filled()));
        assert!(NonEmptyCartPolicy.should_schedule(Some(&filled()), &filled()));
        assert!(!NonEmptyCartPolicy.should_schedule(None, &empty));
    }

    #[test]
    fn test_first_write_policy() {
        assert!(FirstWritePolicy.should_schedule(None, &filled()));
        assert!(!FirstWritePolicy.should_schedule(Some(&filled()), &filled()));
    }

    #[test]
    fn test_disabled_policy() {
        assert!(!DisabledPolicy.should_schedule(None, &filled()));
    }

    #[test]
    fn test_closure_policy() {
        let policy = |_: Option<&Cart>, next: &Cart| next.items.len() > 1;
        assert!(!policy.should_schedule(None, &filled()));
    }

    #[test]
    fn test_from_kind() {
        let policy = from_kind(ReminderPolicyKind::Disabled);
        assert!(!policy.should_schedule(None, &filled()));

        let policy = from_kind(ReminderPolicyKind::NonEmptyCart);
        assert!(policy.should_schedule(None, &filled()));
    }
}
