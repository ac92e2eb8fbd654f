//! Checkout reminders: the deferred action attached to a cart.

mod handler;
mod job;
mod notifier;

pub use handler::CheckoutReminderHandler;
pub use job::CheckoutReminder;
pub use notifier::{LogNotifier, ReminderNotifier};
