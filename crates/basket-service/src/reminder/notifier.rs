//! Reminder delivery.

use super::CheckoutReminder;
use async_trait::async_trait;
use basket_core::BasketResult;
use tracing::info;

/// Delivers a due checkout reminder to its recipient.
#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    /// Sends the reminder.
    async fn notify(&self, reminder: &CheckoutReminder) -> BasketResult<()>;
}

/// Notifier that writes reminders to the log instead of sending mail.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl ReminderNotifier for LogNotifier {
    async fn notify(&self, reminder: &CheckoutReminder) -> BasketResult<()> {
        info!(
            username = %reminder.username,
            email = %reminder.email_address,
            subject = %reminder.subject,
            total_price = %reminder.total_price,
            "Checkout reminder due"
        );
        Ok(())
    }
}
