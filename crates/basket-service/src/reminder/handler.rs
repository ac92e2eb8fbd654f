//! Handler that fires due checkout reminders.

use super::{CheckoutReminder, ReminderNotifier};
use crate::coordinator::CartCoordinator;
use async_trait::async_trait;
use basket_jobs::{Job, JobData, JobHandler, JobResult};
use std::sync::Arc;
use tracing::debug;

/// Sends due reminders and releases the token held by the cart.
pub struct CheckoutReminderHandler {
    coordinator: Arc<CartCoordinator>,
    notifier: Arc<dyn ReminderNotifier>,
}

impl CheckoutReminderHandler {
    /// Creates a new handler.
    pub fn new(coordinator: Arc<CartCoordinator>, notifier: Arc<dyn ReminderNotifier>) -> Self {
        Self {
            coordinator,
            notifier,
        }
    }
}

#[async_trait]
impl JobHandler for CheckoutReminderHandler {
    fn job_name(&self) -> &'static str {
        CheckoutReminder::NAME
    }

    async fn handle(&self, job: JobData) -> JobResult<()> {
        let reminder: CheckoutReminder = job.deserialize()?;

        self.notifier.notify(&reminder).await?;

        let cleared = self
            .coordinator
            .release_deferred_action(&reminder.username, job.id.as_str())
            .await?;

        debug!(
            username = %reminder.username,
            job_id = %job.id,
            cleared,
            "Checkout reminder fired"
        );
        Ok(())
    }
}
