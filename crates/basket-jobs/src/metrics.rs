//! Metrics for deferred action monitoring.

use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Metric names for the deferred action system.
pub mod names {
    /// Total deferred actions scheduled.
    pub const ACTIONS_SCHEDULED_TOTAL: &str = "basket_deferred_actions_scheduled_total";
    /// Total deferred actions cancelled before they became due.
    pub const ACTIONS_CANCELLED_TOTAL: &str = "basket_deferred_actions_cancelled_total";
    /// Total deferred actions handed to a handler.
    pub const ACTIONS_DISPATCHED_TOTAL: &str = "basket_deferred_actions_dispatched_total";
    /// Total deferred actions whose handler failed.
    pub const ACTIONS_FAILED_TOTAL: &str = "basket_deferred_actions_failed_total";
    /// Deferred actions waiting to become due.
    pub const ACTIONS_PENDING: &str = "basket_deferred_actions_pending";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::ACTIONS_SCHEDULED_TOTAL,
        "Total number of deferred actions scheduled"
    );
    describe_counter!(
        names::ACTIONS_CANCELLED_TOTAL,
        "Total number of deferred actions cancelled"
    );
    describe_counter!(
        names::ACTIONS_DISPATCHED_TOTAL,
        "Total number of deferred actions dispatched to handlers"
    );
    describe_counter!(
        names::ACTIONS_FAILED_TOTAL,
        "Total number of deferred actions whose handler failed"
    );
    describe_gauge!(
        names::ACTIONS_PENDING,
        "Current number of deferred actions waiting to become due"
    );
}

pub(crate) fn record_scheduled(queue: &str) {
    counter!(names::ACTIONS_SCHEDULED_TOTAL, "queue" => queue.to_string()).increment(1);
}

pub(crate) fn record_cancelled() {
    counter!(names::ACTIONS_CANCELLED_TOTAL).increment(1);
}

pub(crate) fn record_dispatched(job_name: &str) {
    counter!(names::ACTIONS_DISPATCHED_TOTAL, "job" => job_name.to_string()).increment(1);
}

pub(crate) fn record_failed(job_name: &str) {
    counter!(names::ACTIONS_FAILED_TOTAL, "job" => job_name.to_string()).increment(1);
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn set_pending(count: u64) {
    gauge!(names::ACTIONS_PENDING).set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        register_metrics();
        record_scheduled("reminders");
        record_cancelled();
        record_dispatched("checkout_reminder");
        record_failed("checkout_reminder");
        set_pending(3);
    }
}
