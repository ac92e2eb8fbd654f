//! Server startup utilities.

use basket_config::AppConfig;
use tracing::info;

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let addr = config.server.addr();
    info!("{}", separator);
    info!("Cart API:  http://{}/cart", addr);
    info!("Health:    http://{}/health", addr);
    info!(
        "Backend:   {}",
        if config.redis.enabled { "redis" } else { "in-memory" }
    );
    info!(
        "Reminders: policy={} delay={}s",
        config.reminder.effective_policy(),
        config.reminder.delay_secs
    );
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_startup_info(&AppConfig::default());
    }
}
