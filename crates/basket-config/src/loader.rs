//! Configuration loader with layered sources.

use crate::AppConfig;
use basket_core::BasketError;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable prefix for overrides (`BASKET_REDIS__URL`, ...).
pub const ENV_PREFIX: &str = "BASKET";

/// Configuration loader with layered sources.
///
/// Configuration is read once at startup; changes take effect on restart.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `BASKET_` prefix
    ///
    /// The environment name comes from `BASKET_ENVIRONMENT` (default `development`).
    pub fn new(config_dir: impl Into<String>) -> Result<Self, BasketError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var(format!("{ENV_PREFIX}_ENVIRONMENT"))
            .unwrap_or_else(|_| "development".to_string());

        Self::with_environment(config_dir, environment)
    }

    /// Creates a loader for an explicit environment name.
    pub fn with_environment(
        config_dir: impl Into<String>,
        environment: impl Into<String>,
    ) -> Result<Self, BasketError> {
        let config = Self::load_config(&config_dir.into(), &environment.into())?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, BasketError> {
        Self::new("./config")
    }

    /// Consumes the loader and returns the configuration.
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str, environment: &str) -> Result<AppConfig, BasketError> {
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment, "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_basket_error)?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_basket_error)?;
        app_config.app.environment = environment.to_string();

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Validates the configuration.
    fn validate_config(config: &AppConfig) -> Result<(), BasketError> {
        if config.redis.enabled {
            if config.redis.url.trim().is_empty() {
                return Err(BasketError::Configuration(
                    "Redis URL is required when redis is enabled".to_string(),
                ));
            }
            if config.redis.pool_size == 0 {
                return Err(BasketError::Configuration(
                    "Redis pool size must be positive".to_string(),
                ));
            }
        } else if config.app.environment == "production" {
            warn!("Redis is disabled in production; carts will not survive a restart");
        }

        if config.reminder.batch_size == 0 {
            return Err(BasketError::Configuration(
                "Reminder batch size must be positive".to_string(),
            ));
        }

        if config.reminder.poll_interval_ms == 0 {
            return Err(BasketError::Configuration(
                "Reminder poll interval must be positive".to_string(),
            ));
        }

        if config.cart.ttl_secs == Some(0) {
            return Err(BasketError::Configuration(
                "Cart TTL must be positive when set".to_string(),
            ));
        }

        Ok(())
    }
}

fn config_error_to_basket_error(err: ConfigError) -> BasketError {
    BasketError::Configuration(err.to_string())
}
