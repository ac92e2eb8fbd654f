//! Application configuration structures.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Redis configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Cart storage configuration.
    #[serde(default)]
    pub cart: CartConfig,

    /// Checkout reminder configuration.
    #[serde(default)]
    pub reminder: ReminderConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "basket-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// REST server host.
    pub host: String,
    /// REST server port.
    pub port: u16,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Enable CORS.
    pub cors_enabled: bool,
    /// CORS allowed origins.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    /// Returns the REST server address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis URL.
    pub url: String,
    /// Connection pool size.
    pub pool_size: usize,
    /// Enable Redis. When disabled, carts and reminders live in process memory.
    pub enabled: bool,
    /// Key prefix for deferred-action keys.
    pub jobs_key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            pool_size: 10,
            enabled: true,
            jobs_key_prefix: "basket:jobs".to_string(),
        }
    }
}

/// Cart storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Prefix prepended to usernames to form cache keys.
    pub key_prefix: String,
    /// Expiry of cart entries in seconds. `None` keeps carts until deleted.
    pub ttl_secs: Option<u64>,
    /// Run mutations for the same username one at a time.
    pub serialize_per_user: bool,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            key_prefix: "basket:cart".to_string(),
            ttl_secs: None,
            serialize_per_user: false,
        }
    }
}

impl CartConfig {
    /// Returns the cart entry expiry, if configured.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

/// Which cart writes schedule a checkout reminder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderPolicyKind {
    /// Every write of a cart with at least one item.
    #[default]
    NonEmptyCart,
    /// Only the write that creates the cart, if it has items.
    FirstWrite,
    /// Never.
    Disabled,
}

impl fmt::Display for ReminderPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonEmptyCart => write!(f, "non_empty_cart"),
            Self::FirstWrite => write!(f, "first_write"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Checkout reminder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Enable checkout reminders.
    pub enabled: bool,
    /// Delay between the cart write and the reminder, in seconds.
    pub delay_secs: u64,
    /// Eligibility policy.
    pub policy: ReminderPolicyKind,
    /// Reminder subject line.
    pub subject: String,
    /// Base URL of the storefront checkout page.
    pub checkout_url: String,
    /// How often the dispatcher looks for due reminders, in milliseconds.
    pub poll_interval_ms: u64,
    /// Maximum reminders taken per dispatcher tick.
    pub batch_size: usize,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_secs: 30,
            policy: ReminderPolicyKind::NonEmptyCart,
            subject: "Reminder checkout".to_string(),
            checkout_url: "http://localhost:3000/checkout".to_string(),
            poll_interval_ms: 1000,
            batch_size: 50,
        }
    }
}

impl ReminderConfig {
    /// Returns the reminder delay as a Duration.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    /// Returns the dispatcher poll interval as a Duration.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Returns the policy in effect, taking the `enabled` switch into account.
    #[must_use]
    pub fn effective_policy(&self) -> ReminderPolicyKind {
        if self.enabled {
            self.policy
        } else {
            ReminderPolicyKind::Disabled
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Returns true when logs should be emitted as JSON lines.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}
