//! Cart cache coordinator.
//!
//! Reads and writes cart aggregates in the key-value cache and owns the
//! lifecycle of the checkout reminder attached to each cart. Every mutation
//! cancels the outstanding reminder before new state is written, so a cart
//! has at most one reminder pending at any time.
//!
//! Store failures fail the operation with `StoreUnavailable`. Scheduler
//! failures are logged and swallowed.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::keyed_lock::KeyedLock;
use crate::policy::{self, ReminderPolicy};
use crate::reminder::CheckoutReminder;
use basket_config::{AppConfig, ReminderConfig};
use basket_core::{BasketError, BasketResult, Cart, CartUpdateOptions};
use basket_jobs::{DeferredActionScheduler, JobError, JobId, SchedulerExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, error, info, warn};

/// Settings used to build checkout reminders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSettings {
    /// Delay between the cart write and the reminder.
    pub delay: Duration,
    /// Subject line.
    pub subject: String,
    /// Base URL of the checkout page.
    pub checkout_url: String,
}

impl ReminderSettings {
    /// Builds settings from the reminder configuration.
    #[must_use]
    pub fn from_config(config: &ReminderConfig) -> Self {
        Self {
            delay: config.delay(),
            subject: config.subject.clone(),
            checkout_url: config.checkout_url.clone(),
        }
    }
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self::from_config(&ReminderConfig::default())
    }
}

/// Coordinates cart state in the cache with its deferred reminder.
pub struct CartCoordinator {
    store: Arc<dyn CacheInterface>,
    scheduler: Arc<dyn DeferredActionScheduler>,
    policy: Arc<dyn ReminderPolicy>,
    reminder: ReminderSettings,
    key_prefix: String,
    default_options: CartUpdateOptions,
    locks: Option<KeyedLock>,
}

impl CartCoordinator {
    /// Creates a coordinator with the default key prefix, no entry expiry,
    /// and no per-user serialization.
    pub fn new(
        store: Arc<dyn CacheInterface>,
        scheduler: Arc<dyn DeferredActionScheduler>,
        policy: Arc<dyn ReminderPolicy>,
        reminder: ReminderSettings,
    ) -> Self {
        Self {
            store,
            scheduler,
            policy,
            reminder,
            key_prefix: cache_keys::DEFAULT_CART_PREFIX.to_string(),
            default_options: CartUpdateOptions::default(),
            locks: None,
        }
    }

    /// Creates a coordinator from application configuration.
    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn CacheInterface>,
        scheduler: Arc<dyn DeferredActionScheduler>,
    ) -> Self {
        let coordinator = Self::new(
            store,
            scheduler,
            policy::from_kind(config.reminder.effective_policy()),
            ReminderSettings::from_config(&config.reminder),
        )
        .with_key_prefix(config.cart.key_prefix.clone())
        .with_default_options(CartUpdateOptions {
            ttl: config.cart.ttl(),
        });

        if config.cart.serialize_per_user {
            coordinator.with_per_user_serialization()
        } else {
            coordinator
        }
    }

    /// Sets the prefix prepended to usernames to form cache keys.
    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Sets the options used when a write passes none.
    #[must_use]
    pub fn with_default_options(mut self, options: CartUpdateOptions) -> Self {
        self.default_options = options;
        self
    }

    /// Runs mutations for the same username one at a time.
    #[must_use]
    pub fn with_per_user_serialization(mut self) -> Self {
        self.locks = Some(KeyedLock::new());
        self
    }

    /// Fetches the cart stored for `username`.
    pub async fn get(&self, username: &str) -> BasketResult<Option<Cart>> {
        debug!(username, "BEGIN get cart");
        let cart = self.load(username).await?;
        debug!(username, found = cart.is_some(), "END get cart");
        Ok(cart)
    }

    /// Replaces the stored cart and reschedules its reminder.
    ///
    /// Cancels the reminder held by the previous cart, writes `cart` without
    /// a reminder token, then schedules a new reminder if the policy allows
    /// and records its token with a second write. Returns the cart as read
    /// back from the store.
    pub async fn upsert(&self, cart: Cart, options: Option<CartUpdateOptions>) -> BasketResult<Cart> {
        cart.validate()?;

        let mut cart = cart;
        let username = cart.username.clone();
        let ttl = options.unwrap_or(self.default_options).ttl;
        let _guard = self.lock(&username).await;

        debug!(username = %username, items = cart.items.len(), "BEGIN upsert cart");

        let previous = self.load_previous(&username).await?;
        if let Some(token) = previous.as_ref().and_then(|c| c.deferred_action_id.as_deref()) {
            self.cancel_best_effort(&username, &JobId::from(token)).await;
        }

        cart.deferred_action_id = None;
        self.store(&cart, ttl).await?;

        if self.policy.should_schedule(previous.as_ref(), &cart) {
            self.attach_reminder(&mut cart, ttl).await;
        }

        let persisted = self.load(&username).await?.unwrap_or(cart);

        info!(
            username = %username,
            deferred_action_id = persisted.deferred_action_id.as_deref().unwrap_or("none"),
            "Cart updated"
        );
        Ok(persisted)
    }

    /// Cancels the cart's reminder and removes the cart.
    ///
    /// Returns whether a cart existed and was removed.
    pub async fn delete(&self, username: &str) -> BasketResult<bool> {
        let _guard = self.lock(username).await;

        debug!(username, "BEGIN delete cart");

        let existing = self.load_previous(username).await?;
        if let Some(token) = existing.as_ref().and_then(|c| c.deferred_action_id.as_deref()) {
            self.cancel_best_effort(username, &JobId::from(token)).await;
        }

        let key = self.key(username);
        let removed = self.store.delete(&key).await.inspect_err(|e| {
            error!(username, error = %e, "Failed to delete cart");
        })?;

        info!(username, removed, "Cart deleted");
        Ok(removed)
    }

    /// Clears `token` from the stored cart once its reminder has fired.
    ///
    /// Leaves the cart untouched if it is gone, unreadable, or now holds
    /// another token. The write only lands if the entry is still exactly the
    /// one that was read, so a cart written in the meantime is never
    /// overwritten. Returns whether the token was cleared.
    pub async fn release_deferred_action(&self, username: &str, token: &str) -> BasketResult<bool> {
        let _guard = self.lock(username).await;
        let key = self.key(username);

        let Some(raw) = self.load_raw(username).await? else {
            return Ok(false);
        };

        let mut cart: Cart = match serde_json::from_str(&raw) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(username, error = %e, "Stored cart is unreadable, keeping it");
                return Ok(false);
            }
        };

        if cart.deferred_action_id.as_deref() != Some(token) {
            debug!(username, token, "Cart no longer holds fired reminder");
            return Ok(false);
        }

        cart.deferred_action_id = None;
        let released = serde_json::to_string(&cart)?;

        let swapped = self
            .store
            .compare_and_swap_raw(&key, &raw, &released)
            .await
            .inspect_err(|e| {
                error!(username, error = %e, "Failed to release fired reminder");
            })?;

        if swapped {
            debug!(username, token, "Released fired reminder");
        } else {
            debug!(username, token, "Cart changed while releasing fired reminder");
        }
        Ok(swapped)
    }

    /// Checks that the store is reachable.
    pub async fn health_check(&self) -> BasketResult<()> {
        self.store.health_check().await
    }

    async fn lock(&self, username: &str) -> Option<OwnedMutexGuard<()>> {
        match &self.locks {
            Some(locks) => Some(locks.lock(username).await),
            None => None,
        }
    }

    fn key(&self, username: &str) -> String {
        cache_keys::cart(&self.key_prefix, username)
    }

    async fn load_raw(&self, username: &str) -> BasketResult<Option<String>> {
        self.store.get_raw(&self.key(username)).await.inspect_err(|e| {
            error!(username, error = %e, "Failed to read cart");
        })
    }

    async fn load(&self, username: &str) -> BasketResult<Option<Cart>> {
        match self.load_raw(username).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Reads the cart about to be replaced or removed.
    ///
    /// An entry that does not decode as a cart holds no usable token, so it
    /// is treated as absent and overwritten.
    async fn load_previous(&self, username: &str) -> BasketResult<Option<Cart>> {
        let Some(raw) = self.load_raw(username).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(cart) => Ok(Some(cart)),
            Err(e) => {
                warn!(username, error = %e, "Stored cart is unreadable, replacing it");
                Ok(None)
            }
        }
    }

    async fn store(&self, cart: &Cart, ttl: Option<Duration>) -> BasketResult<()> {
        self.store
            .set(&self.key(&cart.username), cart, ttl)
            .await
            .inspect_err(|e| {
                error!(username = %cart.username, error = %e, "Failed to write cart");
            })
    }

    /// Schedules a reminder for `cart` and records its token.
    ///
    /// On return `cart.deferred_action_id` matches what the store holds.
    async fn attach_reminder(&self, cart: &mut Cart, ttl: Option<Duration>) {
        let reminder =
            CheckoutReminder::for_cart(cart, &self.reminder.subject, &self.reminder.checkout_url);

        let token = match self.scheduler.schedule(&reminder, self.reminder.delay).await {
            Ok(token) => token,
            Err(e) => {
                warn!(
                    username = %cart.username,
                    error = %BasketError::from(e),
                    "Failed to schedule checkout reminder"
                );
                return;
            }
        };

        cart.deferred_action_id = Some(token.as_str().to_string());

        if let Err(e) = self.store(cart, ttl).await {
            warn!(
                username = %cart.username,
                job_id = %token,
                error = %e,
                "Failed to record reminder token, cancelling reminder"
            );
            cart.deferred_action_id = None;
            self.cancel_best_effort(&cart.username, &token).await;
            return;
        }

        info!(
            username = %cart.username,
            job_id = %token,
            delay_secs = self.reminder.delay.as_secs(),
            "Scheduled checkout reminder"
        );
    }

    async fn cancel_best_effort(&self, username: &str, token: &JobId) {
        match self.scheduler.cancel(token).await {
            Ok(()) => info!(username, job_id = %token, "Cancelled checkout reminder"),
            Err(JobError::NotFound(_)) => {
                debug!(username, job_id = %token, "Checkout reminder already gone");
            }
            Err(e) => warn!(
                username,
                job_id = %token,
                error = %BasketError::from(e),
                "Failed to cancel checkout reminder"
            ),
        }
    }
}
