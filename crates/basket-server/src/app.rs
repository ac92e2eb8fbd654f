//! Application wiring.
//!
//! Builds the cart store, the reminder scheduler, the coordinator, and the
//! reminder dispatcher from configuration with plain constructors.

use crate::redis_pool;
use basket_config::AppConfig;
use basket_core::{BasketError, BasketResult};
use basket_jobs::{
    DeferredActionScheduler, DispatcherConfig, JobDispatcher, MemoryJobScheduler,
    RedisJobScheduler,
};
use basket_rest::{create_router, AppState};
use basket_service::{
    CacheInterface, CartCoordinator, CheckoutReminderHandler, LogNotifier, MemoryCacheService,
    RedisCacheService,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Fully wired application components.
pub struct App {
    pub config: AppConfig,
    pub coordinator: Arc<CartCoordinator>,
    pub dispatcher: Arc<JobDispatcher>,
}

impl App {
    /// Connects backends and assembles the components.
    ///
    /// With Redis disabled, carts and reminders live in process memory.
    pub async fn build(config: AppConfig) -> BasketResult<Self> {
        let (store, scheduler) = build_backends(&config).await?;
        Ok(Self::assemble(config, store, scheduler))
    }

    /// Assembles components on top of the given backends.
    pub fn assemble(
        config: AppConfig,
        store: Arc<dyn CacheInterface>,
        scheduler: Arc<dyn DeferredActionScheduler>,
    ) -> Self {
        let coordinator = Arc::new(CartCoordinator::from_config(
            &config,
            store,
            scheduler.clone(),
        ));

        let dispatcher = Arc::new(JobDispatcher::new(
            scheduler,
            DispatcherConfig {
                poll_interval: config.reminder.poll_interval(),
                batch_size: config.reminder.batch_size,
                ..DispatcherConfig::default()
            },
        ));
        dispatcher.register(Arc::new(CheckoutReminderHandler::new(
            coordinator.clone(),
            Arc::new(LogNotifier),
        )));

        Self {
            config,
            coordinator,
            dispatcher,
        }
    }

    /// Serves the REST API and runs the reminder dispatcher until `shutdown`
    /// resolves.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> BasketResult<()> {
        let state = AppState::new(self.coordinator.clone());
        let router = create_router(state, &self.config.server);

        let addr = self.config.server.addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| BasketError::Internal(format!("Failed to bind {addr}: {e}")))?;
        info!("Starting REST server on http://{}", addr);

        let dispatcher = self.dispatcher.clone();
        let dispatcher_task = tokio::spawn(async move {
            if let Err(e) = dispatcher.run().await {
                error!(error = %e, "Reminder dispatcher stopped with error");
            }
        });

        let served = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await;

        self.dispatcher.shutdown();
        if tokio::time::timeout(Duration::from_secs(5), dispatcher_task)
            .await
            .is_err()
        {
            warn!("Reminder dispatcher did not stop in time");
        }

        served.map_err(|e| BasketError::Internal(format!("REST server error: {e}")))?;

        let stats = self.dispatcher.stats();
        info!(
            reminders_sent = stats.jobs_processed,
            reminders_failed = stats.jobs_failed,
            "Server shutdown complete"
        );
        Ok(())
    }
}

async fn build_backends(
    config: &AppConfig,
) -> BasketResult<(Arc<dyn CacheInterface>, Arc<dyn DeferredActionScheduler>)> {
    if !config.redis.enabled {
        warn!("Redis disabled, using in-memory cart store and reminder scheduler");
        return Ok((
            Arc::new(MemoryCacheService::new()),
            Arc::new(MemoryJobScheduler::new()),
        ));
    }

    let pool = redis_pool::connect(&config.redis).await?;

    Ok((
        Arc::new(RedisCacheService::new(pool.clone())),
        Arc::new(RedisJobScheduler::new(pool, config.redis.jobs_key_prefix.clone())),
    ))
}
