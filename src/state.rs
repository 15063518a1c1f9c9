use std::sync::Arc;

use crate::cache::{CountStore, LruCountStore};
use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::middleware::EndpointRateLimiter;
use crate::services::Services;

/// The shared application state.
///
/// Cloned into every handler by axum. Cloning is cheap: the pool, the services and
/// the limiters are reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: sqlx::SqlitePool,
    pub config: Arc<AppConfig>,
    pub metrics: Metrics,
    /// Global and per-route request limits.
    pub rate_limiter: EndpointRateLimiter,
    pub services: Services,
}

impl AppState {
    /// State backed by the in-process LRU count store sized from `[cache]`.
    pub fn new(db: sqlx::SqlitePool, config: AppConfig) -> Self {
        let store = Arc::new(LruCountStore::new(config.cache.capacity));
        Self::with_count_store(db, config, store)
    }

    /// State with a caller-provided count store, e.g. an external key-value client.
    pub fn with_count_store(db: sqlx::SqlitePool, config: AppConfig, count_store: Arc<dyn CountStore>) -> Self {
        let metrics = Metrics::new();
        let rate_limiter = EndpointRateLimiter::from_config(&config.rate_limit);
        let services = Services::new(db.clone(), &config, metrics.clone(), count_store);

        Self { db, config: Arc::new(config), metrics, rate_limiter, services }
    }
}
