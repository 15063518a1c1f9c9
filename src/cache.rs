//! Recruitment count cache.
//!
//! A key → count store with an explicit "no cached value" sentinel. The store sits
//! behind [`CountStore`] so an external key-value client can replace the in-process
//! [`LruCountStore`]. There is no TTL and no locking: concurrent writers race and the
//! last write wins. Every write stores an authoritative recount, so the next
//! registration or deletion repairs a lost update.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lru::LruCache;

use crate::error::AppResult;
use crate::metrics::Metrics;
use crate::repository::RecruitmentRepository;

/// Returned by reads of a key that holds no value. Distinct from a cached zero.
pub const RECRUITMENT_COUNT_NO_CACHE: i64 = -1;

/// Minimal key-value surface the count cache needs.
#[async_trait]
pub trait CountStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<i64>;
    async fn set(&self, key: &str, value: i64);
}

/// Capacity-bounded in-process store.
pub struct LruCountStore {
    entries: Mutex<LruCache<String, i64>>,
}

impl LruCountStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { entries: Mutex::new(LruCache::new(capacity)) }
    }
}

#[async_trait]
impl CountStore for LruCountStore {
    async fn get(&self, key: &str) -> Option<i64> {
        // A poisoned lock only means another request panicked mid-update; the map itself is intact.
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).copied()
    }

    async fn set(&self, key: &str, value: i64) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.put(key.to_string(), value);
    }
}

#[derive(Clone)]
pub struct RecruitmentCountCache {
    store: Arc<dyn CountStore>,
    recruitments: RecruitmentRepository,
    metrics: Metrics,
}

impl RecruitmentCountCache {
    pub fn new(store: Arc<dyn CountStore>, recruitments: RecruitmentRepository, metrics: Metrics) -> Self {
        Self { store, recruitments, metrics }
    }

    /// Cached count for `key`, or [`RECRUITMENT_COUNT_NO_CACHE`] when nothing is cached.
    pub async fn get_recruitment_count(&self, key: &str) -> i64 {
        match self.store.get(key).await {
            Some(count) => {
                self.metrics.inc_count_cache_hits();
                count
            }
            None => {
                self.metrics.inc_count_cache_misses();
                RECRUITMENT_COUNT_NO_CACHE
            }
        }
    }

    pub async fn register_recruitment_count(&self, key: &str, count: i64) {
        self.store.set(key, count).await;
    }

    /// Refreshes `key` with the authoritative number of recruitment rows and returns it.
    ///
    /// The cached value is never incremented in place; every call recounts.
    pub async fn plus_one_to_recruitment_count(&self, key: &str) -> AppResult<i64> {
        let count = self.recruitments.count_all().await?;
        self.register_recruitment_count(key, count).await;
        tracing::debug!(key, count, "recruitment count cache refreshed");
        Ok(count)
    }

    /// Cached count, recomputed and registered on a miss.
    pub async fn get_or_recount(&self, key: &str) -> AppResult<i64> {
        let cached = self.get_recruitment_count(key).await;
        if cached != RECRUITMENT_COUNT_NO_CACHE {
            return Ok(cached);
        }
        self.plus_one_to_recruitment_count(key).await
    }
}
