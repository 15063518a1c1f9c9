use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Process-wide counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub recruitments_registered: Arc<AtomicU64>,
    pub applications_registered: Arc<AtomicU64>,
    pub application_conflicts: Arc<AtomicU64>,
    pub reviews_registered: Arc<AtomicU64>,
    pub count_cache_hits: Arc<AtomicU64>,
    pub count_cache_misses: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            recruitments_registered: Arc::new(AtomicU64::new(0)),
            applications_registered: Arc::new(AtomicU64::new(0)),
            application_conflicts: Arc::new(AtomicU64::new(0)),
            reviews_registered: Arc::new(AtomicU64::new(0)),
            count_cache_hits: Arc::new(AtomicU64::new(0)),
            count_cache_misses: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_recruitments_registered(&self) {
        self.recruitments_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_applications_registered(&self) {
        self.applications_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_application_conflicts(&self) {
        self.application_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_reviews_registered(&self) {
        self.reviews_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_count_cache_hits(&self) {
        self.count_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_count_cache_misses(&self) {
        self.count_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            recruitments_registered: self.recruitments_registered.load(Ordering::Relaxed),
            applications_registered: self.applications_registered.load(Ordering::Relaxed),
            application_conflicts: self.application_conflicts.load(Ordering::Relaxed),
            reviews_registered: self.reviews_registered.load(Ordering::Relaxed),
            count_cache_hits: self.count_cache_hits.load(Ordering::Relaxed),
            count_cache_misses: self.count_cache_misses.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub recruitments_registered: u64,
    pub applications_registered: u64,
    pub application_conflicts: u64,
    pub reviews_registered: u64,
    pub count_cache_hits: u64,
    pub count_cache_misses: u64,
    pub uptime_seconds: u64,
}
