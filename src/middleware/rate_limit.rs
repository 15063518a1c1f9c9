use super::ip::extract_ip_from_headers;
use axum::{
    extract::{connect_info::ConnectInfo, MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::state::AppState;

/// A thread-safe rate limiter based on the sliding window algorithm.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<RwLock<HashMap<IpAddr, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    /// Allows `max_requests` per IP within any `window_seconds` interval.
    pub fn new(max_requests: usize, window_seconds: u64) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window: Duration::from_secs(window_seconds),
        }
    }

    /// Records the request when allowed, otherwise returns [`AppError::RateLimited`].
    pub async fn check_rate_limit(&self, ip: IpAddr) -> Result<(), AppError> {
        let now = Instant::now();
        let mut requests = self.requests.write().await;

        let timestamps = requests.entry(ip).or_default();

        // On clock skew keep the timestamp rather than freeing a slot.
        timestamps.retain(|&t| now.checked_duration_since(t).map(|d| d < self.window).unwrap_or(true));

        if timestamps.len() >= self.max_requests {
            let oldest = timestamps.first().copied().unwrap_or(now);
            let retry_after = match now.checked_duration_since(oldest) {
                Some(elapsed) => self.window.saturating_sub(elapsed),
                None => Duration::from_secs(1),
            };
            return Err(AppError::RateLimited { retry_after_seconds: retry_after.as_secs().max(1) });
        }

        timestamps.push(now);
        Ok(())
    }

    /// Drops expired timestamps and IPs with no recent requests.
    pub async fn cleanup_old_entries(&self) {
        let now = Instant::now();
        let mut requests = self.requests.write().await;

        requests.retain(|_, timestamps| {
            timestamps.retain(|&t| now.checked_duration_since(t).map(|d| d < self.window).unwrap_or(true));
            !timestamps.is_empty()
        });
    }
}

/// A global limiter plus per-route limiters keyed by the matched route template.
#[derive(Clone)]
pub struct EndpointRateLimiter {
    global: RateLimiter,
    limiters: Arc<HashMap<String, RateLimiter>>,
}

impl EndpointRateLimiter {
    pub fn new(global: RateLimiter) -> Self {
        Self { global, limiters: Arc::new(HashMap::new()) }
    }

    /// Builds the limiters for the configured global, search and apply limits.
    pub fn from_config(cfg: &RateLimitConfig) -> Self {
        Self::new(RateLimiter::new(cfg.max_requests, cfg.window_seconds)).with_limits(vec![
            ("/api/recruitments", cfg.search_per_minute, 60),
            ("/api/v2/recruitments", cfg.search_per_minute, 60),
            ("/api/animals", cfg.search_per_minute, 60),
            ("/api/volunteers/recruitments/{recruitment_id}/apply", cfg.apply_per_minute, 60),
        ])
    }

    /// Adds or replaces route limits as `(route, max_requests, window_seconds)`.
    pub fn with_limits(self, limits: Vec<(&str, usize, u64)>) -> Self {
        let mut limiters = Arc::try_unwrap(self.limiters).unwrap_or_else(|shared| (*shared).clone());
        for (route, max_requests, window_seconds) in limits {
            limiters.insert(route.to_string(), RateLimiter::new(max_requests, window_seconds));
        }
        Self { global: self.global, limiters: Arc::new(limiters) }
    }

    /// Checks the global limit, then the limit of `route` if one is configured.
    pub async fn check(&self, route: Option<&str>, ip: IpAddr) -> Result<(), AppError> {
        self.global.check_rate_limit(ip).await?;
        match route.and_then(|r| self.limiters.get(r)) {
            Some(limiter) => limiter.check_rate_limit(ip).await,
            None => Ok(()),
        }
    }

    pub async fn cleanup_all(&self) {
        self.global.cleanup_old_entries().await;
        for limiter in self.limiters.values() {
            limiter.cleanup_old_entries().await;
        }
    }
}

/// Rejects requests over the global or per-route limit with `429`.
pub async fn rate_limit_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let remote_ip = req.extensions().get::<ConnectInfo<SocketAddr>>().map(|info| info.0.ip());
    let ip = extract_ip_from_headers(req.headers(), remote_ip);
    let route = req.extensions().get::<MatchedPath>().map(|p| p.as_str().to_string());

    match state.rate_limiter.check(route.as_deref(), ip).await {
        Ok(()) => next.run(req).await,
        Err(e) => {
            tracing::warn!(%ip, route = route.as_deref().unwrap_or("-"), "rate limited");
            e.into_response()
        }
    }
}

/// Periodically prunes the limiters' IP maps.
pub async fn cleanup_task(limiter: EndpointRateLimiter, interval_seconds: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

    loop {
        interval.tick().await;
        limiter.cleanup_all().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter() {
        let limiter = RateLimiter::new(3, 1);
        let ip = IpAddr::from([127, 0, 0, 1]);

        assert!(limiter.check_rate_limit(ip).await.is_ok());
        assert!(limiter.check_rate_limit(ip).await.is_ok());
        assert!(limiter.check_rate_limit(ip).await.is_ok());

        assert!(matches!(limiter.check_rate_limit(ip).await, Err(AppError::RateLimited { .. })));

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(limiter.check_rate_limit(ip).await.is_ok());
    }

    #[tokio::test]
    async fn test_different_ips() {
        let limiter = RateLimiter::new(1, 60);
        let ip1 = IpAddr::from([127, 0, 0, 1]);
        let ip2 = IpAddr::from([127, 0, 0, 2]);

        assert!(limiter.check_rate_limit(ip1).await.is_ok());
        assert!(limiter.check_rate_limit(ip2).await.is_ok());

        assert!(limiter.check_rate_limit(ip1).await.is_err());
        assert!(limiter.check_rate_limit(ip2).await.is_err());
    }

    #[tokio::test]
    async fn route_limit_applies_only_to_its_route() {
        let limiter = EndpointRateLimiter::new(RateLimiter::new(100, 60)).with_limits(vec![("/api/recruitments", 1, 60)]);
        let ip = IpAddr::from([10, 0, 0, 1]);

        assert!(limiter.check(Some("/api/recruitments"), ip).await.is_ok());
        assert!(limiter.check(Some("/api/recruitments"), ip).await.is_err());
        assert!(limiter.check(Some("/api/animals"), ip).await.is_ok());
        assert!(limiter.check(None, ip).await.is_ok());
    }

    #[tokio::test]
    async fn cleanup_forgets_expired_ips() {
        let limiter = RateLimiter::new(1, 1);
        let ip = IpAddr::from([10, 0, 0, 2]);
        assert!(limiter.check_rate_limit(ip).await.is_ok());
        tokio::time::sleep(Duration::from_millis(1100)).await;
        limiter.cleanup_old_entries().await;
        assert!(limiter.requests.read().await.is_empty());
    }
}
