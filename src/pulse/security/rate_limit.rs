use crate::AppState;
use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use serde_json::json;
use std::fmt;
use std::num::NonZeroU32;

/// Global token bucket shared by every route.
///
/// Not keyed by client: the submitter identity is spoofable, so there is
/// nothing trustworthy to key on.
pub struct AppRateLimiter {
    limiter: DefaultDirectRateLimiter,
    requests_per_second: NonZeroU32,
    burst_size: NonZeroU32,
}

impl AppRateLimiter {
    /// Zero values fall back to one request per second and a burst equal to the rate.
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        let requests_per_second = NonZeroU32::new(requests_per_second).unwrap_or(nonzero!(1u32));
        let burst_size = NonZeroU32::new(burst_size).unwrap_or(requests_per_second);
        let quota = Quota::per_second(requests_per_second).allow_burst(burst_size);

        Self {
            limiter: RateLimiter::direct(quota),
            requests_per_second,
            burst_size,
        }
    }

    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl fmt::Debug for AppRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRateLimiter")
            .field("requests_per_second", &self.requests_per_second)
            .field("burst_size", &self.burst_size)
            .finish_non_exhaustive()
    }
}

/// Middleware to enforce rate limits
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if state.config.resilience.rate_limit_enabled && !state.rate_limiter.check() {
        tracing::warn!(name: "http.rate_limited", path = %req.uri().path(), "Request rejected by rate limiter");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Too many requests, slow down" })),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_reject() {
        let limiter = AppRateLimiter::new(1, 3);

        assert!(limiter.check());
        assert!(limiter.check());
        assert!(limiter.check());

        // Burst exhausted; next token is a second away.
        assert!(!limiter.check());
    }

    #[test]
    fn test_zero_config_still_admits_one() {
        let limiter = AppRateLimiter::new(0, 0);
        assert!(limiter.check());
        assert!(!limiter.check());
    }
}
