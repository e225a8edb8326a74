//! Rate limiting middleware.
//!
//! Provides per-client-IP rate limiting on the public routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use serde_json::json;
use std::{
    collections::HashMap,
    num::NonZeroU32,
    sync::{Arc, RwLock},
};

use crate::app::AppState;

/// Type alias for the rate limiter used per client.
type ClientRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across all requests.
/// Uses a HashMap keyed by client IP with individual rate limiters.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<String, Arc<ClientRateLimiter>>>,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Create a new rate limiter state with the specified limit per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            rate_limit_per_minute,
        }
    }

    /// Get or create a rate limiter for the given client IP.
    fn get_or_create_limiter(&self, client_ip: &str) -> Arc<ClientRateLimiter> {
        // First try to get existing limiter with read lock
        {
            let limiters = self.limiters.read().unwrap();
            if let Some(limiter) = limiters.get(client_ip) {
                return limiter.clone();
            }
        }

        // Create new limiter with write lock
        let mut limiters = self.limiters.write().unwrap();

        // Double-check in case another thread created it
        if let Some(limiter) = limiters.get(client_ip) {
            return limiter.clone();
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(self.rate_limit_per_minute).unwrap_or(NonZeroU32::new(100).unwrap()),
        );
        let limiter = Arc::new(GovRateLimiter::direct(quota));
        limiters.insert(client_ip.to_string(), limiter.clone());
        limiter
    }

    /// Check if a request from the given client should be allowed.
    /// Returns Ok(()) if allowed, or Err with retry_after seconds if rate limited.
    pub fn check(&self, client_ip: &str) -> Result<(), u64> {
        let limiter = self.get_or_create_limiter(client_ip);

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                    &governor::clock::DefaultClock::default(),
                ));
                // Return retry after in seconds, minimum 1 second
                Err(wait_time.as_secs().max(1))
            }
        }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("active_limiters", &self.limiters.read().unwrap().len())
            .finish()
    }
}

/// Extract the client IP for rate limiting.
///
/// The service runs behind a reverse proxy, so the forwarding headers are the
/// source of truth; direct hits without them share one bucket.
fn client_ip(req: &Request<Body>) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    req.headers()
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware that applies rate limiting per client IP on public routes.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(ref rate_limiter) = state.rate_limiter {
        let ip = client_ip(&req);
        if let Err(retry_after) = rate_limiter.check(&ip) {
            tracing::warn!(client_ip = %ip, retry_after, "Rate limit exceeded");
            return rate_limited_response(state.config.security.rate_limit_per_minute, retry_after);
        }
    }

    next.run(req).await
}

/// Create a rate limited response with proper headers and body.
fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retry_after": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    // Add Retry-After header
    if let Ok(value) = retry_after.to_string().parse() {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_state_creation() {
        let state = RateLimiterState::new(100);
        assert_eq!(state.rate_limit_per_minute, 100);
    }

    #[test]
    fn test_rate_limiter_allows_requests() {
        let state = RateLimiterState::new(100);
        assert!(state.check("10.0.0.1").is_ok());
    }

    #[test]
    fn test_rate_limiter_exhaustion() {
        // Use very low limit to test exhaustion
        let state = RateLimiterState::new(1);

        assert!(state.check("10.0.0.1").is_ok());

        let result = state.check("10.0.0.1");
        assert!(result.is_err());
        // Retry-after should be at least 1 second
        assert!(result.unwrap_err() >= 1);
    }

    #[test]
    fn test_rate_limiter_different_clients_independent() {
        let state = RateLimiterState::new(1);

        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.2").is_ok());
        assert!(state.check("10.0.0.3").is_ok());

        assert!(state.check("10.0.0.1").is_err());
        assert!(state.check("10.0.0.2").is_err());
        assert!(state.check("10.0.0.3").is_err());
    }

    #[test]
    fn test_rate_limiter_same_client_multiple_checks() {
        let state = RateLimiterState::new(5);

        for i in 0..5 {
            let result = state.check("192.168.1.7");
            assert!(result.is_ok(), "Request {} should be allowed", i);
        }

        assert!(state.check("192.168.1.7").is_err());
    }

    #[test]
    fn test_rate_limiter_get_or_create_idempotent() {
        let state = RateLimiterState::new(100);

        let limiter1 = state.get_or_create_limiter("10.0.0.1");
        let limiter2 = state.get_or_create_limiter("10.0.0.1");

        // Should be the same Arc (same underlying object)
        assert!(Arc::ptr_eq(&limiter1, &limiter2));
    }

    #[test]
    fn test_client_ip_from_forwarded_for() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "203.0.113.9");
    }

    #[test]
    fn test_client_ip_from_real_ip() {
        let req = Request::builder()
            .header("x-real-ip", "203.0.113.10")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "203.0.113.10");
    }

    #[test]
    fn test_client_ip_fallback() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&req), "unknown");
    }

    #[test]
    fn test_rate_limited_response_format() {
        let response = rate_limited_response(100, 60);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    }

    #[test]
    fn test_rate_limiter_state_debug() {
        let state = RateLimiterState::new(100);
        let debug = format!("{:?}", state);
        assert!(debug.contains("RateLimiterState"));
        assert!(debug.contains("100"));
    }
}
