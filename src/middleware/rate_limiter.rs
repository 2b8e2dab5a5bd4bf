//! Per-client rate limiting

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{collections::HashMap, sync::Arc, time::Instant};
use tokio::sync::Mutex;

/// Token bucket tracked per client
#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    refilled_at: Instant,
}

/// Shared token-bucket rate limiter keyed by client IP
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<String, Bucket>>>,
    tokens_per_second: f64,
    burst: f64,
}

impl RateLimiter {
    /// Allow `requests_per_second` sustained, with a 2x burst
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            tokens_per_second: requests_per_second as f64,
            burst: (requests_per_second * 2) as f64,
        }
    }

    /// Consume one token for the client; false means throttled
    pub async fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();

        let bucket = buckets.entry(key.to_string()).or_insert(Bucket {
            tokens: self.burst,
            refilled_at: now,
        });

        let elapsed = now.duration_since(bucket.refilled_at).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.tokens_per_second).min(self.burst);
        bucket.refilled_at = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Rate-limiting middleware body, used with `middleware::from_fn`
pub async fn rate_limit(limiter: RateLimiter, request: Request<Body>, next: Next) -> Response {
    let client_key = client_ip(&request);

    if !limiter.check(&client_key).await {
        tracing::warn!(client = %client_key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "1")],
            "Too many requests. Please try again later.",
        )
            .into_response();
    }

    next.run(request).await
}

fn client_ip(request: &Request<Body>) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for") {
        if let Ok(s) = forwarded.to_str() {
            if let Some(ip) = s.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    if let Some(real_ip) = request.headers().get("x-real-ip") {
        if let Ok(s) = real_ip.to_str() {
            return s.to_string();
        }
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_burst_then_throttle() {
        let limiter = RateLimiter::new(5);

        // Burst capacity is 2x the sustained rate.
        for _ in 0..10 {
            assert!(limiter.check("client").await);
        }
        assert!(!limiter.check("client").await);
    }

    #[tokio::test]
    async fn test_rate_limiter_isolates_clients() {
        let limiter = RateLimiter::new(1);

        assert!(limiter.check("a").await);
        assert!(limiter.check("b").await);
        assert!(limiter.check("a").await);
        assert!(limiter.check("b").await);
        assert!(!limiter.check("a").await);
    }
}
