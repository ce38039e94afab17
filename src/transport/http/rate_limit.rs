//! Per-client throttle for the public verification route.
//!
//! Fixed window per client IP: at most `max_requests` calls per `window`,
//! then 429 until the window rolls over.

use crate::transport::http::handlers::common::fail;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Expired windows are swept once the table grows past this many clients.
const SWEEP_THRESHOLD: usize = 10_000;

pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, (Instant, u32)>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self { max_requests, window, clients: Mutex::new(HashMap::new()) }
    }

    /// Counts one request from `client`; `false` once it is over the limit.
    pub async fn check(&self, client: IpAddr) -> bool {
        let now = Instant::now();
        let mut clients = self.clients.lock().await;
        if clients.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            clients.retain(|_, (start, _)| now.duration_since(*start) <= window);
        }

        let entry = clients.entry(client).or_insert((now, 0));
        if now.duration_since(entry.0) > self.window {
            *entry = (now, 0);
        }
        entry.1 = entry.1.saturating_add(1);
        entry.1 <= self.max_requests
    }
}

/// Middleware for `route_layer`. Requests without connection info (no
/// `into_make_service_with_connect_info`) share one bucket.
pub async fn limit_by_client(
    State(limiter): State<Arc<RateLimiter>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let client = connect_info
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    if !limiter.check(client).await {
        tracing::warn!(%client, "verification rate limit exceeded");
        return fail(StatusCode::TOO_MANY_REQUESTS, "Too many requests. Please wait and try again.")
            .into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[tokio::test]
    async fn limits_each_client_separately() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.check(ip(1)).await);
        }
        assert!(!limiter.check(ip(1)).await);
        assert!(limiter.check(ip(2)).await);
    }

    #[tokio::test]
    async fn window_rolls_over() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));
        assert!(limiter.check(ip(1)).await);
        assert!(!limiter.check(ip(1)).await);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(limiter.check(ip(1)).await);
    }
}
