//! Per-client throttling for the credential endpoints.
//!
//! Clients are keyed by the first `x-forwarded-for` entry, then by the peer
//! address from [`ConnectInfo`]. Requests with neither share one bucket.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, RateLimiter};
use rollcall_config::RateLimitConfig;
use rollcall_core::AppError;
use tracing::warn;

use crate::state::AppState;

pub type AuthRateLimiter = DefaultKeyedRateLimiter<String>;

const FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "unknown";
const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(60);

/// `None` when limiting is disabled.
pub fn auth_rate_limiter(config: &RateLimitConfig) -> Option<Arc<AuthRateLimiter>> {
    config
        .enabled
        .then(|| Arc::new(RateLimiter::keyed(config.auth_quota())))
}

/// Periodically drops buckets that have fully refilled.
pub fn spawn_limiter_housekeeping(limiter: Arc<AuthRateLimiter>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HOUSEKEEPING_INTERVAL);
        loop {
            interval.tick().await;
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
    });
}

pub fn client_key(req: &Request) -> String {
    let forwarded = req
        .headers()
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

pub async fn rate_limit_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(limiter) = &state.auth_limiter {
        let key = client_key(&req);
        if limiter.check_key(&key).is_err() {
            warn!(client = %key, path = %req.uri().path(), "Rate limit exceeded");
            return Err(AppError::too_many_requests(anyhow!(
                "Too many requests, please try again later"
            )));
        }
    }

    Ok(next.run(req).await)
}
