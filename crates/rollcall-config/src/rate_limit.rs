//! Rate limiting configuration for the credential endpoints.
//!
//! Registration and login are the only routes that accept a password, so
//! they are the only routes throttled. Limits are keyed per client IP and
//! enforced with the Governor crate's token bucket.
//!
//! # Configuration
//!
//! - `RATE_LIMIT_ENABLED`: Set to `false` or `0` to disable (default: enabled)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: Tokens replenished per second (default: 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: Maximum burst (default: 5)
//!
//! # Example
//!
//! ```ignore
//! use rollcall_config::RateLimitConfig;
//!
//! let config = RateLimitConfig::from_env();
//! let limiter = governor::RateLimiter::keyed(config.auth_quota());
//! ```

use std::num::NonZeroU32;

use governor::Quota;

/// Rate limit configuration for the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// When false no limiter is installed.
    pub enabled: bool,

    /// Requests per second for auth endpoints.
    ///
    /// This is the rate at which tokens are replenished in the bucket.
    pub auth_per_second: u32,

    /// Burst size for auth endpoints.
    ///
    /// Maximum number of tokens that can accumulate, allowing short bursts
    /// above the per-second rate.
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    /// A config with limiting switched off, for tests and local tooling.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Creates a new `RateLimitConfig` from environment variables.
    ///
    /// Falls back to default values if environment variables are not set
    /// or cannot be parsed.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            enabled: std::env::var("RATE_LIMIT_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            auth_per_second: std::env::var("RATE_LIMIT_AUTH_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.auth_per_second),
            auth_burst_size: std::env::var("RATE_LIMIT_AUTH_BURST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.auth_burst_size),
        }
    }

    /// Governor quota for the auth endpoints. Zero values are raised to one.
    #[must_use]
    pub fn auth_quota(&self) -> Quota {
        let per_second = NonZeroU32::new(self.auth_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.auth_burst_size).unwrap_or(NonZeroU32::MIN);

        Quota::per_second(per_second).allow_burst(burst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.auth_per_second, 10);
        assert_eq!(config.auth_burst_size, 5);
    }

    #[test]
    fn test_disabled_keeps_limits() {
        let config = RateLimitConfig::disabled();
        assert!(!config.enabled);
        assert_eq!(config.auth_burst_size, 5);
    }

    #[test]
    fn test_quota_burst() {
        let config = RateLimitConfig {
            enabled: true,
            auth_per_second: 2,
            auth_burst_size: 7,
        };
        assert_eq!(config.auth_quota().burst_size().get(), 7);
    }

    #[test]
    fn test_zero_values_do_not_panic() {
        let config = RateLimitConfig {
            enabled: true,
            auth_per_second: 0,
            auth_burst_size: 0,
        };
        assert_eq!(config.auth_quota().burst_size().get(), 1);
    }
}
