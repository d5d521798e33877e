//! # Rollcall Config
//!
//! Configuration types for the Rollcall API, loaded once at startup:
//!
//! - [`auth`]: Token signing secret, token lifetime and bcrypt cost
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`rate_limit`]: Throttling of the credential endpoints
//!
//! # Example
//!
//! ```ignore
//! use rollcall_config::{AuthConfig, CorsConfig, RateLimitConfig};
//!
//! let auth_config = AuthConfig::from_env()?; // fails fast on a weak secret
//! let cors_config = CorsConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! ```

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::AuthConfig;
pub use cors::CorsConfig;
pub use rate_limit::RateLimitConfig;

/// Startup-time configuration failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("JWT_SECRET must be at least {min_bytes} bytes")]
    WeakSecret { min_bytes: usize },

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}
