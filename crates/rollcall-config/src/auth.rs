//! Authentication configuration: token signing secret, token lifetime and
//! password hashing cost.
//!
//! Loaded once at startup and passed by value into the token codec and the
//! secret hasher. A missing or weak signing secret is a startup error; there
//! is no built-in fallback secret.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC signing secret, at least 32 bytes (required)
//! - `JWT_EXPIRY_SECS`: Token lifetime in seconds (default: 86400, 24 hours)
//! - `BCRYPT_COST`: bcrypt cost factor, 4 to 31 (default: 10)

use std::fmt;

use crate::ConfigError;

pub const MIN_SECRET_BYTES: usize = 32;
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;
pub const DEFAULT_HASH_COST: u32 = 10;

const MIN_HASH_COST: u32 = 4;
const MAX_HASH_COST: u32 = 31;

#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub hash_cost: u32,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

impl AuthConfig {
    /// Builds a config, rejecting weak secrets and out-of-range values.
    pub fn new(
        jwt_secret: impl Into<String>,
        token_ttl_secs: i64,
        hash_cost: u32,
    ) -> Result<Self, ConfigError> {
        let jwt_secret = jwt_secret.into();

        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::WeakSecret {
                min_bytes: MIN_SECRET_BYTES,
            });
        }
        if token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY_SECS",
                reason: "must be a positive number of seconds".to_string(),
            });
        }
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&hash_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                reason: format!("must be between {} and {}", MIN_HASH_COST, MAX_HASH_COST),
            });
        }

        Ok(Self {
            jwt_secret,
            token_ttl_secs,
            hash_cost,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_secs = match lookup("JWT_EXPIRY_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "JWT_EXPIRY_SECS",
                reason: format!("'{}' is not an integer", raw),
            })?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let hash_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "BCRYPT_COST",
                reason: format!("'{}' is not an integer", raw),
            })?,
            None => DEFAULT_HASH_COST,
        };

        Self::new(secret, token_ttl_secs, hash_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AuthConfig::from_lookup(lookup_from(&[("JWT_SECRET", SECRET)])).unwrap();

        assert_eq!(config.token_ttl_secs, 86_400);
        assert_eq!(config.hash_cost, 10);
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let result = AuthConfig::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let result = AuthConfig::new("too-short", 3600, 10);
        assert!(matches!(result, Err(ConfigError::WeakSecret { .. })));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        assert!(AuthConfig::new(SECRET, 0, 10).is_err());
        assert!(AuthConfig::new(SECRET, -5, 10).is_err());
    }

    #[test]
    fn test_hash_cost_bounds() {
        assert!(AuthConfig::new(SECRET, 3600, 3).is_err());
        assert!(AuthConfig::new(SECRET, 3600, 32).is_err());
        assert!(AuthConfig::new(SECRET, 3600, 4).is_ok());
    }

    #[test]
    fn test_unparseable_expiry() {
        let result = AuthConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("JWT_EXPIRY_SECS", "one day"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "JWT_EXPIRY_SECS",
                ..
            })
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::new(SECRET, 3600, 10).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("<redacted>"));
    }
}
