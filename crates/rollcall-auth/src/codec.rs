//! HS256 token signing and verification.
//!
//! The codec is built once from [`AuthConfig`] and shared through the
//! application state. Keys are derived at construction so the secret string
//! is not kept around after startup.

use std::fmt;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use rollcall_config::AuthConfig;
use rollcall_core::AppError;
use rollcall_models::{Email, IdentityId, Role};

use crate::claims::TokenClaims;

/// Why a presented token was rejected.
///
/// Callers collapse every variant into one 401 response; the variant is only
/// for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not match")]
    SignatureMismatch,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
            _ => TokenError::Malformed,
        }
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            ttl_secs: config.token_ttl_secs,
        }
    }

    /// Issues a token for `subject` valid for the configured lifetime.
    ///
    /// Every call produces an independent token; earlier tokens for the same
    /// subject stay valid until their own `exp`.
    pub fn issue(&self, subject: IdentityId, email: &Email, role: Role) -> Result<String, AppError> {
        let now = Utc::now().timestamp();

        let claims = TokenClaims {
            sub: subject.to_string(),
            email: email.to_string(),
            role,
            iat: now,
            exp: now + self.ttl_secs,
        };

        self.sign(&claims)
    }

    /// Signs arbitrary claims with this codec's key.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
    }

    /// Checks signature and expiry and returns the embedded claims.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }
}
