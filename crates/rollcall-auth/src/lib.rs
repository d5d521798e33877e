//! # Rollcall Auth
//!
//! Bearer token issuing and validation.
//!
//! - [`claims`]: The [`TokenClaims`] carried by every token
//! - [`codec`]: [`TokenCodec`], which signs and verifies HS256 tokens, and
//!   the [`TokenError`] it reports
//!
//! Validation is pure: no store access happens here. Turning valid claims
//! into a live principal is the claim resolver's job.
//!
//! # Example
//!
//! ```ignore
//! use rollcall_auth::TokenCodec;
//! use rollcall_config::AuthConfig;
//!
//! let codec = TokenCodec::new(&AuthConfig::from_env()?);
//! let token = codec.issue(identity.id, &identity.email, identity.role)?;
//! let claims = codec.validate(&token)?;
//! ```

pub mod claims;
pub mod codec;

pub use claims::TokenClaims;
pub use codec::{TokenCodec, TokenError};
