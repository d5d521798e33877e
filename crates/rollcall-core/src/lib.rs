//! # Rollcall Core
//!
//! Core types shared by every Rollcall crate:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: bcrypt-backed [`SecretHasher`] and the password policy
//!
//! # Example
//!
//! ```ignore
//! use rollcall_core::{AppError, SecretHasher};
//!
//! let hasher = SecretHasher::new(10);
//! let digest = hasher.hash("s3cret-password")?;
//! assert!(hasher.verify("s3cret-password", &digest)?);
//!
//! let error = AppError::conflict(anyhow::anyhow!("Email already registered"));
//! ```

pub mod errors;
pub mod password;

pub use errors::{AppError, ErrorResponse};
pub use password::{SecretHasher, password_policy_violations};
