//! Failure outcomes of the credential services.

use rollcall_auth::TokenError;
use rollcall_core::AppError;

use crate::store::{StoreError, UniqueKey};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const INVALID_TOKEN: &str = "Invalid or expired token";

/// What went wrong in provisioning, authentication or claim resolution.
///
/// Converted into an [`AppError`] at the handler boundary with
/// [`AuthError::into_app_error`]. Token and missing-subject failures share
/// one client message; the variant is kept for logs.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Student code already in use")]
    CodeTaken,

    #[error("Classroom not found")]
    ClassroomNotFound,

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("token rejected: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("token subject no longer exists")]
    UserNotFound,

    #[error("Account not found")]
    AccountNotFound,

    #[error("internal error: {}", .0.error)]
    Internal(AppError),
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err)
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(UniqueKey::Email) => AuthError::EmailTaken,
            StoreError::UniqueViolation(UniqueKey::StudentCode) => AuthError::CodeTaken,
            StoreError::ClassroomMissing => AuthError::ClassroomNotFound,
            StoreError::Backend(e) => AuthError::Internal(AppError::internal(e)),
        }
    }
}

impl AuthError {
    /// Short label for logs and the `reason` metric label.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::EmailTaken => "email_taken",
            AuthError::CodeTaken => "code_taken",
            AuthError::ClassroomNotFound => "classroom_not_found",
            AuthError::Validation(_) => "validation",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidToken(TokenError::Expired) => "token_expired",
            AuthError::InvalidToken(TokenError::Malformed) => "token_malformed",
            AuthError::InvalidToken(TokenError::SignatureMismatch) => "token_signature",
            AuthError::UserNotFound => "user_not_found",
            AuthError::AccountNotFound => "account_not_found",
            AuthError::Internal(_) => "internal",
        }
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::EmailTaken | AuthError::CodeTaken => {
                AppError::conflict(anyhow::anyhow!(self.to_string()))
            }
            AuthError::ClassroomNotFound => AppError::validation(vec![
                "classroomId does not reference an existing classroom".to_string(),
            ]),
            AuthError::Validation(details) => AppError::validation(details),
            AuthError::InvalidCredentials => AppError::unauthorized(INVALID_CREDENTIALS),
            AuthError::InvalidToken(_) | AuthError::UserNotFound => {
                AppError::unauthorized(INVALID_TOKEN)
            }
            AuthError::AccountNotFound => {
                AppError::not_found(anyhow::anyhow!("Account not found"))
            }
            AuthError::Internal(err) => err,
        }
    }
}
