//! Credential strategies.
//!
//! A route never falls back from one strategy to another: login uses
//! [`PasswordValidator`], guarded routes use [`TokenValidator`].

use std::fmt;

use async_trait::async_trait;
use rollcall_models::Principal;

use super::error::AuthError;
use super::resolver::ClaimResolver;
use super::service::Authenticator;

#[async_trait]
pub trait Validator: Send + Sync {
    type Credentials: Send;

    async fn validate(&self, credentials: Self::Credentials) -> Result<Principal, AuthError>;
}

pub struct PasswordCredentials {
    pub email: String,
    pub password: String,
}

impl PasswordCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A raw bearer token, without the `Bearer ` prefix.
#[derive(Clone)]
pub struct BearerToken(pub String);

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

pub struct PasswordValidator<'a> {
    authenticator: Authenticator<'a>,
}

impl<'a> PasswordValidator<'a> {
    pub fn new(authenticator: Authenticator<'a>) -> Self {
        Self { authenticator }
    }
}

#[async_trait]
impl Validator for PasswordValidator<'_> {
    type Credentials = PasswordCredentials;

    async fn validate(&self, credentials: PasswordCredentials) -> Result<Principal, AuthError> {
        let account = self
            .authenticator
            .authenticate(&credentials.email, credentials.password)
            .await?;
        Ok(Principal::from(account))
    }
}

pub struct TokenValidator<'a> {
    resolver: ClaimResolver<'a>,
}

impl<'a> TokenValidator<'a> {
    pub fn new(resolver: ClaimResolver<'a>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Validator for TokenValidator<'_> {
    type Credentials = BearerToken;

    async fn validate(&self, credentials: BearerToken) -> Result<Principal, AuthError> {
        self.resolver.resolve(&credentials.0).await
    }
}
