use rollcall_auth::TokenCodec;
use rollcall_models::Principal;
use tracing::{debug, instrument};

use crate::store::CredentialStore;

use super::error::AuthError;

/// Turns a bearer token into the [`Principal`] it names.
///
/// The token only proves who the caller was at issue time. The identity is
/// re-read on every call so a deleted account stops resolving immediately
/// and a changed role takes effect without reissuing tokens.
#[derive(Clone, Copy)]
pub struct ClaimResolver<'a> {
    store: &'a dyn CredentialStore,
    codec: &'a TokenCodec,
}

impl<'a> ClaimResolver<'a> {
    pub fn new(store: &'a dyn CredentialStore, codec: &'a TokenCodec) -> Self {
        Self { store, codec }
    }

    #[instrument(skip_all)]
    pub async fn resolve(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.codec.validate(token)?;
        let subject = claims.subject_id()?;

        let account = self
            .store
            .find_by_id(subject)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        debug!(identity_id = %subject, "Token resolved");
        Ok(Principal::from(account))
    }
}
