use rollcall_auth::TokenCodec;
use rollcall_core::{AppError, SecretHasher};
use rollcall_models::{
    Account, ClassroomId, Email, IdentityId, NewAccount, Principal, Profile, RegisterRequest, Role,
    StudentProfile, TeacherProfile,
};
use rollcall_observability::{
    track_login_failure, track_login_success, track_registration, track_token_issued,
};
use tracing::{info, instrument};
use validator::Validate;

use crate::store::CredentialStore;
use crate::validator::validation_details;

use super::error::AuthError;
use super::validators::{PasswordCredentials, PasswordValidator, Validator};

/// A freshly provisioned account and the token issued for it.
#[derive(Debug)]
pub struct Registration {
    pub account: Account,
    pub token: String,
}

/// A successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub principal: Principal,
    pub token: String,
}

/// Issues a token for `principal`. Earlier tokens are left untouched.
pub fn issue_token(codec: &TokenCodec, principal: &Principal) -> Result<String, AuthError> {
    let token = codec.issue(principal.id, &principal.email, principal.role)?;
    track_token_issued();
    Ok(token)
}

/// Creates identities together with their role profile.
#[derive(Clone, Copy)]
pub struct AccountProvisioner<'a> {
    store: &'a dyn CredentialStore,
    hasher: SecretHasher,
    codec: &'a TokenCodec,
}

impl<'a> AccountProvisioner<'a> {
    pub fn new(store: &'a dyn CredentialStore, hasher: SecretHasher, codec: &'a TokenCodec) -> Self {
        Self {
            store,
            hasher,
            codec,
        }
    }

    /// Registers an account and issues its first token.
    ///
    /// Preconditions are checked in order and each one aborts before
    /// anything is written: email free, then (for students) studentCode and
    /// classroomId present, studentCode free, classroom exists. A unique or
    /// foreign-key violation raised by the store on a lost race maps to the
    /// same error as the corresponding pre-check.
    #[instrument(skip(self, request), fields(role = %request.role))]
    pub async fn register(&self, request: RegisterRequest) -> Result<Registration, AuthError> {
        request
            .validate()
            .map_err(|errors| AuthError::Validation(validation_details(&errors)))?;

        let email = Email::new(&request.email)
            .map_err(|e| AuthError::Validation(vec![e.to_string()]))?;

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let profile = self.prepare_profile(&request).await?;
        let role = request.role;

        let password_hash = self.hasher.hash_blocking(request.password).await?;

        let new_account = NewAccount::new(email, password_hash, role, profile)
            .map_err(|e| AuthError::Internal(AppError::internal(e)))?;

        let account = self.store.create_identity_with_profile(new_account).await?;
        let principal = Principal::from(account.clone());
        let token = issue_token(self.codec, &principal)?;

        track_registration(role.as_str());
        info!(identity_id = %account.identity.id, "Account registered");

        Ok(Registration { account, token })
    }

    async fn prepare_profile(
        &self,
        request: &RegisterRequest,
    ) -> Result<Option<Profile>, AuthError> {
        let full_name = request.full_name.trim().to_string();

        match request.role {
            Role::Admin => Ok(None),
            Role::Teacher => Ok(Some(Profile::Teacher(TeacherProfile { full_name }))),
            Role::Student => {
                let (student_code, classroom_id) = require_student_fields(request)?;

                if self.store.find_by_student_code(student_code).await?.is_some() {
                    return Err(AuthError::CodeTaken);
                }
                if self
                    .store
                    .find_classroom_by_id(classroom_id)
                    .await?
                    .is_none()
                {
                    return Err(AuthError::ClassroomNotFound);
                }

                Ok(Some(Profile::Student(StudentProfile {
                    student_code: student_code.to_string(),
                    full_name,
                    classroom_id,
                })))
            }
        }
    }

    /// Deletes an identity and its profile. Tokens already issued to it stop
    /// resolving on their next use.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: IdentityId) -> Result<(), AuthError> {
        if !self.store.delete_identity_cascading_profile(id).await? {
            return Err(AuthError::AccountNotFound);
        }

        info!(identity_id = %id, "Account deleted");
        Ok(())
    }
}

/// Both student fields, or a validation error naming every missing one.
fn require_student_fields(request: &RegisterRequest) -> Result<(&str, ClassroomId), AuthError> {
    let student_code = request
        .student_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty());

    match (student_code, request.classroom_id) {
        (Some(code), Some(classroom_id)) => Ok((code, classroom_id)),
        (code, classroom_id) => {
            let mut missing = Vec::new();
            if code.is_none() {
                missing.push("studentCode is required for STUDENT accounts".to_string());
            }
            if classroom_id.is_none() {
                missing.push("classroomId is required for STUDENT accounts".to_string());
            }
            Err(AuthError::Validation(missing))
        }
    }
}

/// Checks email and password against the store.
#[derive(Clone, Copy)]
pub struct Authenticator<'a> {
    store: &'a dyn CredentialStore,
    hasher: SecretHasher,
    codec: &'a TokenCodec,
}

impl<'a> Authenticator<'a> {
    pub fn new(store: &'a dyn CredentialStore, hasher: SecretHasher, codec: &'a TokenCodec) -> Self {
        Self {
            store,
            hasher,
            codec,
        }
    }

    /// Unknown email and wrong password fail identically.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: String) -> Result<Account, AuthError> {
        let Ok(email) = Email::new(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let matches = self
            .hasher
            .verify_blocking(password, account.identity.password_hash.clone())
            .await?;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Authenticates through the password strategy and issues a token.
    pub async fn login(&self, credentials: PasswordCredentials) -> Result<LoginOutcome, AuthError> {
        let principal = match PasswordValidator::new(*self).validate(credentials).await {
            Ok(principal) => principal,
            Err(err) => {
                track_login_failure(err.reason());
                return Err(err);
            }
        };
        let token = issue_token(self.codec, &principal)?;

        track_login_success(principal.role.as_str());
        info!(identity_id = %principal.id, "Login succeeded");
        Ok(LoginOutcome { principal, token })
    }
}
