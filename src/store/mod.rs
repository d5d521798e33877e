//! Credential store port.
//!
//! Services only see [`CredentialStore`]. Uniqueness of email and student
//! code, and the all-or-nothing creation and deletion of an identity with its
//! profile, are the store's responsibility.
//!
//! - [`postgres`]: the production adapter over a `PgPool`
//! - [`memory`]: a mutex-guarded adapter for tests (`test-utils` feature)

use async_trait::async_trait;

use rollcall_models::{Account, Classroom, ClassroomId, Email, IdentityId, NewAccount};

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryCredentialStore;
pub use postgres::PgCredentialStore;

/// Which unique key a write collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    Email,
    StudentCode,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated on {0:?}")]
    UniqueViolation(UniqueKey),

    #[error("referenced classroom does not exist")]
    ClassroomMissing,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Account>, StoreError>;

    /// The identity owning `student_code`, if any.
    async fn find_by_student_code(
        &self,
        student_code: &str,
    ) -> Result<Option<IdentityId>, StoreError>;

    async fn find_classroom_by_id(&self, id: ClassroomId)
    -> Result<Option<Classroom>, StoreError>;

    /// Inserts the identity and its profile in one transaction.
    async fn create_identity_with_profile(
        &self,
        account: NewAccount,
    ) -> Result<Account, StoreError>;

    /// Removes the profile and then the identity in one transaction.
    /// Returns `false` when no identity had that id.
    async fn delete_identity_cascading_profile(&self, id: IdentityId)
    -> Result<bool, StoreError>;
}
