//! Role-specific profile data owned by an identity.
//!
//! STUDENT and TEACHER identities own exactly one profile of the matching
//! variant; ADMIN identities own none. [`NewAccount`] enforces that pairing
//! before anything reaches the store.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::identity::Role;
use crate::ids::ClassroomId;
use crate::value_types::Email;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub student_code: String,
    pub full_name: String,
    pub classroom_id: ClassroomId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Profile {
    Student(StudentProfile),
    Teacher(TeacherProfile),
}

impl Profile {
    /// The only role this profile variant may belong to.
    pub fn role(&self) -> Role {
        match self {
            Profile::Student(_) => Role::Student,
            Profile::Teacher(_) => Role::Teacher,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileMismatch {
    #[error("{0} accounts require a profile")]
    Missing(Role),
    #[error("{role} accounts cannot own a {profile} profile")]
    WrongVariant { role: Role, profile: Role },
}

/// Everything needed to create an identity and its profile in one unit.
///
/// The password is already hashed when this value exists.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    email: Email,
    password_hash: String,
    role: Role,
    profile: Option<Profile>,
}

impl NewAccount {
    pub fn new(
        email: Email,
        password_hash: String,
        role: Role,
        profile: Option<Profile>,
    ) -> Result<Self, ProfileMismatch> {
        match (&profile, role.requires_profile()) {
            (None, true) => return Err(ProfileMismatch::Missing(role)),
            (Some(p), _) if p.role() != role => {
                return Err(ProfileMismatch::WrongVariant {
                    role,
                    profile: p.role(),
                });
            }
            _ => {}
        }

        Ok(Self {
            email,
            password_hash,
            role,
            profile,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}
