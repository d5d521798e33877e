//! Identity (account) models and the closed [`Role`] set.
//!
//! An [`Identity`] carries the password hash and therefore never implements
//! `Serialize`; everything that leaves the process goes through
//! [`Principal`](crate::principal::Principal).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::IdentityId;
use crate::profile::Profile;
use crate::value_types::Email;

/// Account role. Stored as the Postgres enum `user_role`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Teacher => "TEACHER",
            Role::Admin => "ADMIN",
        }
    }

    /// Whether accounts with this role own exactly one profile.
    pub fn requires_profile(&self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}', expected one of STUDENT, TEACHER, ADMIN")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STUDENT" => Ok(Role::Student),
            "TEACHER" => Ok(Role::Teacher),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// An account as stored, including its password hash.
#[derive(FromRow, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// An identity together with its role-specific profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub identity: Identity,
    pub profile: Option<Profile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::Principal;
    use crate::profile::TeacherProfile;

    fn account() -> Account {
        let now = Utc::now();
        Account {
            identity: Identity {
                id: IdentityId::new(),
                email: Email::new("teacher@university.edu").unwrap(),
                password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
                role: Role::Teacher,
                created_at: now,
                updated_at: now,
            },
            profile: Some(Profile::Teacher(TeacherProfile {
                full_name: "Grace Hopper".to_string(),
            })),
        }
    }

    #[test]
    fn test_role_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"STUDENT\"");
        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert!(serde_json::from_str::<Role>("\"student\"").is_err());
    }

    #[test]
    fn test_role_from_str_is_case_insensitive() {
        assert_eq!("teacher".parse::<Role>().unwrap(), Role::Teacher);
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn test_requires_profile() {
        assert!(Role::Student.requires_profile());
        assert!(Role::Teacher.requires_profile());
        assert!(!Role::Admin.requires_profile());
    }

    #[test]
    fn test_principal_view_never_contains_hash() {
        let json = serde_json::to_string(&Principal::from(account())).unwrap();

        assert!(!json.contains("password"));
        assert!(!json.contains("$2b$"));
        assert!(json.contains("\"role\":\"TEACHER\""));
        assert!(json.contains("\"fullName\":\"Grace Hopper\""));
    }

    #[test]
    fn test_identity_debug_omits_hash() {
        let debug = format!("{:?}", account().identity);
        assert!(!debug.contains("$2b$"));
    }
}
