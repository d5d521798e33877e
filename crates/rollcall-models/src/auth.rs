//! Request and response bodies for the credential endpoints.
//!
//! Every body is camelCase on the wire. Request types implement
//! [`Validate`] so the `ValidatedJson` extractor can reject them before a
//! handler runs; [`RegisterRequest`] reports every broken password rule at
//! once rather than the first one.

use std::borrow::Cow;
use std::fmt;

use rollcall_core::password_policy_violations;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::identity::Role;
use crate::ids::{ClassroomId, IdentityId};
use crate::principal::Principal;

use crate::value_types::MAX_EMAIL_CHARS;

pub const MAX_FULL_NAME_CHARS: usize = 150;
pub const MAX_STUDENT_CODE_CHARS: usize = 32;

fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Self-registration body.
///
/// `studentCode` and `classroomId` are only meaningful for STUDENT
/// registrations; whether they are present is checked by the provisioner,
/// which owns the ordering of registration preconditions.
#[derive(Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@university.edu")]
    pub email: String,
    #[schema(example = "correct-horse-9")]
    pub password: String,
    pub role: Role,
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    #[serde(default)]
    #[schema(example = "S-2024-0001")]
    pub student_code: Option<String>,
    #[serde(default)]
    pub classroom_id: Option<ClassroomId>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("full_name", &self.full_name)
            .field("student_code", &self.student_code)
            .field("classroom_id", &self.classroom_id)
            .finish_non_exhaustive()
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = self.email.trim();
        if !email.validate_email() {
            errors.add(
                "email",
                field_error("email", "email must be a valid email address"),
            );
        } else if email.chars().count() > MAX_EMAIL_CHARS {
            errors.add(
                "email",
                field_error(
                    "length",
                    format!("email must be at most {MAX_EMAIL_CHARS} characters"),
                ),
            );
        }

        for violation in password_policy_violations(&self.password) {
            errors.add("password", field_error("password_policy", violation));
        }

        let name = self.full_name.trim();
        let name_chars = name.chars().count();
        if name_chars == 0 {
            errors.add("fullName", field_error("length", "fullName is required"));
        } else if name_chars > MAX_FULL_NAME_CHARS {
            errors.add(
                "fullName",
                field_error(
                    "length",
                    format!("fullName must be at most {MAX_FULL_NAME_CHARS} characters"),
                ),
            );
        } else if name.contains('\0') {
            errors.add(
                "fullName",
                field_error("characters", "fullName must not contain NUL characters"),
            );
        }

        // Student fields are ignored for other roles.
        if let (Role::Student, Some(code)) = (self.role, &self.student_code) {
            let code = code.trim();
            let code_chars = code.chars().count();
            if code_chars == 0 || code_chars > MAX_STUDENT_CODE_CHARS {
                errors.add(
                    "studentCode",
                    field_error(
                        "length",
                        format!("studentCode must be 1 to {MAX_STUDENT_CODE_CHARS} characters"),
                    ),
                );
            } else if code.contains('\0') {
                errors.add(
                    "studentCode",
                    field_error("characters", "studentCode must not contain NUL characters"),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Login request with email and password.
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "ada@university.edu")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "correct-horse-9")]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: Principal,
}

/// Returned by refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Body of the role-gated probe endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResponse {
    pub message: String,
    pub principal_id: IdentityId,
    pub role: Role,
}
