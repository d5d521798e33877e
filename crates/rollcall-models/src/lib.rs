//! # Rollcall Models
//!
//! Domain models and DTOs for the identity and access subsystem.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed UUID newtypes
//! - [`value_types`]: Validated primitives such as [`Email`]
//! - [`identity`]: Accounts and the closed [`Role`] set
//! - [`profile`]: Student and teacher profiles, plus [`NewAccount`]
//! - [`principal`]: The resolved caller attached to authenticated requests
//! - [`classroom`]: The classroom reference a student profile points at
//! - [`auth`]: Request and response bodies of the credential endpoints
//!
//! # Example
//!
//! ```ignore
//! use rollcall_models::{Email, NewAccount, Role};
//!
//! let email: Email = "Admin@University.edu".parse()?;
//! let account = NewAccount::new(email, hash, Role::Admin, None)?;
//! ```

pub mod auth;
pub mod classroom;
pub mod identity;
pub mod ids;
pub mod principal;
pub mod profile;
pub mod value_types;

pub use auth::{AuthResponse, LoginRequest, ProbeResponse, RegisterRequest, TokenResponse};
pub use classroom::Classroom;
pub use identity::{Account, Identity, Role, UnknownRole};
pub use ids::{ClassroomId, IdentityId};
pub use principal::Principal;
pub use profile::{NewAccount, Profile, ProfileMismatch, StudentProfile, TeacherProfile};
pub use value_types::{Email, ValueTypeError};
