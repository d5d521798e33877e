pub mod controller;
pub mod error;
pub mod resolver;
pub mod router;
pub mod service;
pub mod validators;

pub use error::AuthError;
pub use resolver::ClaimResolver;
pub use service::{AccountProvisioner, Authenticator, LoginOutcome, Registration};
pub use validators::{BearerToken, PasswordCredentials, PasswordValidator, TokenValidator, Validator};
