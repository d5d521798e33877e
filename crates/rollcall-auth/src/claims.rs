//! Claims embedded in every bearer token.

use rollcall_models::{IdentityId, Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::codec::TokenError;

/// JWT claims for bearer tokens.
///
/// `email` and `role` describe the identity at issue time. They are kept for
/// clients that decode the token, but authorization always re-reads the
/// identity by `sub`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenClaims {
    /// Identity ID (subject claim)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Issued-at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// The subject as an identity id. A subject that is not a UUID cannot
    /// have been issued by us and is reported as malformed.
    pub fn subject_id(&self) -> Result<IdentityId, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims(sub: &str) -> TokenClaims {
        TokenClaims {
            sub: sub.to_string(),
            email: "ada@university.edu".to_string(),
            role: Role::Student,
            iat: 1_700_000_000,
            exp: 1_700_086_400,
        }
    }

    #[test]
    fn test_claims_serialize() {
        let serialized = serde_json::to_string(&claims("abc")).unwrap();
        assert!(serialized.contains(r#""sub":"abc""#));
        assert!(serialized.contains(r#""role":"STUDENT""#));
        assert!(serialized.contains(r#""exp":1700086400"#));
    }

    #[test]
    fn test_subject_id_parses_uuid() {
        let uuid = Uuid::new_v4();
        let id = claims(&uuid.to_string()).subject_id().unwrap();
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_non_uuid_subject_is_malformed() {
        assert_eq!(
            claims("admin").subject_id().unwrap_err(),
            TokenError::Malformed
        );
    }
}
