//! The resolved identity attached to an authenticated request.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::identity::{Account, Role};
use crate::ids::IdentityId;
use crate::profile::Profile;
use crate::value_types::Email;

/// Who is making the request, as loaded from the store after the token
/// was validated. Role and email come from the store, not the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: IdentityId,
    pub email: Email,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

impl From<Account> for Principal {
    fn from(account: Account) -> Self {
        Self {
            id: account.identity.id,
            email: account.identity.email,
            role: account.identity.role,
            profile: account.profile,
        }
    }
}
