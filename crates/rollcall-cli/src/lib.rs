//! # Rollcall CLI
//!
//! Bootstrapping commands that run outside the HTTP API.
//!
//! The first ADMIN account is created here, through the same provisioner the
//! register endpoint uses, so the password policy and uniqueness checks are
//! identical.
//!
//! ```ignore
//! use rollcall_cli::create_admin;
//!
//! let store = PgCredentialStore::new(pool);
//! let account = create_admin(&store, &auth_config, "root@uni.edu", "Root", password).await?;
//! ```

use anyhow::anyhow;
use rollcall::modules::auth::{AccountProvisioner, AuthError};
use rollcall::rollcall_auth::TokenCodec;
use rollcall::rollcall_core::SecretHasher;
use rollcall::store::CredentialStore;
use rollcall_config::AuthConfig;
use rollcall_models::{Account, ClassroomId, RegisterRequest, Role};
use sqlx::PgPool;

fn describe(err: AuthError) -> anyhow::Error {
    match err {
        AuthError::Validation(details) => anyhow!("{}", details.join("; ")),
        other => anyhow!("{}", other),
    }
}

/// Provisions an ADMIN account.
pub async fn create_admin(
    store: &dyn CredentialStore,
    auth_config: &AuthConfig,
    email: &str,
    full_name: &str,
    password: &str,
) -> anyhow::Result<Account> {
    let codec = TokenCodec::new(auth_config);
    let provisioner =
        AccountProvisioner::new(store, SecretHasher::new(auth_config.hash_cost), &codec);

    let request = RegisterRequest {
        email: email.to_string(),
        password: password.to_string(),
        role: Role::Admin,
        full_name: full_name.to_string(),
        student_code: None,
        classroom_id: None,
    };

    let registration = provisioner.register(request).await.map_err(describe)?;
    Ok(registration.account)
}

/// Inserts a classroom so students can register against it.
pub async fn create_classroom(pool: &PgPool, name: &str) -> anyhow::Result<ClassroomId> {
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("classroom name cannot be empty"));
    }

    let id = sqlx::query_scalar::<_, ClassroomId>(
        "INSERT INTO classrooms (name) VALUES ($1) RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall::store::InMemoryCredentialStore;

    fn auth_config() -> AuthConfig {
        AuthConfig::new("test-secret-key-at-least-32-characters-long", 3600, 4).unwrap()
    }

    #[tokio::test]
    async fn test_create_admin() {
        let store = InMemoryCredentialStore::new();

        let account = create_admin(&store, &auth_config(), "Root@Uni.edu", "Root", "admin-pass-1")
            .await
            .unwrap();

        assert_eq!(account.identity.role, Role::Admin);
        assert_eq!(account.identity.email, "root@uni.edu");
        assert!(account.profile.is_none());
    }

    #[tokio::test]
    async fn test_create_admin_reports_policy_violations() {
        let store = InMemoryCredentialStore::new();

        let err = create_admin(&store, &auth_config(), "root@uni.edu", "Root", "short")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("password must contain a digit"));
        assert_eq!(store.account_count(), 0);
    }

    #[tokio::test]
    async fn test_create_admin_twice_conflicts() {
        let store = InMemoryCredentialStore::new();
        let config = auth_config();

        create_admin(&store, &config, "root@uni.edu", "Root", "admin-pass-1")
            .await
            .unwrap();
        let err = create_admin(&store, &config, "root@uni.edu", "Root", "admin-pass-1")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Email already registered");
    }
}
