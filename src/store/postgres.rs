use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use rollcall_models::{
    Account, Classroom, ClassroomId, Email, Identity, IdentityId, NewAccount, Profile, Role,
    StudentProfile, TeacherProfile,
};

use super::{CredentialStore, StoreError, UniqueKey};

const EMAIL_UNIQUE: &str = "identities_email_key";
const STUDENT_CODE_UNIQUE: &str = "student_profiles_student_code_key";
const CLASSROOM_FK: &str = "student_profiles_classroom_id_fkey";

const ACCOUNT_SELECT: &str = r#"
    SELECT i.id, i.email, i.password_hash, i.role, i.created_at, i.updated_at,
           sp.student_code, sp.full_name AS student_full_name, sp.classroom_id,
           tp.full_name AS teacher_full_name
    FROM identities i
    LEFT JOIN student_profiles sp ON sp.identity_id = i.id
    LEFT JOIN teacher_profiles tp ON tp.identity_id = i.id
"#;

#[derive(FromRow)]
struct AccountRow {
    id: IdentityId,
    email: Email,
    password_hash: String,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    student_code: Option<String>,
    student_full_name: Option<String>,
    classroom_id: Option<ClassroomId>,
    teacher_full_name: Option<String>,
}

impl AccountRow {
    fn into_account(self) -> Account {
        let profile = match (self.role, self.student_code, self.classroom_id) {
            (Role::Student, Some(student_code), Some(classroom_id)) => {
                Some(Profile::Student(StudentProfile {
                    student_code,
                    full_name: self.student_full_name.unwrap_or_default(),
                    classroom_id,
                }))
            }
            (Role::Teacher, _, _) => self
                .teacher_full_name
                .map(|full_name| Profile::Teacher(TeacherProfile { full_name })),
            _ => None,
        };

        Account {
            identity: Identity {
                id: self.id,
                email: self.email,
                password_hash: self.password_hash,
                role: self.role,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            profile,
        }
    }
}

/// Maps constraint violations onto [`StoreError`]; anything else is a backend
/// failure.
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(EMAIL_UNIQUE) => return StoreError::UniqueViolation(UniqueKey::Email),
                Some(STUDENT_CODE_UNIQUE) => {
                    return StoreError::UniqueViolation(UniqueKey::StudentCode);
                }
                _ => {}
            }
        }
        if db_err.is_foreign_key_violation() && db_err.constraint() == Some(CLASSROOM_FK) {
            return StoreError::ClassroomMissing;
        }
    }
    StoreError::Backend(err.into())
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.into())
}

#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!("{ACCOUNT_SELECT} WHERE i.email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        Ok(row.map(AccountRow::into_account))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!("{ACCOUNT_SELECT} WHERE i.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        Ok(row.map(AccountRow::into_account))
    }

    #[instrument(skip(self))]
    async fn find_by_student_code(
        &self,
        student_code: &str,
    ) -> Result<Option<IdentityId>, StoreError> {
        sqlx::query_scalar::<_, IdentityId>(
            "SELECT identity_id FROM student_profiles WHERE student_code = $1",
        )
        .bind(student_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }

    #[instrument(skip(self))]
    async fn find_classroom_by_id(
        &self,
        id: ClassroomId,
    ) -> Result<Option<Classroom>, StoreError> {
        sqlx::query_as::<_, Classroom>("SELECT id, name FROM classrooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)
    }

    #[instrument(skip(self), fields(email = %account.email(), role = %account.role()))]
    async fn create_identity_with_profile(
        &self,
        account: NewAccount,
    ) -> Result<Account, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let identity = sqlx::query_as::<_, Identity>(
            "INSERT INTO identities (email, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING id, email, password_hash, role, created_at, updated_at",
        )
        .bind(account.email())
        .bind(account.password_hash())
        .bind(account.role())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        match account.profile() {
            Some(Profile::Student(student)) => {
                sqlx::query(
                    "INSERT INTO student_profiles (identity_id, student_code, full_name, classroom_id)
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(identity.id)
                .bind(&student.student_code)
                .bind(&student.full_name)
                .bind(student.classroom_id)
                .execute(&mut *tx)
                .await
                .map_err(map_write_error)?;
            }
            Some(Profile::Teacher(teacher)) => {
                sqlx::query("INSERT INTO teacher_profiles (identity_id, full_name) VALUES ($1, $2)")
                    .bind(identity.id)
                    .bind(&teacher.full_name)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_write_error)?;
            }
            None => {}
        }

        tx.commit().await.map_err(map_write_error)?;

        Ok(Account {
            identity,
            profile: account.profile().cloned(),
        })
    }

    #[instrument(skip(self))]
    async fn delete_identity_cascading_profile(
        &self,
        id: IdentityId,
    ) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        sqlx::query("DELETE FROM student_profiles WHERE identity_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        sqlx::query("DELETE FROM teacher_profiles WHERE identity_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        let deleted = sqlx::query("DELETE FROM identities WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(backend)?
            .rows_affected();

        tx.commit().await.map_err(backend)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::{AccountProvisioner, AuthError};
    use rollcall_auth::TokenCodec;
    use rollcall_config::AuthConfig;
    use rollcall_core::SecretHasher;
    use rollcall_models::RegisterRequest;

    async fn seed_classroom(pool: &PgPool) -> ClassroomId {
        sqlx::query_scalar::<_, ClassroomId>(
            "INSERT INTO classrooms (name) VALUES ('CS-101') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn student(email: &str, code: &str, classroom_id: ClassroomId) -> NewAccount {
        NewAccount::new(
            Email::new(email).unwrap(),
            "$2b$04$placeholderplaceholderplaceholderplaceholderpla".to_string(),
            Role::Student,
            Some(Profile::Student(StudentProfile {
                student_code: code.to_string(),
                full_name: "Ada Lovelace".to_string(),
                classroom_id,
            })),
        )
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_and_find_student(pool: PgPool) {
        let store = PgCredentialStore::new(pool.clone());
        let classroom_id = seed_classroom(&pool).await;

        let created = store
            .create_identity_with_profile(student("ada@uni.edu", "S-1", classroom_id))
            .await
            .unwrap();

        let found = store
            .find_by_email(&Email::new("ada@uni.edu").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, created);
        assert_eq!(
            store.find_by_student_code("S-1").await.unwrap(),
            Some(created.identity.id)
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_email_maps_to_unique_violation(pool: PgPool) {
        let store = PgCredentialStore::new(pool.clone());
        let classroom_id = seed_classroom(&pool).await;

        store
            .create_identity_with_profile(student("dup@uni.edu", "S-1", classroom_id))
            .await
            .unwrap();
        let err = store
            .create_identity_with_profile(student("dup@uni.edu", "S-2", classroom_id))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::UniqueViolation(UniqueKey::Email)));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_failed_profile_insert_rolls_back_identity(pool: PgPool) {
        let store = PgCredentialStore::new(pool.clone());

        let err = store
            .create_identity_with_profile(student("ghost@uni.edu", "S-9", ClassroomId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ClassroomMissing));

        let found = store
            .find_by_email(&Email::new("ghost@uni.edu").unwrap())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_removes_profile(pool: PgPool) {
        let store = PgCredentialStore::new(pool.clone());
        let classroom_id = seed_classroom(&pool).await;
        let created = store
            .create_identity_with_profile(student("gone@uni.edu", "S-3", classroom_id))
            .await
            .unwrap();

        assert!(
            store
                .delete_identity_cascading_profile(created.identity.id)
                .await
                .unwrap()
        );
        assert!(store.find_by_id(created.identity.id).await.unwrap().is_none());
        assert!(store.find_by_student_code("S-3").await.unwrap().is_none());
        assert!(
            !store
                .delete_identity_cascading_profile(created.identity.id)
                .await
                .unwrap()
        );
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(
            &AuthConfig::new("test-secret-key-at-least-32-characters-long", 3600, 4).unwrap(),
        )
    }

    fn teacher(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "correct-horse-9".to_string(),
            role: Role::Teacher,
            full_name: "Grace Hopper".to_string(),
            student_code: None,
            classroom_id: None,
        }
    }

    async fn identity_count(pool: &PgPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM identities")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_concurrent_registration_same_email(pool: PgPool) {
        let store = PgCredentialStore::new(pool.clone());
        let codec = codec();
        let provisioner = AccountProvisioner::new(&store, SecretHasher::new(4), &codec);

        let (first, second) = tokio::join!(
            provisioner.register(teacher("race@uni.edu")),
            provisioner.register(teacher("race@uni.edu")),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|r| matches!(r, Err(AuthError::EmailTaken)))
        );
        assert_eq!(identity_count(&pool).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_input_outside_column_limits_is_a_validation_error(pool: PgPool) {
        let store = PgCredentialStore::new(pool.clone());
        let codec = codec();
        let provisioner = AccountProvisioner::new(&store, SecretHasher::new(4), &codec);

        let domain = format!(
            "{}.{}.{}.{}.edu",
            "a".repeat(60),
            "b".repeat(60),
            "c".repeat(60),
            "d".repeat(59)
        );
        let long_email = format!("{}@{}", "x".repeat(64), domain);
        let mut nul_name = teacher("nul@uni.edu");
        nul_name.full_name = "Ada\u{0}Lovelace".to_string();

        for request in [teacher(&long_email), nul_name] {
            let err = provisioner.register(request).await.unwrap_err();
            assert!(matches!(err, AuthError::Validation(_)), "{err:?}");
        }
        assert_eq!(identity_count(&pool).await, 0);
    }
}
