//! In-process credential store for tests.
//!
//! A single mutex stands in for the database's unique constraints and
//! transactions: every write checks and mutates under one lock, so two
//! concurrent registrations with the same email still produce exactly one
//! account.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use rollcall_models::{
    Account, Classroom, ClassroomId, Email, Identity, IdentityId, NewAccount, Profile,
};

use super::{CredentialStore, StoreError, UniqueKey};

#[derive(Default)]
struct State {
    accounts: HashMap<IdentityId, Account>,
    classrooms: HashMap<ClassroomId, Classroom>,
}

#[derive(Default)]
pub struct InMemoryCredentialStore {
    state: Mutex<State>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a classroom so student profiles can reference it.
    pub fn add_classroom(&self, name: &str) -> ClassroomId {
        let classroom = Classroom {
            id: ClassroomId::new(),
            name: name.to_string(),
        };
        let id = classroom.id;
        if let Ok(mut state) = self.state.lock() {
            state.classrooms.insert(id, classroom);
        }
        id
    }

    /// Removes a classroom, as the classroom module would.
    pub fn remove_classroom(&self, id: ClassroomId) {
        if let Ok(mut state) = self.state.lock() {
            state.classrooms.remove(&id);
        }
    }

    pub fn account_count(&self) -> usize {
        self.state.lock().map(|s| s.accounts.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("credential store lock poisoned")))
    }
}

fn student_code(account: &Account) -> Option<&str> {
    match &account.profile {
        Some(Profile::Student(p)) => Some(p.student_code.as_str()),
        _ => None,
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .accounts
            .values()
            .find(|a| &a.identity.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Account>, StoreError> {
        Ok(self.lock()?.accounts.get(&id).cloned())
    }

    async fn find_by_student_code(
        &self,
        code: &str,
    ) -> Result<Option<IdentityId>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .accounts
            .values()
            .find(|a| student_code(a) == Some(code))
            .map(|a| a.identity.id))
    }

    async fn find_classroom_by_id(
        &self,
        id: ClassroomId,
    ) -> Result<Option<Classroom>, StoreError> {
        Ok(self.lock()?.classrooms.get(&id).cloned())
    }

    async fn create_identity_with_profile(
        &self,
        account: NewAccount,
    ) -> Result<Account, StoreError> {
        let mut state = self.lock()?;

        if state
            .accounts
            .values()
            .any(|a| &a.identity.email == account.email())
        {
            return Err(StoreError::UniqueViolation(UniqueKey::Email));
        }

        if let Some(Profile::Student(student)) = account.profile() {
            if state
                .accounts
                .values()
                .any(|a| student_code(a) == Some(student.student_code.as_str()))
            {
                return Err(StoreError::UniqueViolation(UniqueKey::StudentCode));
            }
            if !state.classrooms.contains_key(&student.classroom_id) {
                return Err(StoreError::ClassroomMissing);
            }
        }

        let now = Utc::now();
        let created = Account {
            identity: Identity {
                id: IdentityId::new(),
                email: account.email().clone(),
                password_hash: account.password_hash().to_string(),
                role: account.role(),
                created_at: now,
                updated_at: now,
            },
            profile: account.profile().cloned(),
        };

        state.accounts.insert(created.identity.id, created.clone());
        Ok(created)
    }

    async fn delete_identity_cascading_profile(
        &self,
        id: IdentityId,
    ) -> Result<bool, StoreError> {
        Ok(self.lock()?.accounts.remove(&id).is_some())
    }
}
