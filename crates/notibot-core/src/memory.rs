//! In-memory repositories backing the core tests.
//!
//! Failure switches let tests drive every error branch of the linker and
//! resolver without a network.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{BindCode, ExternalIdentity, LinkedUser, UserAccount, UserId},
    errors::{StoreError, StoreResult},
    ports::{BindCodeRepository, UserRepository},
};

/// Which store operations should fail on the next calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailurePlan {
    pub find_code: bool,
    pub delete_code: bool,
    pub update_user: bool,
    pub find_name: bool,
    pub find_by_identity: bool,
}

#[derive(Default)]
pub struct InMemoryStore {
    // Rows, not a map: an old expired row may share its string with a new code.
    codes: Mutex<Vec<BindCode>>,
    users: Mutex<HashMap<UserId, UserAccount>>,
    failures: Mutex<FailurePlan>,
}

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn injected(op: &str) -> StoreError {
    StoreError::Unavailable(format!("injected failure: {op}"))
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_code(&self, code: BindCode) {
        locked(&self.codes).push(code);
    }

    pub fn insert_user(&self, user: UserAccount) {
        locked(&self.users).insert(user.id.clone(), user);
    }

    pub fn has_code(&self, code: &str) -> bool {
        locked(&self.codes).iter().any(|c| c.code == code)
    }

    pub fn user(&self, id: &UserId) -> Option<UserAccount> {
        locked(&self.users).get(id).cloned()
    }

    pub fn set_failures(&self, plan: FailurePlan) {
        *locked(&self.failures) = plan;
    }

    fn failures(&self) -> FailurePlan {
        *locked(&self.failures)
    }
}

#[async_trait]
impl BindCodeRepository for InMemoryStore {
    async fn find_valid_bind_code(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<BindCode>> {
        if self.failures().find_code {
            return Err(injected("find_valid_bind_code"));
        }
        Ok(locked(&self.codes)
            .iter()
            .find(|c| c.code == code && c.expires_at > now)
            .cloned())
    }

    async fn delete_bind_code(&self, code: &str) -> StoreResult<()> {
        if self.failures().delete_code {
            return Err(injected("delete_bind_code"));
        }
        locked(&self.codes).retain(|c| c.code != code);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn update_user_external_id(
        &self,
        user_id: &UserId,
        identity: &ExternalIdentity,
    ) -> StoreResult<()> {
        if self.failures().update_user {
            return Err(injected("update_user_external_id"));
        }
        let mut users = locked(&self.users);
        let Some(user) = users.get_mut(user_id) else {
            return Err(StoreError::NotFound(format!("user {user_id}")));
        };
        user.external_chat_id = Some(identity.clone());
        Ok(())
    }

    async fn find_user_name(&self, user_id: &UserId) -> StoreResult<Option<String>> {
        if self.failures().find_name {
            return Err(injected("find_user_name"));
        }
        Ok(locked(&self.users).get(user_id).map(|u| u.name.clone()))
    }

    async fn find_user_by_external_id(
        &self,
        identity: &ExternalIdentity,
    ) -> StoreResult<Option<LinkedUser>> {
        if self.failures().find_by_identity {
            return Err(injected("find_user_by_external_id"));
        }
        let users = locked(&self.users);
        Ok(users
            .values()
            .find(|u| u.external_chat_id.as_ref() == Some(identity))
            .map(|u| LinkedUser {
                name: Some(u.name.clone()),
                external_chat_id: identity.clone(),
            }))
    }
}
