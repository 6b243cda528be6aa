use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::users::{
    repo::{StoreError, UserStore},
    repo_types::UserRecord,
};

/// Process-local store for `USER_STORE=memory` and tests. Same uniqueness and
/// versioning rules as the Postgres store; data is lost on restart.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(StoreError::Duplicate(email.to_string()));
        }
        let user = UserRecord::new(email, password_hash);
        users.insert(email.to_string(), user.clone());
        Ok(user)
    }

    async fn save_jobs(&self, user: &UserRecord) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(&user.email)
            .filter(|stored| stored.version == user.version)
            .ok_or_else(|| StoreError::Conflict(user.email.clone()))?;
        stored.jobs = user.jobs.clone();
        stored.version += 1;
        Ok(stored.clone())
    }
}
