use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::{UserMutation, UserRepository};
use crate::domain::{normalize_email, DomainError, User};

pub struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn put(store: &mut HashMap<String, User>, user: User) -> Result<(), DomainError> {
        let taken = store
            .values()
            .any(|other| other.email() == user.email() && other.id() != user.id());
        if taken {
            return Err(DomainError::already_exists(format!(
                "A user with email {} already exists",
                user.email()
            )));
        }
        store.insert(user.id().to_string(), user);
        Ok(())
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let mut store = self.users.lock().await;
        Self::put(&mut store, user.clone())
    }

    async fn modify(&self, id: &str, change: UserMutation) -> Result<Option<User>, DomainError> {
        let mut store = self.users.lock().await;
        let mut user = match store.get(id) {
            Some(user) => user.clone(),
            None => return Ok(None),
        };
        change(&mut user);
        Self::put(&mut store, user.clone())?;
        Ok(Some(user))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        let store = self.users.lock().await;
        Ok(store.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = normalize_email(email);
        let store = self.users.lock().await;
        Ok(store.values().find(|u| u.email() == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let store = self.users.lock().await;
        let mut users: Vec<User> = store.values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(users)
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut store = self.users.lock().await;
        Ok(store.remove(id).is_some())
    }
}
