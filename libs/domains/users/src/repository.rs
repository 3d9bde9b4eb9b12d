use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence.
///
/// Email lookups are case-insensitive. Implementations must apply each write
/// atomically: a failed operation leaves the store unchanged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Get a user by email (case-insensitive)
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// List all users, ordered by creation time ascending
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Insert a new user; fails if the ID is already present
    async fn insert(&self, user: User) -> UserResult<User>;

    /// Replace an existing user; fails if the ID is not present
    async fn update(&self, user: User) -> UserResult<User>;

    /// Delete a user by ID, reporting whether it existed
    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    /// Check if a user with the given ID exists
    async fn exists(&self, id: Uuid) -> UserResult<bool>;

    /// Check if a user with the given email exists (case-insensitive)
    async fn exists_by_email(&self, email: &str) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing).
///
/// Writes hold the lock for the whole check-then-mutate sequence and contain
/// no await points, so no operation can observe a partially applied write.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Readiness probe: the store is healthy if the lock is reachable
    pub async fn health_check(&self) -> UserResult<()> {
        let _ = self.users.read().await.len();
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        let needle = email.to_lowercase();
        Ok(users
            .values()
            .find(|u| u.email.to_lowercase() == needle)
            .cloned())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().cloned().collect();
        // Stable order even when two users share a creation timestamp
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(result)
    }

    async fn insert(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Err(UserError::AlreadyExists(user.id));
        }

        users.insert(user.id, user.clone());

        tracing::debug!(user_id = %user.id, "Inserted user");
        Ok(user)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        match users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user.clone();
                tracing::debug!(user_id = %user.id, "Updated user");
                Ok(user)
            }
            None => Err(UserError::NotFound(user.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;
        let removed = users.remove(&id).is_some();

        if removed {
            tracing::debug!(user_id = %id, "Deleted user");
        }
        Ok(removed)
    }

    async fn exists(&self, id: Uuid) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.contains_key(&id))
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        let needle = email.to_lowercase();
        Ok(users.values().any(|u| u.email.to_lowercase() == needle))
    }
}
