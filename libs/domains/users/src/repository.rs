use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence.
///
/// The storage layer is the authoritative guard for phone-number
/// uniqueness: `create` must reject a duplicate phone even when the
/// caller already checked, since check-then-act is racy.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user, enforcing phone-number uniqueness.
    async fn create(&self, user: User) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Get a user by phone number
    async fn get_by_phone(&self, phone_number: &str) -> UserResult<Option<User>>;

    /// List all users in creation order
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Update an existing user
    async fn update(&self, user: User) -> UserResult<User>;

    /// Check if a phone number is already registered
    async fn phone_exists(&self, phone_number: &str) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
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
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        // Uniqueness check and insert under one write lock, the
        // in-memory analogue of a unique index
        let phone_exists = users
            .values()
            .any(|u| u.phone_number == user.phone_number);

        if phone_exists {
            return Err(UserError::AlreadyExists(user.phone_number));
        }

        users.insert(user.user_id, user.clone());

        tracing::info!(user_id = %user.user_id, phone = %user.phone_number, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_phone(&self, phone_number: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        let user = users
            .values()
            .find(|u| u.phone_number == phone_number)
            .cloned();
        Ok(user)
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().cloned().collect();

        // Creation order (v7 ids are time-ordered, but created_at is
        // the documented contract)
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(result)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.user_id) {
            return Err(UserError::NotFound(user.user_id));
        }

        users.insert(user.user_id, user.clone());

        tracing::info!(user_id = %user.user_id, stage = %user.signup_stage, "Updated user");
        Ok(user)
    }

    async fn phone_exists(&self, phone_number: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        let exists = users.values().any(|u| u.phone_number == phone_number);
        Ok(exists)
    }
}
