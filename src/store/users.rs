//! User storage
//!
//! Handles user records and the email uniqueness index.

use crate::auth::{hash_password, Role};
use crate::error::AppError;
use crate::models::{User, UserUpdate};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory user store
pub struct UserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    email_index: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            email_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a new user
    pub async fn create(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        // Check if email already exists
        if email_index.contains_key(&user.email) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        email_index.insert(user.email.clone(), user.id);
        users.insert(user.id, user.clone());

        Ok(user)
    }

    /// Find user by email (exact, case-sensitive)
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let users = self.users.read().await;
        let email_index = self.email_index.read().await;

        email_index.get(email).and_then(|id| users.get(id).cloned())
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Option<User> {
        let users = self.users.read().await;
        users.get(&id).cloned()
    }

    /// List users, newest first, optionally filtered by role
    pub async fn list(&self, role: Option<Role>, offset: usize, limit: usize) -> Vec<User> {
        let users = self.users.read().await;
        let mut matched: Vec<User> = users
            .values()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.into_iter().skip(offset).take(limit).collect()
    }

    /// Count users matching the role filter
    pub async fn count(&self, role: Option<Role>) -> u64 {
        let users = self.users.read().await;
        users
            .values()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .count() as u64
    }

    /// Update user, re-indexing the email when it changes
    pub async fn update(&self, id: Uuid, updates: UserUpdate) -> Result<User, AppError> {
        // Same lock order as create and delete
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        // Reject an email already owned by another user before mutating
        if let Some(new_email) = &updates.email {
            if email_index.get(new_email).is_some_and(|owner| *owner != id) {
                return Err(AppError::Conflict(
                    "User with this email already exists".to_string(),
                ));
            }
        }

        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(email) = updates.email {
            if email != user.email {
                email_index.remove(&user.email);
                email_index.insert(email.clone(), id);
                user.email = email;
            }
        }
        if let Some(name) = updates.name {
            user.name = name;
        }
        if let Some(password_hash) = updates.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(role) = updates.role {
            user.role = role;
        }

        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    /// Delete user
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        let user = users
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        email_index.remove(&user.email);

        Ok(())
    }

    /// Seed the bootstrap administrator account
    pub async fn seed_admin(&self, email: &str, password: &str, name: &str) -> Result<(), AppError> {
        let admin = User::new(email, hash_password(password)?, name, Role::Admin);

        // Ignore error if already exists
        let _ = self.create(admin).await;

        Ok(())
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
