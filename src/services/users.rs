//! User management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User, UserSummary},
    repository::Repository,
};

use super::auth::hash_password;

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new user account
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.users.email_exists(&user.email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password = hash_password(&user.password)?;

        self.repository.users.create(&user, password).await
    }

    /// List all users
    pub async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        self.repository.users.list().await
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> AppResult<User> {
        self.repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Update an existing user from a patch of optional fields
    pub async fn update_user(&self, id: i32, user: UpdateUser) -> AppResult<User> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // Verify user exists
        self.repository.users.get_by_id(id).await?;

        let password = match user.password {
            Some(ref password) => Some(hash_password(password)?),
            None => None,
        };

        self.repository.users.update(id, &user, password).await
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i32, force: bool) -> AppResult<()> {
        // Verify user exists
        self.repository.users.get_by_id(id).await?;

        self.repository.users.delete(id, force).await
    }
}
