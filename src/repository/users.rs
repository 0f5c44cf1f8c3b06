//! Users repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User, UserSummary},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// List all users
    pub async fn list(&self) -> AppResult<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT id, email, username FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Create a new user. `password` is the already-hashed credential.
    pub async fn create(&self, user: &CreateUser, password: String) -> AppResult<User> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (email, username, password, is_active, created_at)
            VALUES ($1, $2, $3, TRUE, $4)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&password)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update an existing user, applying only the fields present in the patch
    pub async fn update(
        &self,
        id: i32,
        user: &UpdateUser,
        password: Option<String>,
    ) -> AppResult<User> {
        let now = Utc::now();

        let mut sets = vec!["updated_at = $1".to_string()];
        let mut param_idx = 2;

        if user.username.is_some() {
            sets.push(format!("username = ${}", param_idx));
            param_idx += 1;
        }
        if user.is_active.is_some() {
            sets.push(format!("is_active = ${}", param_idx));
            param_idx += 1;
        }
        if password.is_some() {
            sets.push(format!("password = ${}", param_idx));
        }

        let query = format!("UPDATE users SET {} WHERE id = {}", sets.join(", "), id);

        let mut builder = sqlx::query(&query).bind(now);
        if let Some(ref username) = user.username {
            builder = builder.bind(username);
        }
        if let Some(is_active) = user.is_active {
            builder = builder.bind(is_active);
        }
        if let Some(ref hash) = password {
            builder = builder.bind(hash);
        }

        builder.execute(&self.pool).await?;

        self.get_by_id(id).await
    }

    /// Delete a user. Refuses while open borrows exist unless `force` is set;
    /// a forced delete cascades the user's ledger rows.
    pub async fn delete(&self, id: i32, force: bool) -> AppResult<()> {
        let open_borrows: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrows WHERE user_id = $1 AND return_date IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if open_borrows > 0 && !force {
            return Err(AppError::Conflict(
                "User has open borrows. Use force=true to delete anyway.".to_string(),
            ));
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
