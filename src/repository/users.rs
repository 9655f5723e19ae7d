//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{is_foreign_key_violation, map_write_error, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::user::{NewUser, User, UserOption},
};

const USER_COLUMNS: &str = "id, first_name, middle_name, last_name, email, contact_no, role";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UsersRepository {
    /// List all users
    async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Names only, for the borrowing form
    async fn list_options(&self) -> AppResult<Vec<UserOption>> {
        let users = sqlx::query_as::<_, UserOption>(
            "SELECT id, first_name, middle_name, last_name FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Get user by ID
    async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Check if email already exists (case-insensitive)
    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND id != $2)",
            )
            .bind(email)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new user
    async fn create(&self, user: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (first_name, middle_name, last_name, email, contact_no, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.first_name)
        .bind(&user.middle_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.contact_no)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    /// Update an existing user
    async fn update(&self, id: i32, user: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET first_name = $1, middle_name = $2, last_name = $3, email = $4,
                contact_no = $5, role = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.first_name)
        .bind(&user.middle_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.contact_no)
        .bind(&user.role)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Delete a user (refused by the database while borrowings reference it)
    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict("User has borrowing history and cannot be deleted".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }

    async fn has_borrowings(&self, id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM borrowings WHERE user_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
