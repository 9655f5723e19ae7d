//! User management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{NewUser, User},
    repository::UserStore,
};

#[derive(Clone)]
pub struct UsersService {
    users: Arc<dyn UserStore>,
}

impl UsersService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    /// Create a user; the email must not be in use (case-insensitive)
    pub async fn create(&self, user: NewUser) -> AppResult<User> {
        self.check_email(&user.email, None).await?;
        let created = self.users.create(&user).await?;
        tracing::info!(user_id = created.id, "User created");
        Ok(created)
    }

    pub async fn update(&self, id: i32, user: NewUser) -> AppResult<User> {
        self.users.get_by_id(id).await?;
        self.check_email(&user.email, Some(id)).await?;
        let updated = self.users.update(id, &user).await?;
        tracing::info!(user_id = id, "User updated");
        Ok(updated)
    }

    /// Delete a user. Users with borrowing history are kept.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.users.get_by_id(id).await?;
        if self.users.has_borrowings(id).await? {
            tracing::warn!(user_id = id, "Refused to delete user with borrowing history");
            return Err(AppError::Conflict(
                "User has borrowing history and cannot be deleted".to_string(),
            ));
        }
        self.users.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn check_email(&self, email: &str, exclude_id: Option<i32>) -> AppResult<()> {
        if self.users.email_exists(email, exclude_id).await? {
            return Err(AppError::field("email", "The email has already been taken."));
        }
        Ok(())
    }
}
