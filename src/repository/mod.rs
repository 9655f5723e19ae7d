//! Repository layer for database operations
//!
//! Services talk to storage through the store traits below. [`Repository`]
//! provides the PostgreSQL implementation of each of them.

pub mod books;
pub mod borrowings;
pub mod users;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        Book, BookAvailability, Borrowing, BorrowingDetails, NewBook, NewBorrowing, NewUser,
        User, UserOption,
    },
};

/// Index enforcing a single open borrowing per book
pub const OPEN_BORROWING_CONSTRAINT: &str = "borrowings_open_book_key";
pub const ISBN_CONSTRAINT: &str = "books_isbn_key";
pub const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Book table access
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Book>>;
    async fn get_by_id(&self, id: i32) -> AppResult<Book>;
    async fn exists(&self, id: i32) -> AppResult<bool>;
    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool>;
    async fn create(&self, book: &NewBook) -> AppResult<Book>;
    async fn update(&self, id: i32, book: &NewBook) -> AppResult<Book>;
    async fn delete(&self, id: i32) -> AppResult<()>;
    /// Whether any borrowing, open or closed, references the book
    async fn has_borrowings(&self, id: i32) -> AppResult<bool>;
}

/// User table access
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<User>>;
    async fn list_options(&self) -> AppResult<Vec<UserOption>>;
    async fn get_by_id(&self, id: i32) -> AppResult<User>;
    async fn exists(&self, id: i32) -> AppResult<bool>;
    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool>;
    async fn create(&self, user: &NewUser) -> AppResult<User>;
    async fn update(&self, id: i32, user: &NewUser) -> AppResult<User>;
    async fn delete(&self, id: i32) -> AppResult<()>;
    /// Whether any borrowing, open or closed, references the user
    async fn has_borrowings(&self, id: i32) -> AppResult<bool>;
}

/// Borrowing table access, including the availability queries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowingStore: Send + Sync {
    /// True iff an open borrowing references the book
    async fn is_borrowed(&self, book_id: i32) -> AppResult<bool>;
    /// Every book with its borrowed flag
    async fn availability(&self) -> AppResult<Vec<BookAvailability>>;
    async fn get_by_id(&self, id: i32) -> AppResult<Borrowing>;
    async fn get_details(&self, id: i32) -> AppResult<BorrowingDetails>;
    async fn list_details(&self) -> AppResult<Vec<BorrowingDetails>>;
    /// Insert an open borrowing; fails with `Conflict` if the book is already out
    async fn create(&self, borrowing: &NewBorrowing) -> AppResult<Borrowing>;
    /// Set the return date of an open borrowing. `None` when it was already closed.
    async fn close(&self, id: i32, return_date: NaiveDate) -> AppResult<Option<Borrowing>>;
}

/// Storage connectivity probe
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthStore: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
    pub borrowings: borrowings::BorrowingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            borrowings: borrowings::BorrowingsRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl HealthStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Name of the violated constraint, if the error is a unique violation
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => db.constraint(),
        _ => None,
    }
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Map unique-key violations raised by a write to the matching domain error
pub(crate) fn map_write_error(err: sqlx::Error) -> AppError {
    match unique_violation(&err) {
        Some(ISBN_CONSTRAINT) => AppError::field("isbn", "The isbn has already been taken."),
        Some(EMAIL_CONSTRAINT) => AppError::field("email", "The email has already been taken."),
        Some(OPEN_BORROWING_CONSTRAINT) => {
            AppError::Conflict("This book is currently borrowed".to_string())
        }
        _ => AppError::Database(err),
    }
}
