//! Business logic services

pub mod books;
pub mod borrowings;
pub mod users;

use std::sync::Arc;

use crate::{
    error::AppResult,
    repository::{BookStore, BorrowingStore, HealthStore, Repository, UserStore},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub users: users::UsersService,
    pub borrowings: borrowings::BorrowingsService,
    health: Arc<dyn HealthStore>,
}

impl Services {
    /// Create all services backed by the PostgreSQL repository
    pub fn new(repository: Repository) -> Self {
        Self::from_stores(
            Arc::new(repository.books.clone()),
            Arc::new(repository.users.clone()),
            Arc::new(repository.borrowings.clone()),
            Arc::new(repository),
        )
    }

    /// Create all services over arbitrary store implementations
    pub fn from_stores(
        book_store: Arc<dyn BookStore>,
        user_store: Arc<dyn UserStore>,
        borrowing_store: Arc<dyn BorrowingStore>,
        health: Arc<dyn HealthStore>,
    ) -> Self {
        Self {
            books: books::BooksService::new(book_store.clone()),
            users: users::UsersService::new(user_store.clone()),
            borrowings: borrowings::BorrowingsService::new(book_store, user_store, borrowing_store),
            health,
        }
    }

    /// Check that storage is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.health.ping().await
    }
}
