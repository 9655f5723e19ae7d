//! Borrowing lifecycle service
//!
//! A book is either Available or Borrowed. `issue` moves it to Borrowed by
//! opening a borrowing, `return_book` moves it back by closing that
//! borrowing. At most one open borrowing exists per book; the storage layer
//! enforces this too, so two concurrent issues cannot both succeed.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{BorrowPage, Borrowing, BorrowingDetails, NewBorrowing},
    repository::{BookStore, BorrowingStore, UserStore},
};

#[derive(Clone)]
pub struct BorrowingsService {
    books: Arc<dyn BookStore>,
    users: Arc<dyn UserStore>,
    borrowings: Arc<dyn BorrowingStore>,
}

impl BorrowingsService {
    pub fn new(
        books: Arc<dyn BookStore>,
        users: Arc<dyn UserStore>,
        borrowings: Arc<dyn BorrowingStore>,
    ) -> Self {
        Self {
            books,
            users,
            borrowings,
        }
    }

    /// Whether the book is currently out on loan
    pub async fn is_borrowed(&self, book_id: i32) -> AppResult<bool> {
        self.borrowings.is_borrowed(book_id).await
    }

    /// All borrowings with borrower name and book title
    pub async fn list_all(&self) -> AppResult<Vec<BorrowingDetails>> {
        self.borrowings.list_details().await
    }

    /// Get one borrowing with borrower name and book title
    pub async fn get(&self, id: i32) -> AppResult<BorrowingDetails> {
        self.borrowings.get_details(id).await
    }

    /// Borrowings plus the user and book choices for a new one
    pub async fn page(&self) -> AppResult<BorrowPage> {
        Ok(BorrowPage {
            borrowings: self.borrowings.list_details().await?,
            users: self.users.list_options().await?,
            books: self.borrowings.availability().await?,
        })
    }

    /// Lend a book to a user
    pub async fn issue(&self, borrowing: NewBorrowing) -> AppResult<Borrowing> {
        if borrowing.due_date <= borrowing.issue_date {
            tracing::warn!(
                book_id = borrowing.book_id,
                issue_date = %borrowing.issue_date,
                due_date = %borrowing.due_date,
                "Rejected borrowing with due date not after issue date"
            );
            return Err(AppError::field(
                "due_date",
                "The due date must be a date after issue date.",
            ));
        }

        let mut errors = FieldErrors::new();
        if !self.users.exists(borrowing.user_id).await? {
            errors.add("user_id", "The selected user id is invalid.");
        }
        if !self.books.exists(borrowing.book_id).await? {
            errors.add("book_id", "The selected book id is invalid.");
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        if self.borrowings.is_borrowed(borrowing.book_id).await? {
            tracing::warn!(book_id = borrowing.book_id, "Book is already borrowed");
            return Err(AppError::Conflict("This book is currently borrowed".to_string()));
        }

        let created = self.borrowings.create(&borrowing).await?;
        tracing::info!(
            borrowing_id = created.id,
            book_id = created.book_id,
            user_id = created.user_id,
            "Book borrowed"
        );
        Ok(created)
    }

    /// Close an open borrowing, making the book available again
    pub async fn return_book(&self, id: i32, return_date: NaiveDate) -> AppResult<Borrowing> {
        let borrowing = self.borrowings.get_by_id(id).await?;

        if return_date <= borrowing.issue_date {
            return Err(AppError::field(
                "return_date",
                "The return date must be a date after issue date.",
            ));
        }

        if !borrowing.is_open() {
            tracing::warn!(borrowing_id = id, "Borrowing already returned");
            return Err(already_returned(id));
        }

        // Guarded update: loses cleanly against a concurrent return
        let closed = self
            .borrowings
            .close(id, return_date)
            .await?
            .ok_or_else(|| already_returned(id))?;

        tracing::info!(
            borrowing_id = closed.id,
            book_id = closed.book_id,
            return_date = %return_date,
            "Book returned"
        );
        Ok(closed)
    }
}

fn already_returned(id: i32) -> AppError {
    AppError::Conflict(format!("Borrowing {} has already been returned", id))
}
