//! Book catalog service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Book, NewBook},
    repository::BookStore,
};

#[derive(Clone)]
pub struct BooksService {
    books: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(books: Arc<dyn BookStore>) -> Self {
        Self { books }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.books.list().await
    }

    /// Create a book; the ISBN must not be in use
    pub async fn create(&self, book: NewBook) -> AppResult<Book> {
        self.check_isbn(&book.isbn, None).await?;
        let created = self.books.create(&book).await?;
        tracing::info!(book_id = created.id, isbn = %created.isbn, "Book created");
        Ok(created)
    }

    pub async fn update(&self, id: i32, book: NewBook) -> AppResult<Book> {
        self.books.get_by_id(id).await?;
        self.check_isbn(&book.isbn, Some(id)).await?;
        let updated = self.books.update(id, &book).await?;
        tracing::info!(book_id = id, "Book updated");
        Ok(updated)
    }

    /// Delete a book. Books with borrowing history are kept.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.books.get_by_id(id).await?;
        if self.books.has_borrowings(id).await? {
            tracing::warn!(book_id = id, "Refused to delete book with borrowing history");
            return Err(AppError::Conflict(
                "Book has borrowing history and cannot be deleted".to_string(),
            ));
        }
        self.books.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    async fn check_isbn(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<()> {
        if self.books.isbn_exists(isbn, exclude_id).await? {
            return Err(AppError::field("isbn", "The isbn has already been taken."));
        }
        Ok(())
    }
}
