//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{is_foreign_key_violation, map_write_error, BookStore};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, NewBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    /// List all books
    async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn, genre, publication_date FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Get book by ID
    async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn, genre, publication_date FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Check if an ISBN is already used by another book
    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new book
    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, genre, publication_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, author, isbn, genre, publication_date
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.genre)
        .bind(book.publication_date)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    /// Update an existing book
    async fn update(&self, id: i32, book: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, author = $2, isbn = $3, genre = $4, publication_date = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING id, title, author, isbn, genre, publication_date
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.genre)
        .bind(book.publication_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book (refused by the database while borrowings reference it)
    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict("Book has borrowing history and cannot be deleted".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    async fn has_borrowings(&self, id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM borrowings WHERE book_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
