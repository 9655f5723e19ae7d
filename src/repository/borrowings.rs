//! Borrowings repository for database operations

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use super::{is_foreign_key_violation, map_write_error, BorrowingStore};
use crate::{
    error::{AppError, AppResult},
    models::borrowing::{
        BookAvailability, Borrowing, BorrowingDetails, BorrowingDetailsRow, NewBorrowing,
    },
};

const DETAILS_QUERY: &str = r#"
    SELECT br.id, br.user_id, u.first_name, u.middle_name, u.last_name,
           br.book_id, b.title AS book_title,
           br.issue_date, br.due_date, br.return_date
    FROM borrowings br
    JOIN users u ON u.id = br.user_id
    JOIN books b ON b.id = br.book_id
"#;

#[derive(Clone)]
pub struct BorrowingsRepository {
    pool: Pool<Postgres>,
}

impl BorrowingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BorrowingStore for BorrowingsRepository {
    async fn is_borrowed(&self, book_id: i32) -> AppResult<bool> {
        let borrowed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrowings WHERE book_id = $1 AND return_date IS NULL)",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(borrowed)
    }

    async fn availability(&self) -> AppResult<Vec<BookAvailability>> {
        let books = sqlx::query_as::<_, BookAvailability>(
            r#"
            SELECT b.id, b.title,
                   EXISTS(
                       SELECT 1 FROM borrowings br
                       WHERE br.book_id = b.id AND br.return_date IS NULL
                   ) AS is_borrowed
            FROM books b
            ORDER BY b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Get borrowing by ID
    async fn get_by_id(&self, id: i32) -> AppResult<Borrowing> {
        sqlx::query_as::<_, Borrowing>(
            "SELECT id, user_id, book_id, issue_date, due_date, return_date FROM borrowings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrowing with id {} not found", id)))
    }

    async fn get_details(&self, id: i32) -> AppResult<BorrowingDetails> {
        let row = sqlx::query_as::<_, BorrowingDetailsRow>(&format!(
            "{} WHERE br.id = $1",
            DETAILS_QUERY
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrowing with id {} not found", id)))?;
        Ok(row.into())
    }

    async fn list_details(&self) -> AppResult<Vec<BorrowingDetails>> {
        let rows = sqlx::query_as::<_, BorrowingDetailsRow>(&format!(
            "{} ORDER BY br.id",
            DETAILS_QUERY
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a new borrowing. The partial unique index on open borrowings
    /// turns a concurrent double issue into a conflict.
    async fn create(&self, borrowing: &NewBorrowing) -> AppResult<Borrowing> {
        sqlx::query_as::<_, Borrowing>(
            r#"
            INSERT INTO borrowings (user_id, book_id, issue_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, book_id, issue_date, due_date, return_date
            "#,
        )
        .bind(borrowing.user_id)
        .bind(borrowing.book_id)
        .bind(borrowing.issue_date)
        .bind(borrowing.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::NotFound("User or book no longer exists".to_string())
            } else {
                map_write_error(e)
            }
        })
    }

    async fn close(&self, id: i32, return_date: NaiveDate) -> AppResult<Option<Borrowing>> {
        let borrowing = sqlx::query_as::<_, Borrowing>(
            r#"
            UPDATE borrowings SET return_date = $1
            WHERE id = $2 AND return_date IS NULL
            RETURNING id, user_id, book_id, issue_date, due_date, return_date
            "#,
        )
        .bind(return_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(borrowing)
    }
}
