//! Borrowing (loan) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{required, user::display_name, UserOption};
use crate::error::AppError;

/// Borrowing model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrowing {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Set when the book comes back; `None` while the borrowing is open
    pub return_date: Option<NaiveDate>,
}

impl Borrowing {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Internal row structure for the borrowing listing join
#[derive(Debug, Clone, FromRow)]
pub struct BorrowingDetailsRow {
    id: i32,
    user_id: i32,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    book_id: i32,
    book_title: String,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    return_date: Option<NaiveDate>,
}

impl From<BorrowingDetailsRow> for BorrowingDetails {
    fn from(row: BorrowingDetailsRow) -> Self {
        BorrowingDetails {
            id: row.id,
            user_id: row.user_id,
            user_name: display_name(&row.first_name, row.middle_name.as_deref(), &row.last_name),
            book_id: row.book_id,
            book_title: row.book_title,
            issue_date: row.issue_date,
            due_date: row.due_date,
            return_date: row.return_date,
        }
    }
}

/// Borrowing with borrower name and book title for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BorrowingDetails {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub book_id: i32,
    pub book_title: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

/// Book entry for the borrowing form, flagged when it is out on loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookAvailability {
    pub id: i32,
    pub title: String,
    pub is_borrowed: bool,
}

/// Everything the borrowing screen needs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowPage {
    pub borrowings: Vec<BorrowingDetails>,
    pub users: Vec<UserOption>,
    pub books: Vec<BookAvailability>,
}

/// Issue (borrow) a book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct IssueRequest {
    #[validate(required(message = "The user id field is required."))]
    pub user_id: Option<i32>,
    #[validate(required(message = "The book id field is required."))]
    pub book_id: Option<i32>,
    #[validate(required(message = "The issue date field is required."))]
    pub issue_date: Option<NaiveDate>,
    #[validate(required(message = "The due date field is required."))]
    pub due_date: Option<NaiveDate>,
}

/// Validated values for a new borrowing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewBorrowing {
    pub user_id: i32,
    pub book_id: i32,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl TryFrom<IssueRequest> for NewBorrowing {
    type Error = AppError;

    fn try_from(req: IssueRequest) -> Result<Self, Self::Error> {
        Ok(NewBorrowing {
            user_id: required("user_id", req.user_id)?,
            book_id: required("book_id", req.book_id)?,
            issue_date: required("issue_date", req.issue_date)?,
            due_date: required("due_date", req.due_date)?,
        })
    }
}

/// Return a borrowed book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ReturnRequest {
    #[validate(required(message = "The return date field is required."))]
    pub return_date: Option<NaiveDate>,
}
