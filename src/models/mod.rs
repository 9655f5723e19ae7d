//! Data models for Bookshelf

pub mod book;
pub mod borrowing;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookRequest, NewBook};
pub use borrowing::{
    BookAvailability, BorrowPage, Borrowing, BorrowingDetails, IssueRequest, NewBorrowing,
    ReturnRequest,
};
pub use user::{NewUser, User, UserOption, UserRequest};

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

use crate::error::{AppError, AppResult};

/// Deserialize an optional string with surrounding whitespace removed, so
/// length rules see the value that gets stored
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}

/// Rejects strings made only of whitespace
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Unwrap a field that validation has already marked as required
pub(crate) fn required<T>(field: &str, value: Option<T>) -> AppResult<T> {
    value.ok_or_else(|| {
        AppError::field(
            field,
            format!("The {} field is required.", field.replace('_', " ")),
        )
    })
}

/// Required text field, trimmed
pub(crate) fn required_text(field: &str, value: Option<String>) -> AppResult<String> {
    required(field, value).map(|v| v.trim().to_string())
}
