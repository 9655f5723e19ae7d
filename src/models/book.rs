//! Book model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{not_blank, required, required_text, trimmed};
use crate::error::AppError;

/// Book model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// ISBN-10 or ISBN-13, unique across the catalog
    pub isbn: String,
    pub genre: String,
    pub publication_date: NaiveDate,
}

/// Create or update book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookRequest {
    #[validate(
        required(message = "The title field is required."),
        custom(function = "not_blank", message = "The title field is required."),
        length(max = 255, message = "The title may not be greater than 255 characters.")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub title: Option<String>,
    #[validate(
        required(message = "The author field is required."),
        custom(function = "not_blank", message = "The author field is required."),
        length(max = 255, message = "The author may not be greater than 255 characters.")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub author: Option<String>,
    #[validate(
        required(message = "The isbn field is required."),
        custom(function = "not_blank", message = "The isbn field is required."),
        length(max = 13, message = "The isbn may not be greater than 13 characters.")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub isbn: Option<String>,
    #[validate(
        required(message = "The genre field is required."),
        custom(function = "not_blank", message = "The genre field is required."),
        length(max = 100, message = "The genre may not be greater than 100 characters.")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub genre: Option<String>,
    #[validate(required(message = "The publication date field is required."))]
    pub publication_date: Option<NaiveDate>,
}

/// Validated book values ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: String,
    pub publication_date: NaiveDate,
}

impl TryFrom<BookRequest> for NewBook {
    type Error = AppError;

    fn try_from(req: BookRequest) -> Result<Self, Self::Error> {
        Ok(NewBook {
            title: required_text("title", req.title)?,
            author: required_text("author", req.author)?,
            isbn: required_text("isbn", req.isbn)?,
            genre: required_text("genre", req.genre)?,
            publication_date: required("publication_date", req.publication_date)?,
        })
    }
}
