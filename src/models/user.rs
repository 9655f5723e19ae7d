//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{not_blank, required_text, trimmed};
use crate::error::AppError;

/// Full user model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub contact_no: String,
    /// Free-text role (e.g. "student", "staff")
    pub role: String,
}

/// Short user representation for the borrowing form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserOption {
    pub id: i32,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
}

/// "First Middle Last", leaving out a missing or blank middle name
pub fn display_name(first: &str, middle: Option<&str>, last: &str) -> String {
    match middle.map(str::trim).filter(|m| !m.is_empty()) {
        Some(middle) => format!("{} {} {}", first, middle, last),
        None => format!("{} {}", first, last),
    }
}

/// Create or update user request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UserRequest {
    #[validate(
        required(message = "The first name field is required."),
        custom(function = "not_blank", message = "The first name field is required."),
        length(max = 255, message = "The first name may not be greater than 255 characters.")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub first_name: Option<String>,
    #[validate(length(max = 255, message = "The middle name may not be greater than 255 characters."))]
    #[serde(default, deserialize_with = "trimmed")]
    pub middle_name: Option<String>,
    #[validate(
        required(message = "The last name field is required."),
        custom(function = "not_blank", message = "The last name field is required."),
        length(max = 255, message = "The last name may not be greater than 255 characters.")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub last_name: Option<String>,
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email must be a valid email address."),
        length(max = 255, message = "The email may not be greater than 255 characters.")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub email: Option<String>,
    #[validate(
        required(message = "The contact no field is required."),
        custom(function = "not_blank", message = "The contact no field is required."),
        length(max = 15, message = "The contact no may not be greater than 15 characters.")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub contact_no: Option<String>,
    #[validate(
        required(message = "The role field is required."),
        custom(function = "not_blank", message = "The role field is required."),
        length(max = 50, message = "The role may not be greater than 50 characters.")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub role: Option<String>,
}

/// Validated user values ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub contact_no: String,
    pub role: String,
}

impl TryFrom<UserRequest> for NewUser {
    type Error = AppError;

    fn try_from(req: UserRequest) -> Result<Self, Self::Error> {
        Ok(NewUser {
            first_name: required_text("first_name", req.first_name)?,
            middle_name: req
                .middle_name
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            last_name: required_text("last_name", req.last_name)?,
            email: required_text("email", req.email)?,
            contact_no: required_text("contact_no", req.contact_no)?,
            role: required_text("role", req.role)?,
        })
    }
}
