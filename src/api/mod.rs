//! API handlers for Bookshelf REST endpoints

pub mod books;
pub mod borrowings;
pub mod health;
pub mod openapi;
pub mod users;


use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    routing::{get, post, put},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppError,
    models::{Book, User},
    AppState,
};

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON is a `BadRequest`. A field holding a value of the wrong
/// shape and rule failures are reported per field.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let text = err.body_text();
            match invalid_field(&text) {
                Some(field) => AppError::field(field, invalid_value_message(field)),
                None => AppError::BadRequest(text),
            }
        }
        other => AppError::BadRequest(other.body_text()),
    }
}

/// Field named at the head of a deserialization error, e.g.
/// `"...target type: due_date: input contains invalid characters ..."`
fn invalid_field(text: &str) -> Option<&str> {
    let (_, detail) = text.split_once("target type: ")?;
    let (path, _) = detail.split_once(": ")?;
    let is_field = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_field.then_some(path)
}

fn invalid_value_message(field: &str) -> String {
    let name = field.replace('_', " ");
    if field.ends_with("_date") {
        format!("The {} is not a valid date.", name)
    } else if field.ends_with("_id") {
        format!("The {} must be an integer.", name)
    } else {
        format!("The {} must be a string.", name)
    }
}

/// Full entity list, with a status message after a mutation
#[derive(Serialize, ToSchema)]
#[aliases(BookList = ListResponse<Book>, UserList = ListResponse<User>)]
pub struct ListResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ListResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>) -> Self {
        Self { items, message: None }
    }

    pub fn with_message(items: Vec<T>, message: &str) -> Self {
        Self {
            items,
            message: Some(message.to_string()),
        }
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/book", get(books::list_books).post(books::create_book))
        .route("/book/:id", put(books::update_book).delete(books::delete_book))
        // Users
        .route("/user", get(users::list_users).post(users::create_user))
        .route("/user/:id", put(users::update_user).delete(users::delete_user))
        // Borrowings
        .route("/borrow", get(borrowings::borrow_page).post(borrowings::issue_book))
        .route("/borrow/:id", get(borrowings::get_borrowing))
        .route("/borrow/:id/return", post(borrowings::return_book))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
