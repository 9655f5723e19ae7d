//! Book catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{BookRequest, NewBook},
    AppState,
};

use super::{BookList, ListResponse, ValidatedJson};

/// List all books
#[utoipa::path(
    get,
    path = "/book",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = BookList)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<BookList>> {
    let books = state.services.books.list().await?;
    Ok(Json(ListResponse::new(books)))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/book",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created, full list returned", body = BookList),
        (status = 400, description = "Malformed body"),
        (status = 422, description = "Invalid input or duplicate ISBN", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BookRequest>,
) -> AppResult<(StatusCode, Json<BookList>)> {
    state.services.books.create(NewBook::try_from(request)?).await?;

    let books = state.services.books.list().await?;
    Ok((
        StatusCode::CREATED,
        Json(ListResponse::with_message(books, "Book created successfully")),
    ))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/book/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated, full list returned", body = BookList),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid input or duplicate ISBN", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<BookRequest>,
) -> AppResult<Json<BookList>> {
    state
        .services
        .books
        .update(id, NewBook::try_from(request)?)
        .await?;

    let books = state.services.books.list().await?;
    Ok(Json(ListResponse::with_message(books, "Book updated successfully")))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/book/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted, full list returned", body = BookList),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Book has borrowing history", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookList>> {
    state.services.books.delete(id).await?;

    let books = state.services.books.list().await?;
    Ok(Json(ListResponse::with_message(books, "Book deleted successfully")))
}
