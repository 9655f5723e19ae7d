//! Borrowing endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        borrowing::{IssueRequest, NewBorrowing, ReturnRequest},
        required, BookAvailability, BorrowPage, BorrowingDetails, UserOption,
    },
    AppState,
};

use super::ValidatedJson;

/// Borrowing screen: every borrowing plus the users and books to pick from
#[derive(Serialize, ToSchema)]
pub struct BorrowPageResponse {
    pub borrowings: Vec<BorrowingDetails>,
    pub users: Vec<UserOption>,
    /// Books flagged `is_borrowed` cannot be issued
    pub books: Vec<BookAvailability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BorrowPageResponse {
    fn new(page: BorrowPage, message: Option<&str>) -> Self {
        Self {
            borrowings: page.borrowings,
            users: page.users,
            books: page.books,
            message: message.map(str::to_string),
        }
    }
}

/// List borrowings with the issue form choices
#[utoipa::path(
    get,
    path = "/borrow",
    tag = "borrowings",
    responses(
        (status = 200, description = "Borrowing page", body = BorrowPageResponse)
    )
)]
pub async fn borrow_page(State(state): State<AppState>) -> AppResult<Json<BorrowPageResponse>> {
    let page = state.services.borrowings.page().await?;
    Ok(Json(BorrowPageResponse::new(page, None)))
}

/// Get one borrowing
#[utoipa::path(
    get,
    path = "/borrow/{id}",
    tag = "borrowings",
    params(
        ("id" = i32, Path, description = "Borrowing ID")
    ),
    responses(
        (status = 200, description = "Borrowing details", body = BorrowingDetails),
        (status = 404, description = "Borrowing not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_borrowing(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowingDetails>> {
    let borrowing = state.services.borrowings.get(id).await?;
    Ok(Json(borrowing))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "borrowings",
    request_body = IssueRequest,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowPageResponse),
        (status = 400, description = "Malformed body"),
        (status = 409, description = "Book is currently borrowed", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid input, unknown user/book or bad dates", body = crate::error::ErrorResponse)
    )
)]
pub async fn issue_book(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<IssueRequest>,
) -> AppResult<(StatusCode, Json<BorrowPageResponse>)> {
    state
        .services
        .borrowings
        .issue(NewBorrowing::try_from(request)?)
        .await?;

    let page = state.services.borrowings.page().await?;
    Ok((
        StatusCode::CREATED,
        Json(BorrowPageResponse::new(page, Some("Book borrowed successfully"))),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrow/{id}/return",
    tag = "borrowings",
    params(
        ("id" = i32, Path, description = "Borrowing ID")
    ),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = BorrowPageResponse),
        (status = 404, description = "Borrowing not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already returned", body = crate::error::ErrorResponse),
        (status = 422, description = "Return date not after issue date", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<ReturnRequest>,
) -> AppResult<Json<BorrowPageResponse>> {
    let return_date = required("return_date", request.return_date)?;

    state.services.borrowings.return_book(id, return_date).await?;

    let page = state.services.borrowings.page().await?;
    Ok(Json(BorrowPageResponse::new(
        page,
        Some("Book returned successfully"),
    )))
}
