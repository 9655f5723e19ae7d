//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::user::{NewUser, UserRequest},
    AppState,
};

use super::{ListResponse, UserList, ValidatedJson};

/// List all users
#[utoipa::path(
    get,
    path = "/user",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = UserList)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<UserList>> {
    let users = state.services.users.list().await?;
    Ok(Json(ListResponse::new(users)))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/user",
    tag = "users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created, full list returned", body = UserList),
        (status = 400, description = "Malformed body"),
        (status = 422, description = "Invalid input or duplicate email", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UserRequest>,
) -> AppResult<(StatusCode, Json<UserList>)> {
    state.services.users.create(NewUser::try_from(request)?).await?;

    let users = state.services.users.list().await?;
    Ok((
        StatusCode::CREATED,
        Json(ListResponse::with_message(users, "User created successfully")),
    ))
}

/// Update an existing user
#[utoipa::path(
    put,
    path = "/user/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated, full list returned", body = UserList),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid input or duplicate email", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UserRequest>,
) -> AppResult<Json<UserList>> {
    state
        .services
        .users
        .update(id, NewUser::try_from(request)?)
        .await?;

    let users = state.services.users.list().await?;
    Ok(Json(ListResponse::with_message(users, "User updated successfully")))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/user/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted, full list returned", body = UserList),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
        (status = 409, description = "User has borrowing history", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserList>> {
    state.services.users.delete(id).await?;

    let users = state.services.users.list().await?;
    Ok(Json(ListResponse::with_message(users, "User deleted successfully")))
}
