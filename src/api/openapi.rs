//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, borrowings, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Library management REST API: books, users and borrowings",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Users
        users::list_users,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Borrowings
        borrowings::borrow_page,
        borrowings::get_borrowing,
        borrowings::issue_book,
        borrowings::return_book,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookRequest,
            crate::api::BookList,
            // Users
            crate::models::user::User,
            crate::models::user::UserOption,
            crate::models::user::UserRequest,
            crate::api::UserList,
            // Borrowings
            crate::models::borrowing::Borrowing,
            crate::models::borrowing::BorrowingDetails,
            crate::models::borrowing::BookAvailability,
            crate::models::borrowing::IssueRequest,
            crate::models::borrowing::ReturnRequest,
            borrowings::BorrowPageResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "users", description = "User management"),
        (name = "borrowings", description = "Borrowing and returning books")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
