//! Bookshelf library management server
//!
//! A small REST JSON API over PostgreSQL for keeping track of books,
//! the users who borrow them and the borrowings themselves.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
