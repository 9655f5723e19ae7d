//! In-memory store used by service and router tests.
//!
//! Mirrors the constraints of the PostgreSQL schema: unique ISBN and email,
//! one open borrowing per book, and restricted deletes.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{BookStore, BorrowingStore, HealthStore, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        user::display_name, BookAvailability, Book, Borrowing, BorrowingDetails, NewBook,
        NewBorrowing, NewUser, User, UserOption,
    },
};

#[derive(Default)]
struct Tables {
    books: Vec<Book>,
    users: Vec<User>,
    borrowings: Vec<Borrowing>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn details(&self, b: &Borrowing) -> AppResult<BorrowingDetails> {
        let user = self
            .users
            .iter()
            .find(|u| u.id == b.user_id)
            .ok_or_else(|| AppError::Internal(format!("dangling user {}", b.user_id)))?;
        let book = self
            .books
            .iter()
            .find(|k| k.id == b.book_id)
            .ok_or_else(|| AppError::Internal(format!("dangling book {}", b.book_id)))?;
        Ok(BorrowingDetails {
            id: b.id,
            user_id: b.user_id,
            user_name: display_name(&user.first_name, user.middle_name.as_deref(), &user.last_name),
            book_id: b.book_id,
            book_title: book.title.clone(),
            issue_date: b.issue_date,
            due_date: b.due_date,
            return_date: b.return_date,
        })
    }
}

/// Shared in-memory tables; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of borrowing rows, open or closed
    pub fn borrowing_count(&self) -> usize {
        self.lock().borrowings.len()
    }
}

fn book_from(id: i32, book: &NewBook) -> Book {
    Book {
        id,
        title: book.title.clone(),
        author: book.author.clone(),
        isbn: book.isbn.clone(),
        genre: book.genre.clone(),
        publication_date: book.publication_date,
    }
}

fn user_from(id: i32, user: &NewUser) -> User {
    User {
        id,
        first_name: user.first_name.clone(),
        middle_name: user.middle_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        contact_no: user.contact_no.clone(),
        role: user.role.clone(),
    }
}

#[async_trait]
impl BookStore for MemoryRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        Ok(self.lock().books.clone())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.lock()
            .books
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.lock().books.iter().any(|b| b.id == id))
    }

    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        Ok(self
            .lock()
            .books
            .iter()
            .any(|b| b.isbn == isbn && Some(b.id) != exclude_id))
    }

    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let mut tables = self.lock();
        if tables.books.iter().any(|b| b.isbn == book.isbn) {
            return Err(AppError::field("isbn", "The isbn has already been taken."));
        }
        let id = tables.next_id();
        let created = book_from(id, book);
        tables.books.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, book: &NewBook) -> AppResult<Book> {
        let mut tables = self.lock();
        if tables.books.iter().any(|b| b.isbn == book.isbn && b.id != id) {
            return Err(AppError::field("isbn", "The isbn has already been taken."));
        }
        let slot = tables
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;
        *slot = book_from(id, book);
        Ok(slot.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.lock();
        if tables.borrowings.iter().any(|b| b.book_id == id) {
            return Err(AppError::Conflict(
                "Book has borrowing history and cannot be deleted".to_string(),
            ));
        }
        let before = tables.books.len();
        tables.books.retain(|b| b.id != id);
        if tables.books.len() == before {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    async fn has_borrowings(&self, id: i32) -> AppResult<bool> {
        Ok(self.lock().borrowings.iter().any(|b| b.book_id == id))
    }
}

#[async_trait]
impl UserStore for MemoryRepository {
    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.lock().users.clone())
    }

    async fn list_options(&self) -> AppResult<Vec<UserOption>> {
        Ok(self
            .lock()
            .users
            .iter()
            .map(|u| UserOption {
                id: u.id,
                first_name: u.first_name.clone(),
                middle_name: u.middle_name.clone(),
                last_name: u.last_name.clone(),
            })
            .collect())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.lock()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.lock().users.iter().any(|u| u.id == id))
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        Ok(self
            .lock()
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id) != exclude_id))
    }

    async fn create(&self, user: &NewUser) -> AppResult<User> {
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::field("email", "The email has already been taken."));
        }
        let id = tables.next_id();
        let created = user_from(id, user);
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, user: &NewUser) -> AppResult<User> {
        let mut tables = self.lock();
        if tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email) && u.id != id)
        {
            return Err(AppError::field("email", "The email has already been taken."));
        }
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;
        *slot = user_from(id, user);
        Ok(slot.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.lock();
        if tables.borrowings.iter().any(|b| b.user_id == id) {
            return Err(AppError::Conflict(
                "User has borrowing history and cannot be deleted".to_string(),
            ));
        }
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }

    async fn has_borrowings(&self, id: i32) -> AppResult<bool> {
        Ok(self.lock().borrowings.iter().any(|b| b.user_id == id))
    }
}

#[async_trait]
impl BorrowingStore for MemoryRepository {
    async fn is_borrowed(&self, book_id: i32) -> AppResult<bool> {
        Ok(self
            .lock()
            .borrowings
            .iter()
            .any(|b| b.book_id == book_id && b.is_open()))
    }

    async fn availability(&self) -> AppResult<Vec<BookAvailability>> {
        let tables = self.lock();
        Ok(tables
            .books
            .iter()
            .map(|book| BookAvailability {
                id: book.id,
                title: book.title.clone(),
                is_borrowed: tables
                    .borrowings
                    .iter()
                    .any(|b| b.book_id == book.id && b.is_open()),
            })
            .collect())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Borrowing> {
        self.lock()
            .borrowings
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Borrowing with id {} not found", id)))
    }

    async fn get_details(&self, id: i32) -> AppResult<BorrowingDetails> {
        let tables = self.lock();
        let borrowing = tables
            .borrowings
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Borrowing with id {} not found", id)))?;
        tables.details(borrowing)
    }

    async fn list_details(&self) -> AppResult<Vec<BorrowingDetails>> {
        let tables = self.lock();
        tables.borrowings.iter().map(|b| tables.details(b)).collect()
    }

    async fn create(&self, borrowing: &NewBorrowing) -> AppResult<Borrowing> {
        let mut tables = self.lock();
        let references_ok = tables.users.iter().any(|u| u.id == borrowing.user_id)
            && tables.books.iter().any(|b| b.id == borrowing.book_id);
        if !references_ok {
            return Err(AppError::NotFound("User or book no longer exists".to_string()));
        }
        if tables
            .borrowings
            .iter()
            .any(|b| b.book_id == borrowing.book_id && b.is_open())
        {
            return Err(AppError::Conflict("This book is currently borrowed".to_string()));
        }
        let created = Borrowing {
            id: tables.next_id(),
            user_id: borrowing.user_id,
            book_id: borrowing.book_id,
            issue_date: borrowing.issue_date,
            due_date: borrowing.due_date,
            return_date: None,
        };
        tables.borrowings.push(created.clone());
        Ok(created)
    }

    async fn close(&self, id: i32, return_date: NaiveDate) -> AppResult<Option<Borrowing>> {
        let mut tables = self.lock();
        Ok(tables
            .borrowings
            .iter_mut()
            .find(|b| b.id == id && b.is_open())
            .map(|b| {
                b.return_date = Some(return_date);
                b.clone()
            }))
    }
}

#[async_trait]
impl HealthStore for MemoryRepository {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
