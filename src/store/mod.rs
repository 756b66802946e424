//! Storage contracts for credentials, lists and books.
//!
//! DESIGN
//! ======
//! Services depend on these traits, never on a concrete backend. Every list
//! and book query is keyed on the requesting `UserId` and resolved through
//! the ownership (`users_lists`) and membership (`lists_books`) relations, so
//! a row owned by someone else is indistinguishable from a missing row.
//!
//! Creates are the only multi-statement writes. Each backend commits the
//! entity row and its relation row as one unit or neither.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{Book, List, NewBook, NewList, UserId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("missing reference: {0}")]
    MissingReference(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::DuplicateKey(db.message().to_owned()),
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Self::MissingReference(db.message().to_owned())
            }
            other => Self::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User identity and password-hash persistence.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a user. Fails with [`StoreError::DuplicateKey`] if the username is taken.
    async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<UserId>;

    /// Find the user matching both username and hash. Fails with [`StoreError::NotFound`].
    async fn find_user(&self, username: &str, password_hash: &str) -> StoreResult<UserId>;
}

/// Lists, scoped by the ownership relation.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Insert the list and its ownership row atomically.
    async fn create(&self, user: UserId, list: &NewList) -> StoreResult<i64>;

    async fn all(&self, user: UserId) -> StoreResult<Vec<List>>;

    /// Fails with [`StoreError::NotFound`] unless `user` owns `list_id`.
    async fn by_id(&self, user: UserId, list_id: i64) -> StoreResult<List>;

    /// Overwrite title/description of an owned list. Returns rows affected.
    async fn update(&self, user: UserId, list: &List) -> StoreResult<u64>;

    /// Delete an owned list. Returns rows affected.
    async fn delete(&self, user: UserId, list_id: i64) -> StoreResult<u64>;
}

/// Books, scoped transitively: book → membership → list → ownership → user.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert the book and its membership row atomically. Ownership of
    /// `list_id` must already have been checked by the caller.
    async fn create(&self, list_id: i64, book: &NewBook) -> StoreResult<i64>;

    async fn all(&self, user: UserId, list_id: i64) -> StoreResult<Vec<Book>>;

    async fn by_id(&self, user: UserId, book_id: i64) -> StoreResult<Book>;

    async fn update(&self, user: UserId, book: &Book) -> StoreResult<u64>;

    async fn delete(&self, user: UserId, book_id: i64) -> StoreResult<u64>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
