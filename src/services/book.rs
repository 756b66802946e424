//! Book service — books reachable through the caller's own lists.
//!
//! DESIGN
//! ======
//! A book is visible only when book → membership → list → ownership resolves
//! to the requesting user. Reads and writes hand the `UserId` to the store,
//! which enforces that chain in the query itself.
//!
//! Create is the exception: the store insert takes only a list id, so the
//! service first asks the list service whether the caller owns that list.
//! Only a successful ownership check reaches the insert.

use std::sync::Arc;

use tracing::{debug, info};

use super::error::ShelfError;
use super::list::ListService;
use crate::models::{Book, NewBook, UpdateBookInput, UserId};
use crate::store::{BookStore, StoreError};

pub struct BookService {
    store: Arc<dyn BookStore>,
    lists: Arc<ListService>,
}

impl BookService {
    #[must_use]
    pub fn new(store: Arc<dyn BookStore>, lists: Arc<ListService>) -> Self {
        Self { store, lists }
    }

    /// Add a book to a list owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::NotFound`] unless `user` owns `list_id`, including
    /// when the list is deleted between the check and the insert. Nothing is
    /// written in either case.
    pub async fn create(&self, user: UserId, list_id: i64, book: &NewBook) -> Result<i64, ShelfError> {
        self.lists.get_by_id(user, list_id).await?;
        let id = self.store.create(list_id, book).await.map_err(|e| match e {
            StoreError::MissingReference(_) => ShelfError::NotFound,
            other => ShelfError::from(other),
        })?;
        info!(user_id = %user, list_id, book_id = id, "book created");
        Ok(id)
    }

    /// Books of `list_id`. Empty, not an error, when `user` doesn't own it.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Storage`] if the query fails.
    pub async fn get_all(&self, user: UserId, list_id: i64) -> Result<Vec<Book>, ShelfError> {
        Ok(self.store.all(user, list_id).await?)
    }

    /// # Errors
    ///
    /// Returns [`ShelfError::NotFound`] if the ownership chain doesn't resolve.
    pub async fn get_by_id(&self, user: UserId, book_id: i64) -> Result<Book, ShelfError> {
        Ok(self.store.by_id(user, book_id).await?)
    }

    /// Merge `input` over the stored book.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::EmptyUpdate`] when no field is supplied and
    /// [`ShelfError::NotFound`] if the ownership chain doesn't resolve.
    pub async fn update(&self, user: UserId, book_id: i64, input: UpdateBookInput) -> Result<(), ShelfError> {
        if input.is_empty() {
            return Err(ShelfError::EmptyUpdate);
        }

        let current = self.store.by_id(user, book_id).await?;
        let merged = input.apply(current);
        if self.store.update(user, &merged).await? == 0 {
            return Err(ShelfError::NotFound);
        }
        info!(user_id = %user, book_id, "book updated");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ShelfError::Storage`] if the delete fails.
    pub async fn delete(&self, user: UserId, book_id: i64) -> Result<(), ShelfError> {
        match self.store.delete(user, book_id).await? {
            0 => debug!(user_id = %user, book_id, "book delete matched nothing"),
            _ => info!(user_id = %user, book_id, "book deleted"),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "book_test.rs"]
mod tests;
