//! List service — ownership-scoped CRUD over reading lists.
//!
//! DESIGN
//! ======
//! Every call takes the verified `UserId` and passes it to the store, which
//! resolves visibility through the ownership relation. A list owned by
//! someone else is reported exactly like a missing one.
//!
//! Updates are fetch → merge → write. The fetch doubles as the ownership
//! check; a write that then touches zero rows means ownership vanished in
//! between and is reported as `NotFound`.

use std::sync::Arc;

use tracing::{debug, info};

use super::error::ShelfError;
use crate::models::{List, NewList, UpdateListInput, UserId};
use crate::store::ListStore;

pub struct ListService {
    store: Arc<dyn ListStore>,
}

impl ListService {
    #[must_use]
    pub fn new(store: Arc<dyn ListStore>) -> Self {
        Self { store }
    }

    /// Create a list owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::InvalidInput`] for a blank title.
    pub async fn create(&self, user: UserId, list: &NewList) -> Result<i64, ShelfError> {
        if list.title.trim().is_empty() {
            return Err(ShelfError::InvalidInput("title must not be empty".into()));
        }
        let id = self.store.create(user, list).await?;
        info!(user_id = %user, list_id = id, "list created");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns [`ShelfError::Storage`] if the query fails.
    pub async fn get_all(&self, user: UserId) -> Result<Vec<List>, ShelfError> {
        Ok(self.store.all(user).await?)
    }

    /// # Errors
    ///
    /// Returns [`ShelfError::NotFound`] unless `user` owns `list_id`.
    pub async fn get_by_id(&self, user: UserId, list_id: i64) -> Result<List, ShelfError> {
        Ok(self.store.by_id(user, list_id).await?)
    }

    /// Merge `input` over the stored list.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::EmptyUpdate`] when no field is supplied,
    /// [`ShelfError::InvalidInput`] for a blank title and
    /// [`ShelfError::NotFound`] unless `user` owns `list_id`.
    pub async fn update(&self, user: UserId, list_id: i64, input: UpdateListInput) -> Result<(), ShelfError> {
        if input.is_empty() {
            return Err(ShelfError::EmptyUpdate);
        }
        if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ShelfError::InvalidInput("title must not be empty".into()));
        }

        let current = self.store.by_id(user, list_id).await?;
        let merged = input.apply(current);
        if self.store.update(user, &merged).await? == 0 {
            return Err(ShelfError::NotFound);
        }
        info!(user_id = %user, list_id, "list updated");
        Ok(())
    }

    /// Delete an owned list. Unowned or unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Storage`] if the delete fails.
    pub async fn delete(&self, user: UserId, list_id: i64) -> Result<(), ShelfError> {
        match self.store.delete(user, list_id).await? {
            0 => debug!(user_id = %user, list_id, "list delete matched nothing"),
            _ => info!(user_id = %user, list_id, "list deleted"),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
