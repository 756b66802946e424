//! Failure kinds shared by the list and book services.

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    #[error("update has no values")]
    EmptyUpdate,
    /// Also covers rows owned by another user.
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    InvalidInput(String),
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for ShelfError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}
