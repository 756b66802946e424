//! Domain rows and request inputs for users, lists and books.
//!
//! DESIGN
//! ======
//! `UserId` is the only identity that flows past the access gate. It is minted
//! by token verification (or registration) and threaded explicitly through
//! every list/book call; handlers never build one from request content.
//!
//! Partial updates carry `Option` fields. `apply` merges the supplied fields
//! over the stored row so absent fields keep their previous value.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// IDENTITY
// =============================================================================

/// Verified user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registration / sign-in payload. The password only lives for the duration
/// of the request; it is hashed before it reaches a store.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// LISTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

/// Body of a list create request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewList {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateListInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UpdateListInput {
    /// True when the update carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    /// Merge supplied fields over `current`.
    #[must_use]
    pub fn apply(self, current: List) -> List {
        List {
            id: current.id,
            title: self.title.unwrap_or(current.title),
            description: self.description.or(current.description),
        }
    }
}

// =============================================================================
// BOOKS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub publication_year: i32,
    pub page_count: i32,
}

/// Body of a book create request. Missing fields default to empty/zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub publication_year: i32,
    pub page_count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateBookInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub page_count: Option<i32>,
}

impl UpdateBookInput {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.publisher.is_none()
            && self.publication_year.is_none()
            && self.page_count.is_none()
    }

    #[must_use]
    pub fn apply(self, current: Book) -> Book {
        Book {
            id: current.id,
            title: self.title.unwrap_or(current.title),
            author: self.author.unwrap_or(current.author),
            publisher: self.publisher.unwrap_or(current.publisher),
            publication_year: self.publication_year.unwrap_or(current.publication_year),
            page_count: self.page_count.unwrap_or(current.page_count),
        }
    }
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
