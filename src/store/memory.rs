//! In-process implementation of the store traits.
//!
//! DESIGN
//! ======
//! All tables live behind one `tokio::sync::RwLock`, mirroring the relational
//! schema: entity maps plus explicit `users_lists` / `lists_books` relation
//! rows. Reads resolve visibility through the relation rows exactly as the
//! SQL joins do.
//!
//! Creates validate every row of the unit (including the relation's
//! references) while holding the write lock, and only then apply them. A
//! failing relation insert therefore leaves no entity row behind.
//!
//! Not durable: state is lost on restart. Meant for local runs and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookStore, CredentialStore, ListStore, StoreError, StoreResult};
use crate::models::{Book, List, NewBook, NewList, UserId};

#[derive(Debug)]
struct UserRow {
    username: String,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Tables {
    next_user_id: i64,
    next_list_id: i64,
    next_book_id: i64,
    users: BTreeMap<i64, UserRow>,
    lists: BTreeMap<i64, List>,
    books: BTreeMap<i64, Book>,
    /// `list_id -> user_id`; one owner per list.
    users_lists: HashMap<i64, i64>,
    /// `book_id -> list_id`; one list per book.
    lists_books: HashMap<i64, i64>,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn owns_list(&self, user: UserId, list_id: i64) -> bool {
        self.users_lists.get(&list_id) == Some(&user.get())
    }

    /// Resolve the full chain book → membership → list → ownership → user.
    fn owns_book(&self, user: UserId, book_id: i64) -> bool {
        self.lists_books
            .get(&book_id)
            .is_some_and(|list_id| self.owns_list(user, *list_id))
    }
}

/// Cloneable handle; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Row counts of `(lists, users_lists, books, lists_books)`.
    #[cfg(test)]
    pub(crate) async fn row_counts(&self) -> (usize, usize, usize, usize) {
        let tables = self.tables.read().await;
        (tables.lists.len(), tables.users_lists.len(), tables.books.len(), tables.lists_books.len())
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<UserId> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == username) {
            return Err(StoreError::DuplicateKey(format!("username {username}")));
        }
        let id = Tables::next_id(&mut tables.next_user_id);
        tables
            .users
            .insert(id, UserRow { username: username.to_owned(), password_hash: password_hash.to_owned() });
        Ok(UserId::new(id))
    }

    async fn find_user(&self, username: &str, password_hash: &str) -> StoreResult<UserId> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|(_, u)| u.username == username && u.password_hash == password_hash)
            .map(|(id, _)| UserId::new(*id))
            .ok_or(StoreError::NotFound)
    }
}

// =============================================================================
// LISTS
// =============================================================================

#[async_trait]
impl ListStore for MemoryStore {
    async fn create(&self, user: UserId, list: &NewList) -> StoreResult<i64> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.get()) {
            return Err(StoreError::MissingReference(format!("users.id {user}")));
        }

        let id = Tables::next_id(&mut tables.next_list_id);
        tables
            .lists
            .insert(id, List { id, title: list.title.clone(), description: list.description.clone() });
        tables.users_lists.insert(id, user.get());
        Ok(id)
    }

    async fn all(&self, user: UserId) -> StoreResult<Vec<List>> {
        let tables = self.tables.read().await;
        Ok(tables
            .lists
            .values()
            .filter(|list| tables.owns_list(user, list.id))
            .cloned()
            .collect())
    }

    async fn by_id(&self, user: UserId, list_id: i64) -> StoreResult<List> {
        let tables = self.tables.read().await;
        if !tables.owns_list(user, list_id) {
            return Err(StoreError::NotFound);
        }
        tables.lists.get(&list_id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(&self, user: UserId, list: &List) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        if !tables.owns_list(user, list.id) {
            return Ok(0);
        }
        match tables.lists.get_mut(&list.id) {
            Some(row) => {
                row.title.clone_from(&list.title);
                row.description.clone_from(&list.description);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, user: UserId, list_id: i64) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        if !tables.owns_list(user, list_id) {
            return Ok(0);
        }
        tables.lists.remove(&list_id);
        // Relation rows cascade with the list; the books themselves stay
        // behind, unreachable.
        tables.users_lists.remove(&list_id);
        tables.lists_books.retain(|_, owner_list| *owner_list != list_id);
        Ok(1)
    }
}

// =============================================================================
// BOOKS
// =============================================================================

#[async_trait]
impl BookStore for MemoryStore {
    async fn create(&self, list_id: i64, book: &NewBook) -> StoreResult<i64> {
        let mut tables = self.tables.write().await;
        if !tables.lists.contains_key(&list_id) {
            return Err(StoreError::MissingReference(format!("lists.id {list_id}")));
        }

        let id = Tables::next_id(&mut tables.next_book_id);
        tables.books.insert(
            id,
            Book {
                id,
                title: book.title.clone(),
                author: book.author.clone(),
                publisher: book.publisher.clone(),
                publication_year: book.publication_year,
                page_count: book.page_count,
            },
        );
        tables.lists_books.insert(id, list_id);
        Ok(id)
    }

    async fn all(&self, user: UserId, list_id: i64) -> StoreResult<Vec<Book>> {
        let tables = self.tables.read().await;
        if !tables.owns_list(user, list_id) {
            return Ok(Vec::new());
        }
        Ok(tables
            .books
            .values()
            .filter(|book| tables.lists_books.get(&book.id) == Some(&list_id))
            .cloned()
            .collect())
    }

    async fn by_id(&self, user: UserId, book_id: i64) -> StoreResult<Book> {
        let tables = self.tables.read().await;
        if !tables.owns_book(user, book_id) {
            return Err(StoreError::NotFound);
        }
        tables.books.get(&book_id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(&self, user: UserId, book: &Book) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        if !tables.owns_book(user, book.id) {
            return Ok(0);
        }
        match tables.books.get_mut(&book.id) {
            Some(row) => {
                *row = book.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, user: UserId, book_id: i64) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        if !tables.owns_book(user, book_id) {
            return Ok(0);
        }
        tables.books.remove(&book_id);
        tables.lists_books.remove(&book_id);
        Ok(1)
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
