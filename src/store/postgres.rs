//! `PostgreSQL` backend for the store traits.
//!
//! Ownership scoping is done in SQL: every read/update/delete joins through
//! `users_lists` (and `lists_books` for books) with the caller's user id as a
//! bound parameter. Creates run inside a transaction; returning early with
//! `?` drops the transaction, which rolls it back.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::{BookStore, CredentialStore, ListStore, StoreResult};
use crate::models::{Book, List, NewBook, NewList, UserId};

/// Shared handle implementing every store trait over one pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type BookRow = (i64, String, String, String, i32, i32);

fn book_from_row((id, title, author, publisher, publication_year, page_count): BookRow) -> Book {
    Book { id, title, author, publisher, publication_year, page_count }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

#[async_trait]
impl CredentialStore for PgStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<UserId> {
        let row = sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id")
            .bind(username)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(UserId::new(row.get("id")))
    }

    async fn find_user(&self, username: &str, password_hash: &str) -> StoreResult<UserId> {
        let id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE username = $1 AND password_hash = $2")
            .bind(username)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(UserId::new(id))
    }
}

// =============================================================================
// LISTS
// =============================================================================

#[async_trait]
impl ListStore for PgStore {
    async fn create(&self, user: UserId, list: &NewList) -> StoreResult<i64> {
        let mut tx = self.pool.begin().await?;

        let list_id: i64 = sqlx::query_scalar("INSERT INTO lists (title, description) VALUES ($1, $2) RETURNING id")
            .bind(&list.title)
            .bind(&list.description)
            .fetch_one(tx.as_mut())
            .await?;

        sqlx::query("INSERT INTO users_lists (user_id, list_id) VALUES ($1, $2)")
            .bind(user.get())
            .bind(list_id)
            .execute(tx.as_mut())
            .await?;

        tx.commit().await?;
        Ok(list_id)
    }

    async fn all(&self, user: UserId) -> StoreResult<Vec<List>> {
        let rows = sqlx::query_as::<_, (i64, String, Option<String>)>(
            r"SELECT l.id, l.title, l.description
              FROM lists l
              INNER JOIN users_lists ul ON l.id = ul.list_id
              WHERE ul.user_id = $1",
        )
        .bind(user.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, title, description)| List { id, title, description })
            .collect())
    }

    async fn by_id(&self, user: UserId, list_id: i64) -> StoreResult<List> {
        let (id, title, description) = sqlx::query_as::<_, (i64, String, Option<String>)>(
            r"SELECT l.id, l.title, l.description
              FROM lists l
              INNER JOIN users_lists ul ON l.id = ul.list_id
              WHERE ul.user_id = $1 AND ul.list_id = $2",
        )
        .bind(user.get())
        .bind(list_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(List { id, title, description })
    }

    async fn update(&self, user: UserId, list: &List) -> StoreResult<u64> {
        let result = sqlx::query(
            r"UPDATE lists l
              SET title = $1, description = $2
              FROM users_lists ul
              WHERE l.id = ul.list_id AND ul.list_id = $3 AND ul.user_id = $4",
        )
        .bind(&list.title)
        .bind(&list.description)
        .bind(list.id)
        .bind(user.get())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, user: UserId, list_id: i64) -> StoreResult<u64> {
        let result = sqlx::query(
            r"DELETE FROM lists l
              USING users_lists ul
              WHERE l.id = ul.list_id AND ul.user_id = $1 AND ul.list_id = $2",
        )
        .bind(user.get())
        .bind(list_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

// =============================================================================
// BOOKS
// =============================================================================

#[async_trait]
impl BookStore for PgStore {
    async fn create(&self, list_id: i64, book: &NewBook) -> StoreResult<i64> {
        let mut tx = self.pool.begin().await?;

        let book_id: i64 = sqlx::query_scalar(
            r"INSERT INTO books (title, author, publisher, publication_year, page_count)
              VALUES ($1, $2, $3, $4, $5)
              RETURNING id",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(book.publication_year)
        .bind(book.page_count)
        .fetch_one(tx.as_mut())
        .await?;

        sqlx::query("INSERT INTO lists_books (list_id, book_id) VALUES ($1, $2)")
            .bind(list_id)
            .bind(book_id)
            .execute(tx.as_mut())
            .await?;

        tx.commit().await?;
        Ok(book_id)
    }

    async fn all(&self, user: UserId, list_id: i64) -> StoreResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(
            r"SELECT b.id, b.title, b.author, b.publisher, b.publication_year, b.page_count
              FROM books b
              INNER JOIN lists_books lb ON b.id = lb.book_id
              INNER JOIN users_lists ul ON lb.list_id = ul.list_id
              WHERE lb.list_id = $1 AND ul.user_id = $2",
        )
        .bind(list_id)
        .bind(user.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(book_from_row).collect())
    }

    async fn by_id(&self, user: UserId, book_id: i64) -> StoreResult<Book> {
        let row = sqlx::query_as::<_, BookRow>(
            r"SELECT b.id, b.title, b.author, b.publisher, b.publication_year, b.page_count
              FROM books b
              INNER JOIN lists_books lb ON b.id = lb.book_id
              INNER JOIN users_lists ul ON lb.list_id = ul.list_id
              WHERE b.id = $1 AND ul.user_id = $2",
        )
        .bind(book_id)
        .bind(user.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(book_from_row(row))
    }

    async fn update(&self, user: UserId, book: &Book) -> StoreResult<u64> {
        let result = sqlx::query(
            r"UPDATE books b
              SET title = $1, author = $2, publisher = $3, publication_year = $4, page_count = $5
              FROM lists_books lb, users_lists ul
              WHERE b.id = lb.book_id AND lb.list_id = ul.list_id AND ul.user_id = $6 AND b.id = $7",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(book.publication_year)
        .bind(book.page_count)
        .bind(user.get())
        .bind(book.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, user: UserId, book_id: i64) -> StoreResult<u64> {
        let result = sqlx::query(
            r"DELETE FROM books b
              USING lists_books lb, users_lists ul
              WHERE b.id = lb.book_id AND lb.list_id = ul.list_id AND ul.user_id = $1 AND b.id = $2",
        )
        .bind(user.get())
        .bind(book_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "postgres_test.rs"]
mod tests;
