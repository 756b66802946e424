//! Book routes, nested under a list for create/list and addressed by id
//! otherwise.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use super::StatusResponse;
use super::error::ApiError;
use super::gate::AuthUser;
use crate::models::{Book, NewBook, UpdateBookInput};
use crate::services::book::BookService;

#[derive(Serialize)]
pub struct CreatedBook {
    pub id: i64,
}

#[derive(Serialize)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

#[derive(Serialize)]
pub struct BookResponse {
    pub book: Book,
}

/// `POST /api/lists/{id}/books`
pub async fn create_book(
    State(books): State<Arc<BookService>>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedBook>), ApiError> {
    let Path(list_id) = id?;
    let Json(input) = body?;
    let id = books.create(user.id, list_id, &input).await?;
    Ok((StatusCode::CREATED, Json(CreatedBook { id })))
}

/// `GET /api/lists/{id}/books`
pub async fn get_books(
    State(books): State<Arc<BookService>>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<BooksResponse>, ApiError> {
    let Path(list_id) = id?;
    let books = books.get_all(user.id, list_id).await?;
    Ok(Json(BooksResponse { books }))
}

/// `GET /api/books/{id}`
pub async fn get_book(
    State(books): State<Arc<BookService>>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<BookResponse>, ApiError> {
    let Path(book_id) = id?;
    let book = books.get_by_id(user.id, book_id).await?;
    Ok(Json(BookResponse { book }))
}

/// `PUT /api/books/{id}`
pub async fn update_book(
    State(books): State<Arc<BookService>>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateBookInput>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Path(book_id) = id?;
    let Json(input) = body?;
    books.update(user.id, book_id, input).await?;
    Ok(Json(StatusResponse::ok()))
}

/// `DELETE /api/books/{id}`
pub async fn delete_book(
    State(books): State<Arc<BookService>>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Path(book_id) = id?;
    books.delete(user.id, book_id).await?;
    Ok(Json(StatusResponse::ok()))
}
