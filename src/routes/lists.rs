//! List routes. The caller is always the gate's `AuthUser`.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use super::StatusResponse;
use super::error::ApiError;
use super::gate::AuthUser;
use crate::models::{List, NewList, UpdateListInput};
use crate::services::list::ListService;

#[derive(Serialize)]
pub struct CreatedList {
    pub list_id: i64,
}

#[derive(Serialize)]
pub struct ListData<T> {
    pub data: T,
}

/// `POST /api/lists`
pub async fn create_list(
    State(lists): State<Arc<ListService>>,
    user: AuthUser,
    body: Result<Json<NewList>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedList>), ApiError> {
    let Json(input) = body?;
    let list_id = lists.create(user.id, &input).await?;
    Ok((StatusCode::CREATED, Json(CreatedList { list_id })))
}

/// `GET /api/lists`
pub async fn get_lists(
    State(lists): State<Arc<ListService>>,
    user: AuthUser,
) -> Result<Json<ListData<Vec<List>>>, ApiError> {
    let data = lists.get_all(user.id).await?;
    Ok(Json(ListData { data }))
}

/// `GET /api/lists/{id}`
pub async fn get_list(
    State(lists): State<Arc<ListService>>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ListData<List>>, ApiError> {
    let Path(list_id) = id?;
    let data = lists.get_by_id(user.id, list_id).await?;
    Ok(Json(ListData { data }))
}

/// `PUT /api/lists/{id}`
pub async fn update_list(
    State(lists): State<Arc<ListService>>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateListInput>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Path(list_id) = id?;
    let Json(input) = body?;
    lists.update(user.id, list_id, input).await?;
    Ok(Json(StatusResponse::ok()))
}

/// `DELETE /api/lists/{id}`
pub async fn delete_list(
    State(lists): State<Arc<ListService>>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Path(list_id) = id?;
    lists.delete(user.id, list_id).await?;
    Ok(Json(StatusResponse::ok()))
}
