//! Auth routes — sign-up and sign-in.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Serialize;

use super::error::ApiError;
use crate::models::{Credentials, UserId};
use crate::services::auth::AuthService;

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub id: UserId,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub token: String,
}

/// `POST /auth/sign-up` — register a user.
pub async fn sign_up(
    State(auth): State<Arc<AuthService>>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<SignUpResponse>), ApiError> {
    let Json(credentials) = body?;
    let id = auth.register(&credentials).await?;
    Ok((StatusCode::CREATED, Json(SignUpResponse { id })))
}

/// `POST /auth/sign-in` — exchange credentials for a bearer token.
pub async fn sign_in(
    State(auth): State<Arc<AuthService>>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<SignInResponse>, ApiError> {
    let Json(credentials) = body?;
    let token = auth.authenticate(&credentials).await?;
    Ok(Json(SignInResponse { token }))
}
