//! Mapping from service failures to HTTP responses.
//!
//! ERROR HANDLING
//! ==============
//! Every failure leaves as `{"error": "<message>"}`. The status is decided
//! here and nowhere else. Storage failures answer with a generic message;
//! their detail goes to the log only.

use std::any::Any;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::gate::GateError;
use crate::services::auth::AuthError;
use crate::services::error::ShelfError;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn internal(detail: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Response for a handler that panicked. Logged inside the request span.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "handler panicked");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateUser => Self::new(StatusCode::CONFLICT, err.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidToken(_) | AuthError::ExpiredToken => {
                Self::new(StatusCode::UNAUTHORIZED, err.to_string())
            }
            AuthError::InvalidInput(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            AuthError::Signing(_) | AuthError::Storage(_) => Self::internal(&err),
        }
    }
}

impl From<ShelfError> for ApiError {
    fn from(err: ShelfError) -> Self {
        match err {
            ShelfError::EmptyUpdate | ShelfError::InvalidInput(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            ShelfError::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            ShelfError::Storage(_) => Self::internal(&err),
        }
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::MissingCredential | GateError::MalformedCredential => {
                Self::new(StatusCode::UNAUTHORIZED, err.to_string())
            }
            GateError::Auth(inner) => inner.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, format!("invalid input body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, format!("invalid id param: {}", rejection.body_text()))
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
