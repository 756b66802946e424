//! Access gate: the bearer-token extractor in front of every `/api` route.
//!
//! DESIGN
//! ======
//! The gate reads `Authorization: <scheme> <token>`, hands the token to the
//! auth service and yields the verified `UserId` as a typed handler argument.
//! Handlers never read a user id from the request body or path. The scheme
//! word itself is not inspected.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::error::ApiError;
use crate::models::UserId;
use crate::services::auth::{AuthError, AuthService};

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("empty auth header")]
    MissingCredential,
    #[error("invalid auth header")]
    MalformedCredential,
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Split a raw header value into its token. Exactly one space must separate
/// the scheme from the token.
///
/// # Errors
///
/// Returns [`GateError::MissingCredential`] for an absent or empty header and
/// [`GateError::MalformedCredential`] unless there are exactly two parts.
pub fn parse_credential(header: Option<&str>) -> Result<&str, GateError> {
    let raw = header.filter(|v| !v.is_empty()).ok_or(GateError::MissingCredential)?;
    let mut parts = raw.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(token), None) => Ok(token),
        _ => Err(GateError::MalformedCredential),
    }
}

/// Verified caller identity.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: UserId,
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| GateError::MalformedCredential)?),
            None => None,
        };
        let token = parse_credential(header)?;

        let auth = Arc::<AuthService>::from_ref(state);
        let id = auth.verify_token(token).map_err(GateError::from)?;
        Ok(Self { id })
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
