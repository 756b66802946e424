//! Auth service — registration, sign-in and bearer token verification.
//!
//! DESIGN
//! ======
//! Passwords are hashed as hex SHA-256 over `salt || password` with a single
//! process-wide salt from config. The hash is deterministic, so sign-in looks
//! the user up by `(username, hash)` rather than loading a stored hash and
//! comparing. This is a fast keyed hash, not a password KDF.
//!
//! The salt and signing key are handed in at construction. Nothing here reads
//! globals, so tests run with their own secrets side by side.
//!
//! ERROR HANDLING
//! ==============
//! Unknown users and wrong passwords both surface as `InvalidCredentials`.
//! Store failures other than the expected duplicate/not-found cases are
//! wrapped as `Storage` and left for the transport layer to log.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use tracing::{info, warn};

use super::token::{TokenError, TokenSigner};
use crate::config::AuthConfig;
use crate::models::{Credentials, UserId};
use crate::store::{CredentialStore, StoreError};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user already exists")]
    DuplicateUser,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token expired")]
    ExpiredToken,
    #[error("{0}")]
    InvalidInput(String),
    #[error("cannot issue token: {0}")]
    Signing(String),
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(reason) => Self::InvalidToken(reason),
            TokenError::Expired => Self::ExpiredToken,
            TokenError::Signing(reason) => Self::Signing(reason),
        }
    }
}

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    signer: TokenSigner,
    salt: String,
}

/// Hex-encoded SHA-256 of `salt || password`.
#[must_use]
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let bytes = hasher.finalize();
    bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
}

// =============================================================================
// OPERATIONS
// =============================================================================

impl AuthService {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, signer: TokenSigner, salt: impl Into<String>) -> Self {
        Self { store, signer, salt: salt.into() }
    }

    #[must_use]
    pub fn from_config(store: Arc<dyn CredentialStore>, config: &AuthConfig) -> Self {
        let signer = TokenSigner::new(
            config.signing_key.as_bytes(),
            std::time::Duration::from_secs(config.token_ttl_secs),
        );
        Self::new(store, signer, config.password_salt.clone())
    }

    /// Create a user with a salted password hash.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidInput`] for an empty username or password
    /// or a username with surrounding whitespace, and
    /// [`AuthError::DuplicateUser`] if the username is taken.
    pub async fn register(&self, credentials: &Credentials) -> Result<UserId, AuthError> {
        let username = credentials.username.as_str();
        if username.trim().is_empty() {
            return Err(AuthError::InvalidInput("username must not be empty".into()));
        }
        if username.trim() != username {
            return Err(AuthError::InvalidInput(
                "username must not start or end with whitespace".into(),
            ));
        }
        if credentials.password.is_empty() {
            return Err(AuthError::InvalidInput("password must not be empty".into()));
        }

        let hash = hash_password(&self.salt, &credentials.password);
        let user = self
            .store
            .insert_user(username, &hash)
            .await
            .map_err(|e| match e {
                StoreError::DuplicateKey(_) => AuthError::DuplicateUser,
                other => AuthError::Storage(other),
            })?;

        info!(user_id = %user, username = %username, "user registered");
        Ok(user)
    }

    /// Check credentials and issue a token valid from now.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if no user matches.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<String, AuthError> {
        self.authenticate_at(credentials, OffsetDateTime::now_utc()).await
    }

    /// Same as [`Self::authenticate`] with an explicit issue time.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if no user matches.
    pub async fn authenticate_at(&self, credentials: &Credentials, now: OffsetDateTime) -> Result<String, AuthError> {
        let hash = hash_password(&self.salt, &credentials.password);
        let user = match self.store.find_user(&credentials.username, &hash).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                warn!(username = %credentials.username, "sign-in rejected");
                return Err(AuthError::InvalidCredentials);
            }
            Err(other) => return Err(AuthError::Storage(other)),
        };

        let token = self.signer.issue(user, now)?;
        info!(user_id = %user, "token issued");
        Ok(token)
    }

    /// Verify a bearer token against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] or [`AuthError::ExpiredToken`].
    pub fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        self.verify_token_at(token, OffsetDateTime::now_utc())
    }

    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] or [`AuthError::ExpiredToken`].
    pub fn verify_token_at(&self, token: &str, now: OffsetDateTime) -> Result<UserId, AuthError> {
        let claims = self.signer.verify(token, now).map_err(|e| {
            warn!(error = %e, "token rejected");
            AuthError::from(e)
        })?;
        Ok(UserId::new(claims.user_id))
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
