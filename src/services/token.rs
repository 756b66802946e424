//! Bearer token minting and verification.
//!
//! DESIGN
//! ======
//! Tokens are HS256 JWTs carrying `{ user_id, iat, exp }`. Decoding pins the
//! algorithm to HS256, so tokens signed with any other scheme are rejected as
//! invalid before their claims are looked at. Expiry is checked by hand
//! against a caller-supplied clock instead of the library's wall-clock check,
//! which keeps the window exact (no leeway) and testable.

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: i64,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token expired")]
    Expired,
    #[error("cannot sign token: {0}")]
    Signing(String),
}

/// Symmetric signer/verifier built from the configured secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self { encoding: EncodingKey::from_secret(secret), decoding: DecodingKey::from_secret(secret), ttl }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `user` issued at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if the TTL overflows or encoding fails.
    pub fn issue(&self, user: UserId, now: OffsetDateTime) -> Result<String, TokenError> {
        let iat = now.unix_timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).map_err(|_| TokenError::Signing("ttl out of range".into()))?;
        let exp = iat
            .checked_add(ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".into()))?;
        let claims = TokenClaims { user_id: user.get(), iat, exp };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, algorithm and structure, then check expiry at `now`.
    /// A token is expired from its `exp` second onward.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] for bad signatures, unexpected
    /// algorithms or malformed tokens, and [`TokenError::Expired`] once the
    /// window has passed.
    pub fn verify(&self, token: &str, now: OffsetDateTime) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "iat"]);

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &validation)
            .map_err(|e| TokenError::Invalid(describe(e.kind())))?;
        let claims = data.claims;

        if now.unix_timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

fn describe(kind: &ErrorKind) -> String {
    match kind {
        ErrorKind::InvalidSignature => "signature verification failed".into(),
        ErrorKind::InvalidAlgorithm => "invalid signing method".into(),
        ErrorKind::MissingRequiredClaim(claim) => format!("missing claim {claim}"),
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            "malformed token".into()
        }
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
