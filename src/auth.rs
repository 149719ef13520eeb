//! Session tokens.
//!
//! A token is an HS256 JWT whose payload is just `{"id": "<user id>"}`. There
//! is no expiry and nothing is stored server-side: a token is valid for as
//! long as the signing secret stays the same.

use std::collections::HashMap;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no authorization header")]
    MissingHeader,
    #[error("invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Token payload.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Claims {
    pub id: String,
}

/// Issues and verifies session tokens.
pub struct Auth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    /// Fixed tokens that resolve to a user id without signature checks.
    aliases: HashMap<String, String>,
}

impl Auth {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            aliases: HashMap::new(),
        }
    }

    /// Makes `token` resolve to `user_id` verbatim, bypassing verification.
    ///
    /// Only for seeded fixtures; see [`crate::fixtures`].
    pub fn alias_token(&mut self, token: impl Into<String>, user_id: impl Into<String>) {
        self.aliases.insert(token.into(), user_id.into());
    }

    pub fn issue_token(&self, user_id: &str) -> Result<String, AuthError> {
        let claims = Claims { id: user_id.to_owned() };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(AuthError::Signing)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        if let Some(id) = self.aliases.get(token) {
            debug!(user_id = %id, "fixture token alias used");
            return Ok(Claims { id: id.clone() });
        }

        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(AuthError::InvalidToken)
    }

    /// Extracts and verifies the token carried by an `Authorization` header
    /// value.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let header = header.filter(|h| !h.is_empty()).ok_or(AuthError::MissingHeader)?;
        self.verify_token(bearer_token(header))
    }
}

/// `Bearer <token>` yields the first word after the prefix; anything else is
/// taken as the raw token.
pub fn bearer_token(header: &str) -> &str {
    match header.strip_prefix("Bearer ") {
        Some(rest) => rest.split(' ').next().unwrap_or_default(),
        None => header,
    }
}
