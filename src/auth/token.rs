//! Signed token issuance and verification
//!
//! The codec is constructed from an explicit [`AuthConfig`] so it can be
//! exercised in isolation; it never reads process-wide state. Tokens are
//! HS256 JWTs binding a user id (`sub`), issue time (`iat`), and expiry
//! (`exp = iat + lifetime`).

use crate::config::AuthConfig;
use crate::error::{internal_error, AppError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Why a presented token was rejected. The three kinds stay distinguishable
/// because they map to different user-facing messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token is not a structurally valid signed credential")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token signature does not verify")]
    InvalidSignature,
}

/// Issues and verifies session tokens with a server-held secret.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            lifetime: Duration::hours(config.token_lifetime_hours),
        }
    }

    /// Create a signed token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| internal_error("Failed to issue token", e))
    }

    /// Decode and validate a token, returning its claims
    pub fn verify(&self, token: &str) -> Result<Claims, DecodeError> {
        let mut validation = Validation::default();
        // Expiry is exact: current time at or past `exp` rejects.
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => DecodeError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => DecodeError::InvalidSignature,
                _ => DecodeError::Malformed,
            })
    }
}
