//! Password hashing and verification
//!
//! Uses bcrypt for one-way password hashing. Plaintext passwords never leave
//! this module's callers; only hashes are stored.

use crate::error::{internal_error, AppError};
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| internal_error("Failed to hash password", e))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash).map_err(|e| internal_error("Failed to verify password", e))
}
