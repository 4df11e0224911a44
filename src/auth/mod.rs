//! Authentication and authorization module
//!
//! Provides signed-token authentication and role-based access control.

mod middleware;
mod password;
mod token;

pub use middleware::{authenticate, require_admin, require_member, resolve_identity};
pub use password::{hash_password, verify_password};
pub use token::{Claims, DecodeError, TokenCodec};

use serde::{Deserialize, Serialize};

/// User roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Manages postings, users, and submitted applications
    Admin,
    /// Browses postings and submits applications
    Member,
}

impl Role {
    /// Normalize a free-form role string into the closed set.
    ///
    /// Comparison is case-insensitive; anything outside {ADMIN, MEMBER}
    /// yields `None` and must be rejected by the caller.
    pub fn parse(value: &str) -> Option<Role> {
        match value.to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "MEMBER" => Some(Role::Member),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Member
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Member => write!(f, "MEMBER"),
        }
    }
}
