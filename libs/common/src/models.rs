//! User model shared by every storage backend

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity
///
/// `password` is stored exactly as supplied; no hashing happens at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

/// New user creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertUser {
    pub username: String,
    pub password: String,
}

impl InsertUser {
    /// Create a new insert payload
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Attach a store-generated identifier, producing the full record
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            username: self.username,
            password: self.password,
        }
    }
}
