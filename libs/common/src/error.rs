//! Custom error types for the common library
//!
//! This module defines the error types returned by the user storage
//! backends. A lookup that finds nothing is not an error: it is reported
//! as `Ok(None)`.

use thiserror::Error;

/// Custom error type for storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// The external service rejected or failed a request
    #[error("Supabase {operation} failed: {message}")]
    Backend {
        /// Storage operation that failed (e.g. `getUser`)
        operation: &'static str,
        /// Message reported by the backend or the transport
        message: String,
    },

    /// The external service refused a write that violates a unique constraint
    #[error("Supabase {operation} failed: {message}")]
    UniqueViolation {
        operation: &'static str,
        message: String,
    },

    /// Configuration error
    #[error("Storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Build a backend failure for the given operation
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        StorageError::Backend {
            operation,
            message: message.into(),
        }
    }
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_message() {
        let err = StorageError::backend("getUser", "relation \"users\" does not exist");
        assert_eq!(
            err.to_string(),
            "Supabase getUser failed: relation \"users\" does not exist"
        );
    }

    #[test]
    fn test_unique_violation_message() {
        let err = StorageError::UniqueViolation {
            operation: "createUser",
            message: "duplicate key value violates unique constraint".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Supabase createUser failed: duplicate key value violates unique constraint"
        );
    }
}
