//! Error types for Kith Core

use crate::limits::ValidationError;
use thiserror::Error;

/// Result type alias using Kith's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Kith error types
///
/// Every variant is local to the operation that produced it; the registry
/// is left unchanged by a rejected operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("User cannot befriend themselves: {0}")]
    SelfFriendship(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
