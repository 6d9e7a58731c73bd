//! Error types for the groupcal ecosystem.

use thiserror::Error;

/// Errors that can occur in groupcal operations.
#[derive(Error, Debug)]
pub enum GroupCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for groupcal operations.
pub type GroupCalResult<T> = Result<T, GroupCalError>;
