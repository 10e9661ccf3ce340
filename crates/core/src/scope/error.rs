//! Visibility resolution error types.

use spendra_shared::AppError;
use spendra_shared::types::UserId;
use thiserror::Error;

/// Errors that can occur while resolving a visibility scope.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// The referenced actor does not exist in the directory.
    #[error("Actor {0} not found")]
    ActorNotFound(UserId),

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Store(String),
}

impl ScopeError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ActorNotFound(_) => 404,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ActorNotFound(_) => "NOT_FOUND",
            Self::Store(_) => "STORAGE_ERROR",
        }
    }
}

impl From<ScopeError> for AppError {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::ActorNotFound(_) => Self::NotFound(err.to_string()),
            ScopeError::Store(msg) => Self::Storage(msg),
        }
    }
}
