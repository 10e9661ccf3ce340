//! Category error types.

use spendra_shared::AppError;
use spendra_shared::types::CategoryId;
use thiserror::Error;

/// Category-related errors.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// Category not found.
    #[error("Category {0} not found")]
    NotFound(CategoryId),

    /// A category with this id already exists.
    #[error("Category {0} already exists")]
    Duplicate(CategoryId),

    /// Referenced parent category not found.
    #[error("Parent category {0} not found")]
    ParentNotFound(CategoryId),

    /// The requested parent would create a cycle.
    #[error("Setting parent {parent} on category {child} would create a cycle")]
    CycleDetected {
        /// The category being inserted or reparented.
        child: CategoryId,
        /// The requested parent.
        parent: CategoryId,
    },

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Store(String),
}

impl CategoryError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::ParentNotFound(_) => 404,
            Self::Duplicate(_) => 409,
            Self::CycleDetected { .. } => 400,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::Duplicate(_) => "DUPLICATE_CATEGORY",
            Self::CycleDetected { .. } => "CATEGORY_CYCLE",
            Self::Store(_) => "STORAGE_ERROR",
        }
    }
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) | CategoryError::ParentNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            CategoryError::Duplicate(_) => Self::Conflict(err.to_string()),
            CategoryError::CycleDetected { .. } => Self::Validation(err.to_string()),
            CategoryError::Store(msg) => Self::Storage(msg),
        }
    }
}
