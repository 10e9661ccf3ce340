//! Analytics error types.

use chrono::NaiveDate;
use spendra_shared::AppError;
use thiserror::Error;

use crate::scope::ScopeError;

/// Errors that can occur during analytics aggregation.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Start date is after end date.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// Scope resolution failed.
    #[error("{0}")]
    Scope(#[from] ScopeError),

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Store(String),
}

impl AnalyticsError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange { .. } => 400,
            Self::Scope(e) => e.status_code(),
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::Scope(e) => e.error_code(),
            Self::Store(_) => "STORAGE_ERROR",
        }
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InvalidDateRange { .. } => Self::Validation(err.to_string()),
            AnalyticsError::Scope(e) => e.into(),
            AnalyticsError::Store(msg) => Self::Storage(msg),
        }
    }
}
