//! Budget error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendra_shared::AppError;
use spendra_shared::types::{BudgetId, CategoryId, UserId};
use thiserror::Error;

use crate::scope::ScopeError;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Budget not found.
    #[error("Budget {0} not found")]
    NotFound(BudgetId),

    /// Amount cannot be negative.
    #[error("Budget amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Start date is after end date.
    #[error("Invalid budget window: start {start} is after end {end}")]
    InvalidDateRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// Alert threshold is outside `[0, 100]`.
    #[error("Alert threshold {0} is outside [0, 100]")]
    ThresholdOutOfRange(Decimal),

    /// Referenced category not found.
    #[error("Category {0} not found")]
    CategoryNotFound(CategoryId),

    /// Referenced category is inactive and rejects new assignments.
    #[error("Category {0} is inactive")]
    CategoryInactive(CategoryId),

    /// Actor is outside the budget's visibility scope.
    #[error("User {actor_id} may not access budget {budget_id}")]
    Unauthorized {
        /// The requesting actor.
        actor_id: UserId,
        /// The target budget.
        budget_id: BudgetId,
    },

    /// Scope resolution failed.
    #[error("{0}")]
    Scope(#[from] ScopeError),

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Store(String),
}

impl BudgetError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::CategoryNotFound(_) => 404,
            Self::NegativeAmount(_)
            | Self::InvalidDateRange { .. }
            | Self::ThresholdOutOfRange(_) => 400,
            Self::CategoryInactive(_) => 422,
            Self::Unauthorized { .. } => 403,
            Self::Scope(e) => e.status_code(),
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) | Self::CategoryNotFound(_) => "NOT_FOUND",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::ThresholdOutOfRange(_) => "THRESHOLD_OUT_OF_RANGE",
            Self::CategoryInactive(_) => "CATEGORY_INACTIVE",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Scope(e) => e.error_code(),
            Self::Store(_) => "STORAGE_ERROR",
        }
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound(_) | BudgetError::CategoryNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            BudgetError::NegativeAmount(_)
            | BudgetError::InvalidDateRange { .. }
            | BudgetError::ThresholdOutOfRange(_) => Self::Validation(err.to_string()),
            BudgetError::CategoryInactive(_) => Self::BusinessRule(err.to_string()),
            BudgetError::Unauthorized { .. } => Self::Forbidden(err.to_string()),
            BudgetError::Scope(e) => e.into(),
            BudgetError::Store(msg) => Self::Storage(msg),
        }
    }
}
