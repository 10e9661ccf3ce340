//! Lifecycle error types.
//!
//! Every error carries enough structured context (entity id, current vs
//! requested state, actor role) for the caller to render an actionable
//! message.

use rust_decimal::Decimal;
use spendra_shared::AppError;
use spendra_shared::types::{CategoryId, ExpenseId, UserId};
use thiserror::Error;

use super::types::ExpenseStatus;
use crate::budget::BudgetError;
use crate::scope::{Role, ScopeError};

/// Errors that can occur during lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Attempted a status transition with no outgoing edge.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ExpenseStatus,
        /// The attempted target status.
        to: ExpenseStatus,
    },

    /// Actor is outside the visibility or approval scope for the expense.
    #[error("User {actor_id} ({role}) may not act on expense {expense_id}")]
    Unauthorized {
        /// The acting user.
        actor_id: UserId,
        /// The acting user's role.
        role: Role,
        /// The target expense.
        expense_id: ExpenseId,
    },

    /// A concurrent transition won the race; the caller may re-fetch and
    /// retry.
    #[error("Expense {expense_id} changed concurrently: expected {expected}, found {found}")]
    Conflict {
        /// The target expense.
        expense_id: ExpenseId,
        /// The status this request expected.
        expected: ExpenseStatus,
        /// The status actually stored.
        found: ExpenseStatus,
    },

    /// Expense not found.
    #[error("Expense {0} not found")]
    ExpenseNotFound(ExpenseId),

    /// Amount must be positive.
    #[error("Expense amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Referenced category not found.
    #[error("Category {0} not found")]
    CategoryNotFound(CategoryId),

    /// Referenced category is inactive and rejects new assignments.
    #[error("Category {0} is inactive")]
    CategoryInactive(CategoryId),

    /// The expense is not in an owner-editable state.
    #[error("Expense {expense_id} is not editable in status {status}")]
    NotEditable {
        /// The target expense.
        expense_id: ExpenseId,
        /// The current status.
        status: ExpenseStatus,
    },

    /// Scope resolution failed.
    #[error("{0}")]
    Scope(#[from] ScopeError),

    /// Budget re-evaluation failed.
    #[error("{0}")]
    Budget(#[from] BudgetError),

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Store(String),
}

impl LifecycleError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. }
            | Self::NonPositiveAmount(_)
            | Self::NotEditable { .. } => 400,
            Self::Unauthorized { .. } => 403,
            Self::Conflict { .. } => 409,
            Self::ExpenseNotFound(_) | Self::CategoryNotFound(_) => 404,
            Self::CategoryInactive(_) => 422,
            Self::Scope(e) => e.status_code(),
            Self::Budget(e) => e.status_code(),
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Conflict { .. } => "CONFLICT",
            Self::ExpenseNotFound(_) | Self::CategoryNotFound(_) => "NOT_FOUND",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::CategoryInactive(_) => "CATEGORY_INACTIVE",
            Self::NotEditable { .. } => "NOT_EDITABLE",
            Self::Scope(e) => e.error_code(),
            Self::Budget(e) => e.error_code(),
            Self::Store(_) => "STORAGE_ERROR",
        }
    }

    /// True if the caller can meaningfully retry (re-fetch and
    /// re-attempt the transition).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::InvalidTransition { .. } | LifecycleError::NotEditable { .. } => {
                Self::BusinessRule(err.to_string())
            }
            LifecycleError::Unauthorized { .. } => Self::Forbidden(err.to_string()),
            LifecycleError::Conflict { .. } => Self::Conflict(err.to_string()),
            LifecycleError::ExpenseNotFound(_) | LifecycleError::CategoryNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            LifecycleError::NonPositiveAmount(_) => Self::Validation(err.to_string()),
            LifecycleError::CategoryInactive(_) => Self::BusinessRule(err.to_string()),
            LifecycleError::Scope(e) => e.into(),
            LifecycleError::Budget(e) => e.into(),
            LifecycleError::Store(msg) => Self::Storage(msg),
        }
    }
}
