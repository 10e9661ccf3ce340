//! Expense lifecycle state machine.
//!
//! This module implements the pure state+guard table for transitioning
//! expenses through the approval workflow. Authorization and persistence
//! live in the engine; no timers or automatic transitions exist.

use chrono::Utc;
use rust_decimal::Decimal;
use spendra_shared::types::UserId;

use super::error::LifecycleError;
use super::types::{ExpenseStatus, LifecycleAction};

/// Stateless service for expense lifecycle transitions.
///
/// All methods are associated functions that validate and produce the
/// appropriate [`LifecycleAction`] with audit information.
pub struct LifecycleService;

impl LifecycleService {
    /// Normalizes and validates an expense amount.
    ///
    /// Amounts carry two fractional digits.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::NonPositiveAmount` if the amount is zero
    /// or negative.
    pub fn validate_amount(amount: Decimal) -> Result<Decimal, LifecycleError> {
        if amount <= Decimal::ZERO {
            return Err(LifecycleError::NonPositiveAmount(amount));
        }
        Ok(amount.round_dp(2))
    }

    /// Submit a draft expense for approval.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if not in draft, or
    /// `NonPositiveAmount` if the amount guard fails.
    pub fn submit(
        current_status: ExpenseStatus,
        amount: Decimal,
        submitted_by: UserId,
    ) -> Result<LifecycleAction, LifecycleError> {
        if amount <= Decimal::ZERO {
            return Err(LifecycleError::NonPositiveAmount(amount));
        }

        match current_status {
            ExpenseStatus::Draft => Ok(LifecycleAction::Submit {
                new_status: ExpenseStatus::Pending,
                submitted_by,
            }),
            _ => Err(LifecycleError::InvalidTransition {
                from: current_status,
                to: ExpenseStatus::Pending,
            }),
        }
    }

    /// Approve a pending expense.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if not in pending status.
    pub fn approve(
        current_status: ExpenseStatus,
        approver_id: UserId,
    ) -> Result<LifecycleAction, LifecycleError> {
        match current_status {
            ExpenseStatus::Pending => Ok(LifecycleAction::Approve {
                new_status: ExpenseStatus::Approved,
                approver_id,
                approved_at: Utc::now(),
            }),
            _ => Err(LifecycleError::InvalidTransition {
                from: current_status,
                to: ExpenseStatus::Approved,
            }),
        }
    }

    /// Reject a pending expense.
    ///
    /// Rejection records the same approval audit fields as approval.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if not in pending status.
    pub fn reject(
        current_status: ExpenseStatus,
        approver_id: UserId,
    ) -> Result<LifecycleAction, LifecycleError> {
        match current_status {
            ExpenseStatus::Pending => Ok(LifecycleAction::Reject {
                new_status: ExpenseStatus::Rejected,
                approver_id,
                approved_at: Utc::now(),
            }),
            _ => Err(LifecycleError::InvalidTransition {
                from: current_status,
                to: ExpenseStatus::Rejected,
            }),
        }
    }

    /// Mark an approved expense as paid.
    ///
    /// Payment is terminal; no approval fields change.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if not in approved status.
    pub fn pay(
        current_status: ExpenseStatus,
        paid_by: UserId,
    ) -> Result<LifecycleAction, LifecycleError> {
        match current_status {
            ExpenseStatus::Approved => Ok(LifecycleAction::Pay {
                new_status: ExpenseStatus::Paid,
                paid_by,
            }),
            _ => Err(LifecycleError::InvalidTransition {
                from: current_status,
                to: ExpenseStatus::Paid,
            }),
        }
    }

    /// Reopen a rejected expense back to draft.
    ///
    /// This is an explicit owner action, never automatic; it clears the
    /// approval audit fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if not in rejected status.
    pub fn reopen(current_status: ExpenseStatus) -> Result<LifecycleAction, LifecycleError> {
        match current_status {
            ExpenseStatus::Rejected => Ok(LifecycleAction::Reopen {
                new_status: ExpenseStatus::Draft,
            }),
            _ => Err(LifecycleError::InvalidTransition {
                from: current_status,
                to: ExpenseStatus::Draft,
            }),
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Draft → Pending (submit)
    /// - Pending → Approved (approve)
    /// - Pending → Rejected (reject)
    /// - Approved → Paid (pay)
    /// - Rejected → Draft (reopen)
    #[must_use]
    pub fn is_valid_transition(from: ExpenseStatus, to: ExpenseStatus) -> bool {
        matches!(
            (from, to),
            (ExpenseStatus::Draft, ExpenseStatus::Pending)
                | (
                    ExpenseStatus::Pending,
                    ExpenseStatus::Approved | ExpenseStatus::Rejected
                )
                | (ExpenseStatus::Approved, ExpenseStatus::Paid)
                | (ExpenseStatus::Rejected, ExpenseStatus::Draft)
        )
    }
}
