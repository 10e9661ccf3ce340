//! Expense lifecycle domain types.
//!
//! This module defines the core types used for managing expense status
//! transitions and lifecycle actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spendra_shared::types::UserId;
use std::fmt;

/// Expense status in the approval workflow.
///
/// Expenses progress through these states from creation to payment.
/// The valid transitions are:
/// - Draft → Pending (submit)
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
/// - Approved → Paid (pay)
/// - Rejected → Draft (reopen)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    /// Expense is being drafted and can be modified by its owner.
    Draft,
    /// Expense has been submitted for approval.
    Pending,
    /// Expense has been approved and counts toward budget spend.
    Approved,
    /// Expense has been rejected; the owner may reopen it.
    Rejected,
    /// Expense has been paid out (terminal).
    Paid,
}

impl ExpenseStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Paid => "paid",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }

    /// True if the owner may mutate amount, category, or description.
    #[must_use]
    pub fn is_owner_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Rejected)
    }

    /// True if the expense counts toward budget spend.
    #[must_use]
    pub fn counts_as_spend(&self) -> bool {
        matches!(self, Self::Approved | Self::Paid)
    }

    /// True if no outgoing transition exists.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid)
    }

    /// True if the status requires approval audit fields to be set.
    #[must_use]
    pub fn requires_approval_audit(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Paid)
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle action representing a state transition with audit data.
///
/// Each variant captures the action performed, the resulting status,
/// and the approval audit information to persist alongside it.
#[derive(Debug, Clone)]
pub enum LifecycleAction {
    /// Submit a draft expense for approval.
    Submit {
        /// The new status after submission.
        new_status: ExpenseStatus,
        /// The owner submitting the expense.
        submitted_by: UserId,
    },
    /// Approve a pending expense.
    Approve {
        /// The new status after approval.
        new_status: ExpenseStatus,
        /// The user who approved the expense.
        approver_id: UserId,
        /// When the decision was made.
        approved_at: DateTime<Utc>,
    },
    /// Reject a pending expense.
    Reject {
        /// The new status after rejection.
        new_status: ExpenseStatus,
        /// The user who rejected the expense.
        approver_id: UserId,
        /// When the decision was made.
        approved_at: DateTime<Utc>,
    },
    /// Mark an approved expense as paid.
    Pay {
        /// The new status after payment.
        new_status: ExpenseStatus,
        /// The admin recording the payment.
        paid_by: UserId,
    },
    /// Reopen a rejected expense back to draft, clearing approval fields.
    Reopen {
        /// The new status after reopening.
        new_status: ExpenseStatus,
    },
}

impl LifecycleAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> ExpenseStatus {
        match self {
            Self::Submit { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. }
            | Self::Pay { new_status, .. }
            | Self::Reopen { new_status } => *new_status,
        }
    }

    /// Approval audit fields this action writes, if any.
    ///
    /// `Some((approver_id, approved_at))` for approve/reject, `None` for
    /// actions that leave the audit fields untouched. `Reopen` clears
    /// them instead, which [`Self::clears_approval_audit`] reports.
    #[must_use]
    pub fn approval_audit(&self) -> Option<(UserId, DateTime<Utc>)> {
        match self {
            Self::Approve {
                approver_id,
                approved_at,
                ..
            }
            | Self::Reject {
                approver_id,
                approved_at,
                ..
            } => Some((*approver_id, *approved_at)),
            _ => None,
        }
    }

    /// True if this action clears the approval audit fields.
    #[must_use]
    pub fn clears_approval_audit(&self) -> bool {
        matches!(self, Self::Reopen { .. })
    }
}
