//! Expense record and input types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendra_shared::types::{CategoryId, ExpenseId, TeamId, UserId};

use crate::lifecycle::ExpenseStatus;

/// An expense record.
///
/// Invariant: `approver_id` and `approved_at` are both set exactly when
/// `status` has passed through an approval decision (approved, rejected,
/// paid), and both unset while in draft or pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense id.
    pub id: ExpenseId,
    /// Owning user; the only user who may mutate the record.
    pub owner_id: UserId,
    /// Assigned category.
    pub category_id: CategoryId,
    /// Amount with two fractional digits.
    pub amount: Decimal,
    /// Date the expense was incurred.
    pub date: NaiveDate,
    /// Free-form description.
    pub description: String,
    /// Current lifecycle status.
    pub status: ExpenseStatus,
    /// The user who decided the approval, once decided.
    pub approver_id: Option<UserId>,
    /// When the approval was decided.
    pub approved_at: Option<DateTime<Utc>>,
    /// Supplementary team tag; roster membership is the authoritative
    /// visibility link.
    pub team_id: Option<TeamId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// True if the approval audit fields are consistent with the status.
    #[must_use]
    pub fn approval_audit_consistent(&self) -> bool {
        let both_set = self.approver_id.is_some() && self.approved_at.is_some();
        let both_unset = self.approver_id.is_none() && self.approved_at.is_none();
        if self.status.requires_approval_audit() {
            both_set
        } else {
            both_unset
        }
    }
}

/// Input for creating a new draft expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Owning user.
    pub owner_id: UserId,
    /// Assigned category; must be active.
    pub category_id: CategoryId,
    /// Amount, must be positive.
    pub amount: Decimal,
    /// Date the expense was incurred.
    pub date: NaiveDate,
    /// Free-form description.
    pub description: String,
    /// Optional team tag.
    pub team_id: Option<TeamId>,
}

/// Input for mutating a draft or rejected expense.
///
/// Only amount, category, and description are owner-mutable; all other
/// fields are immutable once submitted.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    /// New category, if changing.
    pub category_id: Option<CategoryId>,
    /// New amount, if changing.
    pub amount: Option<Decimal>,
    /// New description, if changing.
    pub description: Option<String>,
}
