//! Budget data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendra_shared::types::{BudgetId, CategoryId, UserId};

/// Budget period classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// Budget covering a single month.
    Monthly,
    /// Budget covering a full year.
    Yearly,
}

impl BudgetPeriod {
    /// Returns the string representation of the period.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses a period from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// A budget record.
///
/// Invariants: `start_date <= end_date`; `alert_threshold` is a
/// percentage of `amount` in `[0, 100]`. Budgets are deactivated, never
/// hard-deleted, so historical analytics remain reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget id.
    pub id: BudgetId,
    /// Owning user.
    pub owner_id: UserId,
    /// Scoped category; `None` means an overall budget across all
    /// categories.
    pub category_id: Option<CategoryId>,
    /// Budgeted amount.
    pub amount: Decimal,
    /// Period classification.
    pub period: BudgetPeriod,
    /// Start of the budget window.
    pub start_date: NaiveDate,
    /// End of the budget window.
    pub end_date: NaiveDate,
    /// Alert threshold as a percentage of `amount`, in `[0, 100]`.
    pub alert_threshold: Decimal,
    /// Whether the budget is active.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// True if this budget covers the given expense category.
    ///
    /// Overall budgets (no category) cover every category.
    #[must_use]
    pub fn covers_category(&self, category_id: CategoryId) -> bool {
        self.category_id.is_none_or(|c| c == category_id)
    }

    /// True if the budget window overlaps `[start, end]`.
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }
}

/// Result of evaluating a budget's utilization as of a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUtilization {
    /// The evaluated budget.
    pub budget_id: BudgetId,
    /// Sum of approved and paid spend inside the window.
    pub spent: Decimal,
    /// Headroom remaining (`amount - spent`; negative when over).
    pub remaining: Decimal,
    /// Spend as a percentage of the budgeted amount (0 for a zero
    /// budget).
    pub utilization_percent: Decimal,
    /// True if utilization meets or exceeds the alert threshold.
    pub alert_triggered: bool,
    /// True if spend strictly exceeds the budgeted amount.
    pub is_over_budget: bool,
    /// The evaluation cutoff date.
    pub as_of: NaiveDate,
}

/// Input for creating a new budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Owning user.
    pub owner_id: UserId,
    /// Scoped category, or `None` for an overall budget.
    pub category_id: Option<CategoryId>,
    /// Budgeted amount.
    pub amount: Decimal,
    /// Period classification.
    pub period: BudgetPeriod,
    /// Start of the budget window.
    pub start_date: NaiveDate,
    /// End of the budget window.
    pub end_date: NaiveDate,
    /// Alert threshold percentage in `[0, 100]`.
    pub alert_threshold: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn budget(start: NaiveDate, end: NaiveDate) -> Budget {
        Budget {
            id: BudgetId::new(),
            owner_id: UserId::new(),
            category_id: None,
            amount: dec!(100),
            period: BudgetPeriod::Monthly,
            start_date: start,
            end_date: end,
            alert_threshold: dec!(80),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_period_parse() {
        assert_eq!(BudgetPeriod::parse("monthly"), Some(BudgetPeriod::Monthly));
        assert_eq!(BudgetPeriod::parse("YEARLY"), Some(BudgetPeriod::Yearly));
        assert_eq!(BudgetPeriod::parse("weekly"), None);
    }

    #[test]
    fn test_overall_budget_covers_every_category() {
        let b = budget(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        );
        assert!(b.covers_category(CategoryId::new()));
    }

    #[test]
    fn test_scoped_budget_covers_own_category_only() {
        let category = CategoryId::new();
        let mut b = budget(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        );
        b.category_id = Some(category);
        assert!(b.covers_category(category));
        assert!(!b.covers_category(CategoryId::new()));
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let b = budget(
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        );
        // Touching at a single endpoint counts as overlap.
        assert!(b.overlaps(
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        ));
        assert!(b.overlaps(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        ));
        assert!(!b.overlaps(
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        ));
    }
}
