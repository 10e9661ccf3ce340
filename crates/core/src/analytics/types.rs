//! Analytics report types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendra_shared::types::CategoryId;

use super::error::AnalyticsError;

/// An inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: NaiveDate,
    /// Last day of the range.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a date range, rejecting inverted bounds.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidDateRange` if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// True if the date falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Aggregated spending report over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingReport {
    /// Sum of all matching expense amounts.
    pub total_amount: Decimal,
    /// Number of matching expenses.
    pub expense_count: u64,
    /// Average expense amount (0 when no expenses match).
    pub avg_expense: Decimal,
    /// Per-category totals, one entry per category present (unordered).
    pub category_breakdown: Vec<CategoryBreakdown>,
    /// Per-month totals, ascending by month key; months with zero
    /// matching expenses are omitted.
    pub monthly_trend: Vec<MonthlyTrendPoint>,
    /// Spend against visible active budgets overlapping the range.
    pub budget_vs_actual: BudgetVsActual,
}

/// Spend attributed to one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// The category.
    pub category_id: CategoryId,
    /// Total amount in this category.
    pub amount: Decimal,
    /// Share of the report total as a percentage (0 when the total is
    /// zero).
    pub percentage: Decimal,
}

/// Spend within one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendPoint {
    /// Month key in `YYYY-MM` form; lexicographic order equals
    /// chronological order.
    pub month: String,
    /// Total amount in this month.
    pub amount: Decimal,
    /// Number of expenses in this month.
    pub expense_count: u64,
}

/// Budget-vs-actual variance over the report range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetVsActual {
    /// Sum of visible active budgets overlapping the range.
    pub budget_amount: Decimal,
    /// Actual spend (the report total).
    pub actual_amount: Decimal,
    /// `actual - budget` (negative when under budget).
    pub variance: Decimal,
    /// Variance as a percentage of the budget (0 when the budget sum is
    /// zero).
    pub variance_percentage: Decimal,
}
