//! Budget validation and utilization evaluation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{Budget, BudgetUtilization, CreateBudgetInput};
use crate::expense::Expense;

/// Stateless budget service.
///
/// Utilization is a pure projection over the expense set: it is
/// recomputed in full on every evaluation and never applied as an
/// incremental delta, because expense status can change retroactively.
pub struct BudgetService;

impl BudgetService {
    /// Validates a budget creation input.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NegativeAmount` if the amount is negative,
    /// `BudgetError::InvalidDateRange` if the window is inverted, or
    /// `BudgetError::ThresholdOutOfRange` if the threshold is outside
    /// `[0, 100]`.
    pub fn validate(input: &CreateBudgetInput) -> Result<(), BudgetError> {
        if input.amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount(input.amount));
        }
        if input.start_date > input.end_date {
            return Err(BudgetError::InvalidDateRange {
                start: input.start_date,
                end: input.end_date,
            });
        }
        if input.alert_threshold < Decimal::ZERO || input.alert_threshold > Decimal::ONE_HUNDRED {
            return Err(BudgetError::ThresholdOutOfRange(input.alert_threshold));
        }
        Ok(())
    }

    /// Evaluates a budget's utilization as of a date.
    ///
    /// Sums approved and paid expenses owned by the budget's owner,
    /// within the budget's category scope, dated within
    /// `[start_date, min(end_date, as_of)]`. A zero-amount budget
    /// evaluates to zero utilization rather than a division error.
    #[must_use]
    pub fn evaluate(budget: &Budget, expenses: &[Expense], as_of: NaiveDate) -> BudgetUtilization {
        let window_end = budget.end_date.min(as_of);

        let spent: Decimal = expenses
            .iter()
            .filter(|e| e.status.counts_as_spend())
            .filter(|e| e.owner_id == budget.owner_id)
            .filter(|e| budget.covers_category(e.category_id))
            .filter(|e| e.date >= budget.start_date && e.date <= window_end)
            .map(|e| e.amount)
            .sum();

        let utilization = if budget.amount.is_zero() {
            Decimal::ZERO
        } else {
            spent / budget.amount * Decimal::ONE_HUNDRED
        };

        BudgetUtilization {
            budget_id: budget.id,
            spent,
            remaining: budget.amount - spent,
            utilization_percent: utilization.round_dp(2),
            alert_triggered: utilization >= budget.alert_threshold,
            is_over_budget: spent > budget.amount,
            as_of,
        }
    }
}
