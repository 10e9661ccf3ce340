//! Analytics aggregation.
//!
//! The pure [`AnalyticsService`] builds a report from already
//! materialized record sets; the [`AnalyticsEngine`] narrows those sets
//! through the visibility resolver first. Every division-by-zero case
//! resolves to 0, never an error or NaN; this is a required policy, not
//! an incidental default.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Datelike;
use rust_decimal::Decimal;
use spendra_shared::types::CategoryId;
use tracing::debug;

use super::error::AnalyticsError;
use super::types::{
    BudgetVsActual, CategoryBreakdown, DateRange, MonthlyTrendPoint, SpendingReport,
};
use crate::budget::Budget;
use crate::expense::Expense;
use crate::scope::{Actor, ScopeResolver};
use crate::store::{BudgetStore, DirectoryStore, ExpenseStore};

/// Stateless report builder over materialized records.
pub struct AnalyticsService;

impl AnalyticsService {
    /// Builds a spending report from scope-narrowed records.
    ///
    /// `expenses` must already be visibility-filtered; dates outside the
    /// range are filtered here. `budgets` must already be the active
    /// budgets visible to the actor; their windows are intersected with
    /// the range here.
    #[must_use]
    pub fn build_report(
        expenses: &[Expense],
        budgets: &[Budget],
        range: &DateRange,
    ) -> SpendingReport {
        let matching: Vec<&Expense> = expenses
            .iter()
            .filter(|e| range.contains(e.date))
            .collect();

        let total_amount: Decimal = matching.iter().map(|e| e.amount).sum();
        let expense_count = matching.len() as u64;
        let avg_expense = if expense_count == 0 {
            Decimal::ZERO
        } else {
            (total_amount / Decimal::from(expense_count)).round_dp(2)
        };

        SpendingReport {
            total_amount,
            expense_count,
            avg_expense,
            category_breakdown: Self::category_breakdown(&matching, total_amount),
            monthly_trend: Self::monthly_trend(&matching),
            budget_vs_actual: Self::budget_vs_actual(budgets, range, total_amount),
        }
    }

    /// Groups matching expenses by category.
    ///
    /// One entry per category present; the entry set is unordered.
    fn category_breakdown(matching: &[&Expense], total: Decimal) -> Vec<CategoryBreakdown> {
        let mut by_category: HashMap<CategoryId, Decimal> = HashMap::new();
        for expense in matching {
            *by_category.entry(expense.category_id).or_default() += expense.amount;
        }

        by_category
            .into_iter()
            .map(|(category_id, amount)| CategoryBreakdown {
                category_id,
                amount,
                percentage: if total.is_zero() {
                    Decimal::ZERO
                } else {
                    (amount / total * Decimal::ONE_HUNDRED).round_dp(2)
                },
            })
            .collect()
    }

    /// Groups matching expenses by `YYYY-MM` month key, ascending.
    ///
    /// Months with zero matching expenses are omitted, not zero-filled.
    fn monthly_trend(matching: &[&Expense]) -> Vec<MonthlyTrendPoint> {
        let mut by_month: BTreeMap<String, (Decimal, u64)> = BTreeMap::new();
        for expense in matching {
            let key = format!("{:04}-{:02}", expense.date.year(), expense.date.month());
            let entry = by_month.entry(key).or_default();
            entry.0 += expense.amount;
            entry.1 += 1;
        }

        by_month
            .into_iter()
            .map(|(month, (amount, expense_count))| MonthlyTrendPoint {
                month,
                amount,
                expense_count,
            })
            .collect()
    }

    /// Sums visible active budgets overlapping the range and computes
    /// the variance of actual spend against that sum.
    fn budget_vs_actual(budgets: &[Budget], range: &DateRange, actual: Decimal) -> BudgetVsActual {
        let budget_amount: Decimal = budgets
            .iter()
            .filter(|b| b.is_active)
            .filter(|b| b.overlaps(range.start, range.end))
            .map(|b| b.amount)
            .sum();

        let variance = actual - budget_amount;
        let variance_percentage = if budget_amount.is_zero() {
            Decimal::ZERO
        } else {
            (variance / budget_amount * Decimal::ONE_HUNDRED).round_dp(2)
        };

        BudgetVsActual {
            budget_amount,
            actual_amount: actual,
            variance,
            variance_percentage,
        }
    }
}

/// Analytics engine: scope-narrowed aggregation over the store ports.
pub struct AnalyticsEngine<S> {
    store: Arc<S>,
}

impl<S> AnalyticsEngine<S>
where
    S: ExpenseStore + BudgetStore + DirectoryStore,
{
    /// Creates a new analytics engine.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Aggregates visible expenses and budgets over a date range.
    ///
    /// The visibility scope is resolved once; expenses are then
    /// narrowed with the returned predicate. Budget visibility for the
    /// variance section is all active budgets for admins and the
    /// actor's own budgets otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError` failures for unknown actors and `Store` for
    /// backend failures.
    pub async fn aggregate(
        &self,
        actor: &Actor,
        range: DateRange,
    ) -> Result<SpendingReport, AnalyticsError> {
        let scope = ScopeResolver::resolve(&*self.store, actor).await?;

        let expenses: Vec<_> = self
            .store
            .list_expenses_in_range(range.start, range.end)
            .await
            .map_err(|e| AnalyticsError::Store(e.to_string()))?
            .into_iter()
            .filter(|e| scope.allows(e.owner_id, e.team_id))
            .collect();

        let budgets = if scope.is_all() {
            self.store.list_active_budgets().await
        } else {
            self.store.list_active_budgets_for_owner(actor.id).await
        }
        .map_err(|e| AnalyticsError::Store(e.to_string()))?;

        let report = AnalyticsService::build_report(&expenses, &budgets, &range);
        debug!(
            actor_id = %actor.id,
            expense_count = report.expense_count,
            total = %report.total_amount,
            "spending report aggregated"
        );
        Ok(report)
    }
}
