//! Property-based tests for budget utilization.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use spendra_shared::types::{BudgetId, CategoryId, ExpenseId, UserId};
use uuid::Uuid;

use super::service::BudgetService;
use super::types::{Budget, BudgetPeriod};
use crate::expense::Expense;
use crate::lifecycle::ExpenseStatus;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn arb_status() -> impl Strategy<Value = ExpenseStatus> {
    prop_oneof![
        Just(ExpenseStatus::Draft),
        Just(ExpenseStatus::Pending),
        Just(ExpenseStatus::Approved),
        Just(ExpenseStatus::Rejected),
        Just(ExpenseStatus::Paid),
    ]
}

/// Amounts in cents, as 2dp decimals.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_expense(owner: UserId, category: CategoryId) -> impl Strategy<Value = Expense> {
    (arb_amount(), 1u32..=28, arb_status()).prop_map(move |(amount, day, status)| {
        let audit = status.requires_approval_audit();
        Expense {
            id: ExpenseId::from_uuid(Uuid::now_v7()),
            owner_id: owner,
            category_id: category,
            amount,
            date: date(2026, 6, day),
            description: String::new(),
            status,
            approver_id: audit.then(UserId::new),
            approved_at: audit.then(Utc::now),
            team_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    })
}

fn fixed_ids() -> (UserId, CategoryId) {
    (
        UserId::from_uuid(Uuid::from_u128(1)),
        CategoryId::from_uuid(Uuid::from_u128(2)),
    )
}

fn budget(amount: Decimal, threshold: Decimal) -> Budget {
    let (owner, _) = fixed_ids();
    Budget {
        id: BudgetId::from_uuid(Uuid::from_u128(3)),
        owner_id: owner,
        category_id: None,
        amount,
        period: BudgetPeriod::Monthly,
        start_date: date(2026, 6, 1),
        end_date: date(2026, 6, 30),
        alert_threshold: threshold,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Evaluation is a pure projection: re-running it with no
    /// intervening mutation yields identical output.
    #[test]
    fn prop_evaluate_is_idempotent(
        amount in arb_amount(),
        threshold in (0i64..=100).prop_map(Decimal::from),
        expenses in {
            let (owner, category) = fixed_ids();
            prop::collection::vec(arb_expense(owner, category), 0..12)
        },
    ) {
        let b = budget(amount, threshold);
        let first = BudgetService::evaluate(&b, &expenses, date(2026, 6, 30));
        let second = BudgetService::evaluate(&b, &expenses, date(2026, 6, 30));
        prop_assert_eq!(first, second);
    }

    /// Spent equals the sum of approved and paid expenses in the
    /// window, and remaining is always `amount - spent`.
    #[test]
    fn prop_spent_matches_manual_sum(
        amount in arb_amount(),
        expenses in {
            let (owner, category) = fixed_ids();
            prop::collection::vec(arb_expense(owner, category), 0..12)
        },
    ) {
        let b = budget(amount, Decimal::from(80));
        let result = BudgetService::evaluate(&b, &expenses, date(2026, 6, 30));

        let expected: Decimal = expenses
            .iter()
            .filter(|e| e.status.counts_as_spend())
            .map(|e| e.amount)
            .sum();
        prop_assert_eq!(result.spent, expected);
        prop_assert_eq!(result.remaining, b.amount - expected);
        prop_assert_eq!(result.is_over_budget, expected > b.amount);
    }

    /// A zero-amount budget always evaluates to zero utilization, never
    /// an arithmetic error.
    #[test]
    fn prop_zero_budget_is_zero_utilization(
        expenses in {
            let (owner, category) = fixed_ids();
            prop::collection::vec(arb_expense(owner, category), 0..12)
        },
    ) {
        let b = budget(Decimal::ZERO, Decimal::from(80));
        let result = BudgetService::evaluate(&b, &expenses, date(2026, 6, 30));
        prop_assert_eq!(result.utilization_percent, Decimal::ZERO);
    }

    /// The alert flag agrees with the threshold comparison expressed
    /// without division.
    #[test]
    fn prop_alert_matches_threshold(
        amount in (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2)),
        threshold in (0i64..=100).prop_map(Decimal::from),
        expenses in {
            let (owner, category) = fixed_ids();
            prop::collection::vec(arb_expense(owner, category), 0..12)
        },
    ) {
        let b = budget(amount, threshold);
        let result = BudgetService::evaluate(&b, &expenses, date(2026, 6, 30));
        let expected = result.spent * Decimal::ONE_HUNDRED >= threshold * b.amount;
        prop_assert_eq!(result.alert_triggered, expected);
    }
}
