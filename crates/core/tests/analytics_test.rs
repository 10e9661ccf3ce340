//! End-to-end analytics and budget utilization tests.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use spendra_shared::types::{CategoryId, TeamId, UserId};

use spendra_core::analytics::{AnalyticsEngine, DateRange};
use spendra_core::budget::{BudgetEngine, BudgetError, BudgetPeriod, CreateBudgetInput};
use spendra_core::category::Category;
use spendra_core::expense::CreateExpenseInput;
use spendra_core::lifecycle::LifecycleEngine;
use spendra_core::scope::{Actor, Role, Team};
use spendra_core::store::MemoryStore;

struct Fixture {
    lifecycle: LifecycleEngine<MemoryStore, MemoryStore>,
    analytics: AnalyticsEngine<MemoryStore>,
    budgets: BudgetEngine<MemoryStore>,
    admin: Actor,
    manager: Actor,
    member: Actor,
    outsider: Actor,
    category_id: CategoryId,
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let lifecycle = LifecycleEngine::new(Arc::clone(&store), Arc::clone(&store));
    let analytics = AnalyticsEngine::new(Arc::clone(&store));
    let budgets = BudgetEngine::new(Arc::clone(&store));

    let admin = Actor::new(UserId::new(), Role::Admin);
    let manager = Actor::new(UserId::new(), Role::Manager);
    let member = Actor::new(UserId::new(), Role::User);
    let outsider = Actor::new(UserId::new(), Role::User);
    for actor in [admin, manager, member, outsider] {
        store.add_actor(actor);
    }

    store.add_team(Team {
        id: TeamId::new(),
        manager_id: manager.id,
        member_ids: [member.id].into(),
    });

    let category = Category::new("Office", None);
    let category_id = category.id;
    store.add_category(category).unwrap();

    Fixture {
        lifecycle,
        analytics,
        budgets,
        admin,
        manager,
        member,
        outsider,
        category_id,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn add_expense(fx: &Fixture, owner: &Actor, amount: rust_decimal::Decimal, on: NaiveDate) {
    fx.lifecycle
        .create_expense(
            owner,
            CreateExpenseInput {
                owner_id: owner.id,
                category_id: fx.category_id,
                amount,
                date: on,
                description: "Supplies".to_string(),
                team_id: None,
            },
        )
        .await
        .unwrap();
}

fn july() -> DateRange {
    DateRange::new(date(2026, 7, 1), date(2026, 7, 31)).unwrap()
}

#[tokio::test]
async fn test_visibility_narrows_aggregation_by_role() {
    let fx = fixture();
    add_expense(&fx, &fx.member, dec!(100.00), date(2026, 7, 5)).await;
    add_expense(&fx, &fx.manager, dec!(40.00), date(2026, 7, 6)).await;
    add_expense(&fx, &fx.outsider, dec!(7.00), date(2026, 7, 7)).await;

    // Admin sees everything.
    let report = fx.analytics.aggregate(&fx.admin, july()).await.unwrap();
    assert_eq!(report.total_amount, dec!(147.00));
    assert_eq!(report.expense_count, 3);

    // Manager sees own plus roster members', even with no team tag on
    // the expense.
    let report = fx.analytics.aggregate(&fx.manager, july()).await.unwrap();
    assert_eq!(report.total_amount, dec!(140.00));
    assert_eq!(report.expense_count, 2);

    // A user sees only their own records.
    let report = fx.analytics.aggregate(&fx.member, july()).await.unwrap();
    assert_eq!(report.total_amount, dec!(100.00));
    assert_eq!(report.expense_count, 1);

    let report = fx.analytics.aggregate(&fx.outsider, july()).await.unwrap();
    assert_eq!(report.total_amount, dec!(7.00));
    assert_eq!(report.expense_count, 1);
}

#[tokio::test]
async fn test_budget_vs_actual_uses_own_budgets_for_non_admins() {
    let fx = fixture();
    add_expense(&fx, &fx.member, dec!(100.00), date(2026, 7, 5)).await;

    fx.budgets
        .create_budget(
            &fx.member,
            CreateBudgetInput {
                owner_id: fx.member.id,
                category_id: None,
                amount: dec!(300),
                period: BudgetPeriod::Monthly,
                start_date: date(2026, 7, 1),
                end_date: date(2026, 7, 31),
                alert_threshold: dec!(80),
            },
        )
        .await
        .unwrap();

    // The member's own budget backs their variance section.
    let report = fx.analytics.aggregate(&fx.member, july()).await.unwrap();
    assert_eq!(report.budget_vs_actual.budget_amount, dec!(300));
    assert_eq!(report.budget_vs_actual.variance, dec!(-200.00));

    // The manager owns no budget, so their variance is against zero.
    let report = fx.analytics.aggregate(&fx.manager, july()).await.unwrap();
    assert_eq!(report.budget_vs_actual.budget_amount, dec!(0));
    assert_eq!(report.budget_vs_actual.variance_percentage, dec!(0));

    // Admin aggregates across all active budgets.
    let report = fx.analytics.aggregate(&fx.admin, july()).await.unwrap();
    assert_eq!(report.budget_vs_actual.budget_amount, dec!(300));
}

#[tokio::test]
async fn test_utilization_recomputes_after_approval() {
    let fx = fixture();
    let budget = fx
        .budgets
        .create_budget(
            &fx.member,
            CreateBudgetInput {
                owner_id: fx.member.id,
                category_id: Some(fx.category_id),
                amount: dec!(200),
                period: BudgetPeriod::Monthly,
                start_date: date(2026, 7, 1),
                end_date: date(2026, 7, 31),
                alert_threshold: dec!(80),
            },
        )
        .await
        .unwrap();

    let expense = fx
        .lifecycle
        .create_expense(
            &fx.member,
            CreateExpenseInput {
                owner_id: fx.member.id,
                category_id: fx.category_id,
                amount: dec!(50.00),
                date: date(2026, 7, 10),
                description: "Chairs".to_string(),
                team_id: None,
            },
        )
        .await
        .unwrap();

    let as_of = date(2026, 7, 31);

    // Draft and pending expenses contribute nothing.
    let utilization = fx
        .budgets
        .utilization(&fx.member, budget.id, as_of)
        .await
        .unwrap();
    assert_eq!(utilization.spent, dec!(0));

    fx.lifecycle.submit(&fx.member, expense.id).await.unwrap();
    fx.lifecycle.approve(&fx.manager, expense.id).await.unwrap();

    let utilization = fx
        .budgets
        .utilization(&fx.member, budget.id, as_of)
        .await
        .unwrap();
    assert_eq!(utilization.spent, dec!(50.00));
    assert_eq!(utilization.remaining, dec!(150.00));
    assert_eq!(utilization.utilization_percent, dec!(25.00));
    assert!(!utilization.alert_triggered);

    // Re-reading yields the identical projection.
    let again = fx
        .budgets
        .utilization(&fx.member, budget.id, as_of)
        .await
        .unwrap();
    assert_eq!(again, utilization);
}

#[tokio::test]
async fn test_utilization_visibility() {
    let fx = fixture();
    let budget = fx
        .budgets
        .create_budget(
            &fx.member,
            CreateBudgetInput {
                owner_id: fx.member.id,
                category_id: None,
                amount: dec!(100),
                period: BudgetPeriod::Monthly,
                start_date: date(2026, 7, 1),
                end_date: date(2026, 7, 31),
                alert_threshold: dec!(80),
            },
        )
        .await
        .unwrap();

    let as_of = date(2026, 7, 31);

    // Owner, managing manager, and admin may evaluate.
    assert!(fx.budgets.utilization(&fx.member, budget.id, as_of).await.is_ok());
    assert!(fx.budgets.utilization(&fx.manager, budget.id, as_of).await.is_ok());
    assert!(fx.budgets.utilization(&fx.admin, budget.id, as_of).await.is_ok());

    // An unrelated user may not.
    let result = fx.budgets.utilization(&fx.outsider, budget.id, as_of).await;
    assert!(matches!(result, Err(BudgetError::Unauthorized { .. })));
}

#[tokio::test]
async fn test_user_cannot_create_budget_for_someone_else() {
    let fx = fixture();
    let result = fx
        .budgets
        .create_budget(
            &fx.outsider,
            CreateBudgetInput {
                owner_id: fx.member.id,
                category_id: None,
                amount: dec!(100),
                period: BudgetPeriod::Monthly,
                start_date: date(2026, 7, 1),
                end_date: date(2026, 7, 31),
                alert_threshold: dec!(80),
            },
        )
        .await;
    assert!(matches!(result, Err(BudgetError::Unauthorized { .. })));

    // Admin may.
    let result = fx
        .budgets
        .create_budget(
            &fx.admin,
            CreateBudgetInput {
                owner_id: fx.member.id,
                category_id: None,
                amount: dec!(100),
                period: BudgetPeriod::Monthly,
                start_date: date(2026, 7, 1),
                end_date: date(2026, 7, 31),
                alert_threshold: dec!(80),
            },
        )
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_deactivated_budget_leaves_history_but_exits_analytics() {
    let fx = fixture();
    let budget = fx
        .budgets
        .create_budget(
            &fx.member,
            CreateBudgetInput {
                owner_id: fx.member.id,
                category_id: None,
                amount: dec!(100),
                period: BudgetPeriod::Monthly,
                start_date: date(2026, 7, 1),
                end_date: date(2026, 7, 31),
                alert_threshold: dec!(80),
            },
        )
        .await
        .unwrap();

    fx.budgets
        .deactivate_budget(&fx.member, budget.id)
        .await
        .unwrap();

    let report = fx.analytics.aggregate(&fx.member, july()).await.unwrap();
    assert_eq!(report.budget_vs_actual.budget_amount, dec!(0));

    // On-demand evaluation still works against the retained record.
    let utilization = fx
        .budgets
        .utilization(&fx.member, budget.id, date(2026, 7, 31))
        .await
        .unwrap();
    assert_eq!(utilization.spent, dec!(0));
}

#[tokio::test]
async fn test_unknown_actor_cannot_aggregate() {
    let fx = fixture();
    let ghost = Actor::new(UserId::new(), Role::Admin);
    let result = fx.analytics.aggregate(&ghost, july()).await;
    assert!(result.is_err());
}
