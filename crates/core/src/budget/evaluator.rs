//! Budget orchestration over the store ports.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use spendra_shared::types::{BudgetId, CategoryId, UserId};
use tracing::{debug, info};

use super::error::BudgetError;
use super::service::BudgetService;
use super::types::{Budget, BudgetUtilization, CreateBudgetInput};
use crate::scope::{Actor, Role, ScopeError, ScopeResolver};
use crate::store::{BudgetStore, DirectoryStore, ExpenseStore, StoreError};

/// Budget engine: creation, deactivation, and on-demand utilization.
///
/// Utilization reads always recompute from the store's current state;
/// no cached value is ever trusted.
pub struct BudgetEngine<S> {
    store: Arc<S>,
}

impl<S> BudgetEngine<S>
where
    S: ExpenseStore + BudgetStore + DirectoryStore,
{
    /// Creates a new budget engine.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a new active budget.
    ///
    /// Only the owner or an admin may create a budget for a user. The
    /// category, when scoped, must exist and accept new assignments.
    ///
    /// # Errors
    ///
    /// Returns validation errors per [`BudgetService::validate`], plus
    /// `Unauthorized`, `CategoryNotFound`, or `CategoryInactive`.
    pub async fn create_budget(
        &self,
        actor: &Actor,
        input: CreateBudgetInput,
    ) -> Result<Budget, BudgetError> {
        BudgetService::validate(&input)?;

        let budget_id = BudgetId::new();
        let stored = self.refresh_actor(actor.id).await?;
        if input.owner_id != actor.id && stored.role != Role::Admin {
            return Err(BudgetError::Unauthorized {
                actor_id: actor.id,
                budget_id,
            });
        }

        if let Some(category_id) = input.category_id {
            let category = self
                .store
                .find_category(category_id)
                .await
                .map_err(store_err)?
                .ok_or(BudgetError::CategoryNotFound(category_id))?;
            if !category.is_active {
                return Err(BudgetError::CategoryInactive(category_id));
            }
        }

        let now = Utc::now();
        let budget = Budget {
            id: budget_id,
            owner_id: input.owner_id,
            category_id: input.category_id,
            amount: input.amount,
            period: input.period,
            start_date: input.start_date,
            end_date: input.end_date,
            alert_threshold: input.alert_threshold,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert_budget(budget).await.map_err(store_err)?;
        info!(budget_id = %created.id, owner_id = %created.owner_id, "budget created");
        Ok(created)
    }

    /// Deactivates a budget, keeping the record for historical analytics.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Unauthorized`.
    pub async fn deactivate_budget(
        &self,
        actor: &Actor,
        budget_id: BudgetId,
    ) -> Result<Budget, BudgetError> {
        let budget = self
            .store
            .find_budget(budget_id)
            .await
            .map_err(store_err)?
            .ok_or(BudgetError::NotFound(budget_id))?;

        let stored = self.refresh_actor(actor.id).await?;
        if budget.owner_id != actor.id && stored.role != Role::Admin {
            return Err(BudgetError::Unauthorized {
                actor_id: actor.id,
                budget_id,
            });
        }

        let updated = match self.store.deactivate_budget(budget_id).await {
            Ok(b) => b,
            Err(StoreError::NotFound) => return Err(BudgetError::NotFound(budget_id)),
            Err(e) => return Err(store_err(e)),
        };
        info!(budget_id = %budget_id, "budget deactivated");
        Ok(updated)
    }

    /// Evaluates a budget's utilization as of a date.
    ///
    /// Visibility follows the scope predicate: owners always qualify,
    /// admins see everything, and a manager may evaluate a roster
    /// member's budget.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the budget is unknown and `Unauthorized`
    /// if the actor is outside the budget's visibility scope.
    pub async fn utilization(
        &self,
        actor: &Actor,
        budget_id: BudgetId,
        as_of: NaiveDate,
    ) -> Result<BudgetUtilization, BudgetError> {
        let budget = self
            .store
            .find_budget(budget_id)
            .await
            .map_err(store_err)?
            .ok_or(BudgetError::NotFound(budget_id))?;

        let scope = ScopeResolver::resolve(&*self.store, actor).await?;
        if !scope.allows(budget.owner_id, None) {
            return Err(BudgetError::Unauthorized {
                actor_id: actor.id,
                budget_id,
            });
        }

        let expenses = self
            .store
            .list_expenses_by_owner(budget.owner_id)
            .await
            .map_err(store_err)?;

        let result = BudgetService::evaluate(&budget, &expenses, as_of);
        debug!(
            budget_id = %budget_id,
            spent = %result.spent,
            utilization = %result.utilization_percent,
            "budget evaluated"
        );
        Ok(result)
    }

    /// Evaluates every active budget covering `(owner_id, category_id)`.
    ///
    /// Used by the lifecycle engine around transitions that change
    /// approved spend.
    pub async fn evaluate_matching(
        &self,
        owner_id: UserId,
        category_id: CategoryId,
        as_of: NaiveDate,
    ) -> Result<Vec<BudgetUtilization>, BudgetError> {
        let budgets = self
            .store
            .list_active_budgets_for_owner(owner_id)
            .await
            .map_err(store_err)?;
        let expenses = self
            .store
            .list_expenses_by_owner(owner_id)
            .await
            .map_err(store_err)?;

        Ok(budgets
            .iter()
            .filter(|b| b.covers_category(category_id))
            .map(|b| BudgetService::evaluate(b, &expenses, as_of))
            .collect())
    }

    async fn refresh_actor(&self, id: UserId) -> Result<Actor, BudgetError> {
        self.store
            .find_actor(id)
            .await
            .map_err(store_err)?
            .ok_or_else(|| ScopeError::ActorNotFound(id).into())
    }
}

fn store_err(e: StoreError) -> BudgetError {
    BudgetError::Store(e.to_string())
}
