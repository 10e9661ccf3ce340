//! In-memory store implementation.
//!
//! Backs the engine for tests and for embedders that do not need
//! durable storage. Provides the same per-record atomicity contract as
//! a real backend: the conditional status update takes the expense map
//! lock for the whole compare-and-swap, so concurrent transitions on
//! the same expense serialize and exactly one wins.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use spendra_shared::types::{BudgetId, CategoryId, ExpenseId, TeamId, UserId};

use super::{BudgetStore, DirectoryStore, ExpenseStore, StoreError};
use crate::budget::types::Budget;
use crate::category::{Category, CategoryArena, CategoryError};
use crate::expense::Expense;
use crate::lifecycle::{ExpenseStatus, LifecycleAction};
use crate::notification::{NotificationRequest, NotificationSink};
use crate::scope::{Actor, Team};

/// In-memory store for all engine ports.
#[derive(Debug, Default)]
pub struct MemoryStore {
    expenses: Mutex<HashMap<ExpenseId, Expense>>,
    budgets: Mutex<HashMap<BudgetId, Budget>>,
    actors: Mutex<HashMap<UserId, Actor>>,
    teams: Mutex<HashMap<TeamId, Team>>,
    categories: Mutex<CategoryArena>,
    notifications: Mutex<Vec<NotificationRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Backend("poisoned lock".to_string()))
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an actor in the directory.
    pub fn add_actor(&self, actor: Actor) {
        if let Ok(mut actors) = self.actors.lock() {
            actors.insert(actor.id, actor);
        }
    }

    /// Registers a team in the directory.
    pub fn add_team(&self, team: Team) {
        if let Ok(mut teams) = self.teams.lock() {
            teams.insert(team.id, team);
        }
    }

    /// Inserts a category, validating forest invariants.
    ///
    /// # Errors
    ///
    /// Propagates [`CategoryArena::insert`] errors.
    pub fn add_category(&self, category: Category) -> Result<(), CategoryError> {
        let mut categories = self
            .categories
            .lock()
            .map_err(|_| CategoryError::Store("poisoned lock".to_string()))?;
        categories.insert(category)
    }

    /// Marks a category inactive.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` for an unknown id.
    pub fn deactivate_category(&self, id: CategoryId) -> Result<(), CategoryError> {
        let mut categories = self
            .categories
            .lock()
            .map_err(|_| CategoryError::Store("poisoned lock".to_string()))?;
        categories.deactivate(id)
    }

    /// Snapshot of all notifications enqueued so far.
    #[must_use]
    pub fn sent_notifications(&self) -> Vec<NotificationRequest> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl ExpenseStore for MemoryStore {
    async fn find_expense(&self, id: ExpenseId) -> Result<Option<Expense>, StoreError> {
        Ok(lock(&self.expenses)?.get(&id).cloned())
    }

    async fn list_expenses_by_owner(&self, owner_id: UserId) -> Result<Vec<Expense>, StoreError> {
        Ok(lock(&self.expenses)?
            .values()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn list_expenses_by_team(&self, team_id: TeamId) -> Result<Vec<Expense>, StoreError> {
        Ok(lock(&self.expenses)?
            .values()
            .filter(|e| e.team_id == Some(team_id))
            .cloned()
            .collect())
    }

    async fn list_expenses_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>, StoreError> {
        Ok(lock(&self.expenses)?
            .values()
            .filter(|e| e.date >= start && e.date <= end)
            .cloned()
            .collect())
    }

    async fn insert_expense(&self, expense: Expense) -> Result<Expense, StoreError> {
        lock(&self.expenses)?.insert(expense.id, expense.clone());
        Ok(expense)
    }

    async fn update_expense(&self, expense: Expense) -> Result<Expense, StoreError> {
        let mut expenses = lock(&self.expenses)?;
        if !expenses.contains_key(&expense.id) {
            return Err(StoreError::NotFound);
        }
        expenses.insert(expense.id, expense.clone());
        Ok(expense)
    }

    async fn update_expense_status(
        &self,
        id: ExpenseId,
        expected: ExpenseStatus,
        action: &LifecycleAction,
    ) -> Result<Expense, StoreError> {
        let mut expenses = lock(&self.expenses)?;
        let expense = expenses.get_mut(&id).ok_or(StoreError::NotFound)?;

        if expense.status != expected {
            return Err(StoreError::Conflict {
                expected,
                found: expense.status,
            });
        }

        expense.status = action.new_status();
        if let Some((approver_id, approved_at)) = action.approval_audit() {
            expense.approver_id = Some(approver_id);
            expense.approved_at = Some(approved_at);
        } else if action.clears_approval_audit() {
            expense.approver_id = None;
            expense.approved_at = None;
        }
        expense.updated_at = Utc::now();

        Ok(expense.clone())
    }
}

impl BudgetStore for MemoryStore {
    async fn find_budget(&self, id: BudgetId) -> Result<Option<Budget>, StoreError> {
        Ok(lock(&self.budgets)?.get(&id).cloned())
    }

    async fn list_active_budgets_for_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<Budget>, StoreError> {
        Ok(lock(&self.budgets)?
            .values()
            .filter(|b| b.is_active && b.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn list_active_budgets(&self) -> Result<Vec<Budget>, StoreError> {
        Ok(lock(&self.budgets)?
            .values()
            .filter(|b| b.is_active)
            .cloned()
            .collect())
    }

    async fn insert_budget(&self, budget: Budget) -> Result<Budget, StoreError> {
        lock(&self.budgets)?.insert(budget.id, budget.clone());
        Ok(budget)
    }

    async fn deactivate_budget(&self, id: BudgetId) -> Result<Budget, StoreError> {
        let mut budgets = lock(&self.budgets)?;
        let budget = budgets.get_mut(&id).ok_or(StoreError::NotFound)?;
        budget.is_active = false;
        budget.updated_at = Utc::now();
        Ok(budget.clone())
    }
}

impl DirectoryStore for MemoryStore {
    async fn find_actor(&self, id: UserId) -> Result<Option<Actor>, StoreError> {
        Ok(lock(&self.actors)?.get(&id).copied())
    }

    async fn find_team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        Ok(lock(&self.teams)?.get(&id).cloned())
    }

    async fn teams_managed_by(&self, manager_id: UserId) -> Result<Vec<Team>, StoreError> {
        Ok(lock(&self.teams)?
            .values()
            .filter(|t| t.manager_id == manager_id)
            .cloned()
            .collect())
    }

    async fn teams_of_member(&self, member_id: UserId) -> Result<Vec<Team>, StoreError> {
        Ok(lock(&self.teams)?
            .values()
            .filter(|t| t.has_member(member_id))
            .cloned()
            .collect())
    }

    async fn list_admins(&self) -> Result<Vec<UserId>, StoreError> {
        Ok(lock(&self.actors)?
            .values()
            .filter(|a| a.role == crate::scope::Role::Admin)
            .map(|a| a.id)
            .collect())
    }

    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(lock(&self.categories)?.get(id).cloned())
    }
}

impl NotificationSink for MemoryStore {
    async fn enqueue(&self, request: NotificationRequest) {
        // Fire-and-forget: a poisoned lock drops the notification, which
        // the sink contract allows.
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(request);
        }
    }
}
