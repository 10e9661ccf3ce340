//! Data-access ports.
//!
//! The engine is a pure function of the data store's current state plus
//! pre-validated input; these traits are the seam toward the excluded
//! persistence layer. Implementations provide per-record atomicity and a
//! conditional status update (compare-and-swap) but no multi-statement
//! transactional isolation.
//!
//! # Modules
//!
//! - `memory` - In-memory reference implementation for tests and embedders

pub mod memory;

use chrono::NaiveDate;
use spendra_shared::types::{BudgetId, CategoryId, ExpenseId, TeamId, UserId};
use thiserror::Error;

use crate::budget::types::Budget;
use crate::category::Category;
use crate::expense::Expense;
use crate::lifecycle::{ExpenseStatus, LifecycleAction};
use crate::scope::{Actor, Team};

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced record does not exist.
    #[error("record not found")]
    NotFound,

    /// A conditional update observed a different status than expected.
    #[error("concurrent update conflict: expected {expected}, found {found}")]
    Conflict {
        /// The status the caller expected.
        expected: ExpenseStatus,
        /// The status actually stored.
        found: ExpenseStatus,
    },

    /// Backend failure (connection, query, serialization).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Expense persistence port.
pub trait ExpenseStore: Send + Sync {
    /// Fetches an expense by id.
    fn find_expense(
        &self,
        id: ExpenseId,
    ) -> impl std::future::Future<Output = Result<Option<Expense>, StoreError>> + Send;

    /// Lists all expenses owned by a user.
    fn list_expenses_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Expense>, StoreError>> + Send;

    /// Lists all expenses tagged with a team.
    fn list_expenses_by_team(
        &self,
        team_id: TeamId,
    ) -> impl std::future::Future<Output = Result<Vec<Expense>, StoreError>> + Send;

    /// Lists all expenses dated within `[start, end]` (inclusive).
    fn list_expenses_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<Expense>, StoreError>> + Send;

    /// Inserts a new expense record.
    fn insert_expense(
        &self,
        expense: Expense,
    ) -> impl std::future::Future<Output = Result<Expense, StoreError>> + Send;

    /// Replaces an expense record (owner edits of draft fields).
    fn update_expense(
        &self,
        expense: Expense,
    ) -> impl std::future::Future<Output = Result<Expense, StoreError>> + Send;

    /// Conditionally applies a lifecycle action.
    ///
    /// The status change and its approval audit fields are applied as a
    /// single compare-and-swap on the current status: if the stored
    /// status differs from `expected`, the update is not applied and
    /// `StoreError::Conflict` is returned so the caller can surface the
    /// lost race.
    fn update_expense_status(
        &self,
        id: ExpenseId,
        expected: ExpenseStatus,
        action: &LifecycleAction,
    ) -> impl std::future::Future<Output = Result<Expense, StoreError>> + Send;
}

/// Budget persistence port.
pub trait BudgetStore: Send + Sync {
    /// Fetches a budget by id.
    fn find_budget(
        &self,
        id: BudgetId,
    ) -> impl std::future::Future<Output = Result<Option<Budget>, StoreError>> + Send;

    /// Lists active budgets owned by a user.
    fn list_active_budgets_for_owner(
        &self,
        owner_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Budget>, StoreError>> + Send;

    /// Lists all active budgets.
    fn list_active_budgets(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Budget>, StoreError>> + Send;

    /// Inserts a new budget record.
    fn insert_budget(
        &self,
        budget: Budget,
    ) -> impl std::future::Future<Output = Result<Budget, StoreError>> + Send;

    /// Deactivates a budget. Budgets are never hard-deleted so that
    /// historical analytics remain reproducible.
    fn deactivate_budget(
        &self,
        id: BudgetId,
    ) -> impl std::future::Future<Output = Result<Budget, StoreError>> + Send;
}

/// Directory port for actors, teams, and categories.
pub trait DirectoryStore: Send + Sync {
    /// Fetches an actor by user id.
    fn find_actor(
        &self,
        id: UserId,
    ) -> impl std::future::Future<Output = Result<Option<Actor>, StoreError>> + Send;

    /// Fetches a team by id.
    fn find_team(
        &self,
        id: TeamId,
    ) -> impl std::future::Future<Output = Result<Option<Team>, StoreError>> + Send;

    /// Lists teams managed by a user.
    fn teams_managed_by(
        &self,
        manager_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Team>, StoreError>> + Send;

    /// Lists teams whose roster includes a user.
    fn teams_of_member(
        &self,
        member_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Team>, StoreError>> + Send;

    /// Lists all admin user ids.
    fn list_admins(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<UserId>, StoreError>> + Send;

    /// Fetches a category by id.
    fn find_category(
        &self,
        id: CategoryId,
    ) -> impl std::future::Future<Output = Result<Option<Category>, StoreError>> + Send;
}

pub use memory::MemoryStore;
