//! Lifecycle orchestration: fetch, authorize, transition, side effects.
//!
//! The engine composes the scope resolver, the pure state machine, and
//! the store ports. Guard check and write are expressed as a single
//! conditional update (compare-and-swap on the current status) so that
//! of two concurrent approvers exactly one wins; the loser observes
//! `Conflict`. Budget re-evaluation runs to completion inside the
//! transition call, so subsequent utilization reads are authoritative.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use spendra_shared::types::{BudgetId, CategoryId, ExpenseId, UserId};
use tracing::{debug, info, warn};

use super::error::LifecycleError;
use super::service::LifecycleService;
use super::types::{ExpenseStatus, LifecycleAction};
use crate::budget::{BudgetEngine, BudgetUtilization};
use crate::expense::{CreateExpenseInput, Expense, UpdateExpenseInput};
use crate::notification::{NotificationKind, NotificationRequest, NotificationSink};
use crate::scope::{Actor, Role, ScopeResolver, VisibilityScope};
use crate::store::{BudgetStore, DirectoryStore, ExpenseStore, StoreError};

/// Expense lifecycle engine.
pub struct LifecycleEngine<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> LifecycleEngine<S, N>
where
    S: ExpenseStore + BudgetStore + DirectoryStore,
    N: NotificationSink,
{
    /// Creates a new lifecycle engine.
    #[must_use]
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    /// Creates a new draft expense.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the actor is not the owner,
    /// `NonPositiveAmount` for an invalid amount, or a category error
    /// if the category does not accept new assignments.
    pub async fn create_expense(
        &self,
        actor: &Actor,
        input: CreateExpenseInput,
    ) -> Result<Expense, LifecycleError> {
        let expense_id = ExpenseId::new();
        if input.owner_id != actor.id {
            return Err(LifecycleError::Unauthorized {
                actor_id: actor.id,
                role: actor.role,
                expense_id,
            });
        }

        let amount = LifecycleService::validate_amount(input.amount)?;
        self.check_category_assignable(input.category_id).await?;

        let now = Utc::now();
        let expense = Expense {
            id: expense_id,
            owner_id: input.owner_id,
            category_id: input.category_id,
            amount,
            date: input.date,
            description: input.description,
            status: ExpenseStatus::Draft,
            approver_id: None,
            approved_at: None,
            team_id: input.team_id,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .store
            .insert_expense(expense)
            .await
            .map_err(store_err)?;
        debug!(expense_id = %created.id, owner_id = %created.owner_id, "expense drafted");
        Ok(created)
    }

    /// Mutates an owner-editable expense (draft or rejected).
    ///
    /// Only amount, category, and description may change; everything
    /// else is immutable once submitted.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` outside draft/rejected, `Unauthorized` for
    /// non-owners, plus amount/category validation errors.
    pub async fn update_expense(
        &self,
        actor: &Actor,
        expense_id: ExpenseId,
        input: UpdateExpenseInput,
    ) -> Result<Expense, LifecycleError> {
        let mut expense = self.fetch(expense_id).await?;

        if expense.owner_id != actor.id {
            return Err(LifecycleError::Unauthorized {
                actor_id: actor.id,
                role: actor.role,
                expense_id,
            });
        }
        if !expense.status.is_owner_editable() {
            return Err(LifecycleError::NotEditable {
                expense_id,
                status: expense.status,
            });
        }

        if let Some(amount) = input.amount {
            expense.amount = LifecycleService::validate_amount(amount)?;
        }
        if let Some(category_id) = input.category_id {
            self.check_category_assignable(category_id).await?;
            expense.category_id = category_id;
        }
        if let Some(description) = input.description {
            expense.description = description;
        }
        expense.updated_at = Utc::now();

        self.store.update_expense(expense).await.map_err(store_err)
    }

    /// Submits a draft expense for approval.
    ///
    /// Enqueues an approval-request notification to the resolved
    /// approvers: the owner's team manager(s), else every admin.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-owners, `InvalidTransition`
    /// outside draft, category/amount guard errors, or `Conflict` if a
    /// concurrent transition won.
    pub async fn submit(
        &self,
        actor: &Actor,
        expense_id: ExpenseId,
    ) -> Result<Expense, LifecycleError> {
        let expense = self.fetch(expense_id).await?;

        if expense.owner_id != actor.id {
            return Err(LifecycleError::Unauthorized {
                actor_id: actor.id,
                role: actor.role,
                expense_id,
            });
        }
        self.check_category_assignable(expense.category_id).await?;

        let action = LifecycleService::submit(expense.status, expense.amount, actor.id)?;
        let updated = self.apply(expense_id, expense.status, &action).await?;

        let approvers = self.resolve_approvers(&updated).await?;
        info!(
            expense_id = %expense_id,
            approver_count = approvers.len(),
            "expense submitted for approval"
        );
        self.notifier
            .enqueue(NotificationRequest {
                user_ids: approvers,
                kind: NotificationKind::ApprovalRequest,
                title: "Expense approval requested".to_string(),
                message: format!(
                    "Expense '{}' for {} awaits your approval",
                    updated.description, updated.amount
                ),
                metadata: json!({
                    "expense_id": updated.id,
                    "owner_id": updated.owner_id,
                    "amount": updated.amount,
                }),
            })
            .await;

        Ok(updated)
    }

    /// Approves a pending expense.
    ///
    /// Sets the approval audit fields, re-evaluates every active budget
    /// matching the expense's owner and category, raises budget alerts
    /// for fresh threshold crossings, and notifies the owner.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the actor is not a manager/admin with
    /// the expense in scope, `InvalidTransition` outside pending, or
    /// `Conflict` if a concurrent approver won.
    pub async fn approve(
        &self,
        actor: &Actor,
        expense_id: ExpenseId,
    ) -> Result<Expense, LifecycleError> {
        let expense = self.fetch(expense_id).await?;
        self.authorize_decision(actor, &expense).await?;

        let action = LifecycleService::approve(expense.status, actor.id)?;
        let updated = self
            .transition_with_budget_reeval(&expense, &action)
            .await?;

        info!(expense_id = %expense_id, approver_id = %actor.id, "expense approved");
        self.notify_decision(&updated, NotificationKind::ExpenseApproved)
            .await;
        Ok(updated)
    }

    /// Rejects a pending expense.
    ///
    /// Sets the approval audit fields and notifies the owner. Rejection
    /// does not change approved spend, so no budget re-evaluation runs.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::approve`].
    pub async fn reject(
        &self,
        actor: &Actor,
        expense_id: ExpenseId,
    ) -> Result<Expense, LifecycleError> {
        let expense = self.fetch(expense_id).await?;
        self.authorize_decision(actor, &expense).await?;

        let action = LifecycleService::reject(expense.status, actor.id)?;
        let updated = self.apply(expense_id, expense.status, &action).await?;

        info!(expense_id = %expense_id, approver_id = %actor.id, "expense rejected");
        self.notify_decision(&updated, NotificationKind::ExpenseRejected)
            .await;
        Ok(updated)
    }

    /// Marks an approved expense as paid. Admin only.
    ///
    /// No approval fields change. Matching budgets are re-evaluated;
    /// paid spend equals approved spend, so no fresh alerts fire.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admins, `InvalidTransition`
    /// outside approved, or `Conflict`.
    pub async fn pay(
        &self,
        actor: &Actor,
        expense_id: ExpenseId,
    ) -> Result<Expense, LifecycleError> {
        let expense = self.fetch(expense_id).await?;

        let (scope, role) = self.resolve_scope(actor).await?;
        if !scope.is_all() {
            return Err(LifecycleError::Unauthorized {
                actor_id: actor.id,
                role,
                expense_id,
            });
        }

        let action = LifecycleService::pay(expense.status, actor.id)?;
        let updated = self
            .transition_with_budget_reeval(&expense, &action)
            .await?;
        info!(expense_id = %expense_id, "expense paid");
        Ok(updated)
    }

    /// Reopens a rejected expense back to draft. Owner only.
    ///
    /// Clears the approval audit fields. Resubmission then follows the
    /// ordinary draft → pending path.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-owners, `InvalidTransition`
    /// outside rejected, or `Conflict`.
    pub async fn reopen(
        &self,
        actor: &Actor,
        expense_id: ExpenseId,
    ) -> Result<Expense, LifecycleError> {
        let expense = self.fetch(expense_id).await?;

        if expense.owner_id != actor.id {
            return Err(LifecycleError::Unauthorized {
                actor_id: actor.id,
                role: actor.role,
                expense_id,
            });
        }

        let action = LifecycleService::reopen(expense.status)?;
        let updated = self.apply(expense_id, expense.status, &action).await?;
        debug!(expense_id = %expense_id, "expense reopened to draft");
        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn fetch(&self, expense_id: ExpenseId) -> Result<Expense, LifecycleError> {
        self.store
            .find_expense(expense_id)
            .await
            .map_err(store_err)?
            .ok_or(LifecycleError::ExpenseNotFound(expense_id))
    }

    async fn resolve_scope(
        &self,
        actor: &Actor,
    ) -> Result<(VisibilityScope, Role), LifecycleError> {
        let scope = ScopeResolver::resolve(&*self.store, actor).await?;
        let role = match &scope {
            VisibilityScope::All => Role::Admin,
            VisibilityScope::Managed { .. } => Role::Manager,
            VisibilityScope::Own(_) => Role::User,
        };
        Ok((scope, role))
    }

    /// Approve/reject authorization: a manager or admin with the
    /// expense inside their resolved visibility scope.
    async fn authorize_decision(
        &self,
        actor: &Actor,
        expense: &Expense,
    ) -> Result<(), LifecycleError> {
        let (scope, role) = self.resolve_scope(actor).await?;
        if !role.can_approve() || !scope.allows(expense.owner_id, expense.team_id) {
            return Err(LifecycleError::Unauthorized {
                actor_id: actor.id,
                role,
                expense_id: expense.id,
            });
        }
        Ok(())
    }

    async fn check_category_assignable(
        &self,
        category_id: CategoryId,
    ) -> Result<(), LifecycleError> {
        let category = self
            .store
            .find_category(category_id)
            .await
            .map_err(store_err)?
            .ok_or(LifecycleError::CategoryNotFound(category_id))?;
        if !category.is_active {
            return Err(LifecycleError::CategoryInactive(category_id));
        }
        Ok(())
    }

    /// Applies a lifecycle action as a compare-and-swap on the current
    /// status.
    async fn apply(
        &self,
        expense_id: ExpenseId,
        expected: ExpenseStatus,
        action: &LifecycleAction,
    ) -> Result<Expense, LifecycleError> {
        match self
            .store
            .update_expense_status(expense_id, expected, action)
            .await
        {
            Ok(expense) => Ok(expense),
            Err(StoreError::Conflict { expected, found }) => Err(LifecycleError::Conflict {
                expense_id,
                expected,
                found,
            }),
            Err(StoreError::NotFound) => Err(LifecycleError::ExpenseNotFound(expense_id)),
            Err(e) => Err(store_err(e)),
        }
    }

    /// Applies a transition that moves an expense into or out of the
    /// approved spend set, re-evaluating affected budgets before and
    /// after the write and alerting on fresh threshold crossings.
    async fn transition_with_budget_reeval(
        &self,
        expense: &Expense,
        action: &LifecycleAction,
    ) -> Result<Expense, LifecycleError> {
        let as_of = Utc::now().date_naive();
        let budgets = BudgetEngine::new(Arc::clone(&self.store));

        let before = budgets
            .evaluate_matching(expense.owner_id, expense.category_id, as_of)
            .await?;
        let updated = self.apply(expense.id, expense.status, action).await?;
        let after = budgets
            .evaluate_matching(expense.owner_id, expense.category_id, as_of)
            .await?;

        self.alert_on_crossings(&updated, &before, &after).await;
        Ok(updated)
    }

    /// Enqueues a budget alert for each budget whose alert flag flipped
    /// from false to true across a transition. Evaluations that stay
    /// above threshold do not re-alert.
    async fn alert_on_crossings(
        &self,
        expense: &Expense,
        before: &[BudgetUtilization],
        after: &[BudgetUtilization],
    ) {
        let previously_triggered: HashMap<BudgetId, bool> = before
            .iter()
            .map(|u| (u.budget_id, u.alert_triggered))
            .collect();

        for utilization in after {
            let was_triggered = previously_triggered
                .get(&utilization.budget_id)
                .copied()
                .unwrap_or(false);
            if !utilization.alert_triggered || was_triggered {
                continue;
            }

            warn!(
                budget_id = %utilization.budget_id,
                utilization = %utilization.utilization_percent,
                "budget alert threshold crossed"
            );
            self.notifier
                .enqueue(NotificationRequest {
                    user_ids: vec![expense.owner_id],
                    kind: NotificationKind::BudgetAlert,
                    title: "Budget alert".to_string(),
                    message: format!(
                        "Budget utilization reached {}%",
                        utilization.utilization_percent
                    ),
                    metadata: json!({
                        "budget_id": utilization.budget_id,
                        "utilization_percent": utilization.utilization_percent,
                        "spent": utilization.spent,
                        "over_budget": utilization.is_over_budget,
                    }),
                })
                .await;
        }
    }

    /// Resolves who should be asked to approve an expense: the tagged
    /// team's manager, else the managers of teams the owner belongs to,
    /// else every admin.
    async fn resolve_approvers(&self, expense: &Expense) -> Result<Vec<UserId>, LifecycleError> {
        if let Some(team_id) = expense.team_id
            && let Some(team) = self.store.find_team(team_id).await.map_err(store_err)?
        {
            return Ok(vec![team.manager_id]);
        }

        let teams = self
            .store
            .teams_of_member(expense.owner_id)
            .await
            .map_err(store_err)?;
        let managers: HashSet<UserId> = teams.iter().map(|t| t.manager_id).collect();
        if !managers.is_empty() {
            return Ok(managers.into_iter().collect());
        }

        self.store.list_admins().await.map_err(store_err)
    }

    async fn notify_decision(&self, expense: &Expense, kind: NotificationKind) {
        let verb = match kind {
            NotificationKind::ExpenseApproved => "approved",
            _ => "rejected",
        };
        self.notifier
            .enqueue(NotificationRequest {
                user_ids: vec![expense.owner_id],
                kind,
                title: format!("Expense {verb}"),
                message: format!(
                    "Your expense '{}' for {} was {verb}",
                    expense.description, expense.amount
                ),
                metadata: json!({
                    "expense_id": expense.id,
                    "approver_id": expense.approver_id,
                    "status": expense.status,
                }),
            })
            .await;
    }
}

fn store_err(e: StoreError) -> LifecycleError {
    LifecycleError::Store(e.to_string())
}
