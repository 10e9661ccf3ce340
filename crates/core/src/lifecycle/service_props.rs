//! Property-based tests for the lifecycle state machine.

use proptest::prelude::*;
use rust_decimal::Decimal;
use spendra_shared::types::UserId;
use uuid::Uuid;

use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::service::LifecycleService;
use crate::lifecycle::types::ExpenseStatus;

fn arb_status() -> impl Strategy<Value = ExpenseStatus> {
    prop_oneof![
        Just(ExpenseStatus::Draft),
        Just(ExpenseStatus::Pending),
        Just(ExpenseStatus::Approved),
        Just(ExpenseStatus::Rejected),
        Just(ExpenseStatus::Paid),
    ]
}

fn arb_user_id() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

fn arb_positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The transition graph in the table is the only set of reachable
    /// (from, to) pairs.
    #[test]
    fn prop_transition_matrix_is_closed(from in arb_status(), to in arb_status()) {
        let expected = matches!(
            (from, to),
            (ExpenseStatus::Draft, ExpenseStatus::Pending)
                | (ExpenseStatus::Pending, ExpenseStatus::Approved)
                | (ExpenseStatus::Pending, ExpenseStatus::Rejected)
                | (ExpenseStatus::Approved, ExpenseStatus::Paid)
                | (ExpenseStatus::Rejected, ExpenseStatus::Draft)
        );
        prop_assert_eq!(LifecycleService::is_valid_transition(from, to), expected);
    }

    /// Submitting from any non-draft status yields `InvalidTransition`
    /// carrying the current and requested states.
    #[test]
    fn prop_submit_from_non_draft_fails(
        status in arb_status(),
        amount in arb_positive_amount(),
        user in arb_user_id(),
    ) {
        prop_assume!(status != ExpenseStatus::Draft);
        match LifecycleService::submit(status, amount, user) {
            Err(LifecycleError::InvalidTransition { from, to }) => {
                prop_assert_eq!(from, status);
                prop_assert_eq!(to, ExpenseStatus::Pending);
            }
            _ => prop_assert!(false, "expected InvalidTransition"),
        }
    }

    /// The amount guard rejects zero and negative amounts from any
    /// status, before the transition check.
    #[test]
    fn prop_submit_non_positive_amount_fails(
        status in arb_status(),
        cents in -10_000_000i64..=0,
        user in arb_user_id(),
    ) {
        let amount = Decimal::new(cents, 2);
        prop_assert!(matches!(
            LifecycleService::submit(status, amount, user),
            Err(LifecycleError::NonPositiveAmount(_))
        ));
    }

    /// Approve and reject succeed exactly from pending, and record the
    /// acting approver in the audit fields.
    #[test]
    fn prop_decisions_only_from_pending(status in arb_status(), approver in arb_user_id()) {
        let approve = LifecycleService::approve(status, approver);
        let reject = LifecycleService::reject(status, approver);

        if status == ExpenseStatus::Pending {
            let approve = approve.unwrap();
            prop_assert_eq!(approve.new_status(), ExpenseStatus::Approved);
            prop_assert!(approve.approval_audit().is_some_and(|(id, _)| id == approver));

            let reject = reject.unwrap();
            prop_assert_eq!(reject.new_status(), ExpenseStatus::Rejected);
            prop_assert!(reject.approval_audit().is_some_and(|(id, _)| id == approver));
        } else {
            let approve_invalid = matches!(approve, Err(LifecycleError::InvalidTransition { .. }));
            prop_assert!(approve_invalid);
            let reject_invalid = matches!(reject, Err(LifecycleError::InvalidTransition { .. }));
            prop_assert!(reject_invalid);
        }
    }

    /// Pay succeeds exactly from approved; reopen exactly from
    /// rejected.
    #[test]
    fn prop_pay_and_reopen_edges(status in arb_status(), admin in arb_user_id()) {
        let pay = LifecycleService::pay(status, admin);
        prop_assert_eq!(pay.is_ok(), status == ExpenseStatus::Approved);

        let reopen = LifecycleService::reopen(status);
        prop_assert_eq!(reopen.is_ok(), status == ExpenseStatus::Rejected);
        if let Ok(action) = reopen {
            prop_assert!(action.clears_approval_audit());
        }
    }

    /// Every successful action lands on a status consistent with the
    /// validity matrix.
    #[test]
    fn prop_actions_agree_with_matrix(
        status in arb_status(),
        amount in arb_positive_amount(),
        user in arb_user_id(),
    ) {
        if let Ok(action) = LifecycleService::submit(status, amount, user) {
            prop_assert!(LifecycleService::is_valid_transition(status, action.new_status()));
        }
        if let Ok(action) = LifecycleService::approve(status, user) {
            prop_assert!(LifecycleService::is_valid_transition(status, action.new_status()));
        }
        if let Ok(action) = LifecycleService::reject(status, user) {
            prop_assert!(LifecycleService::is_valid_transition(status, action.new_status()));
        }
        if let Ok(action) = LifecycleService::pay(status, user) {
            prop_assert!(LifecycleService::is_valid_transition(status, action.new_status()));
        }
        if let Ok(action) = LifecycleService::reopen(status) {
            prop_assert!(LifecycleService::is_valid_transition(status, action.new_status()));
        }
    }
}
