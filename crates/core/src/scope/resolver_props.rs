//! Property-based tests for the visibility scope predicate.

use std::collections::HashSet;

use proptest::prelude::*;
use spendra_shared::types::{TeamId, UserId};
use uuid::Uuid;

use crate::scope::types::VisibilityScope;

fn arb_user_id() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

fn arb_team_id() -> impl Strategy<Value = TeamId> {
    any::<u128>().prop_map(|n| TeamId::from_uuid(Uuid::from_u128(n)))
}

fn arb_opt_team_id() -> impl Strategy<Value = Option<TeamId>> {
    prop_oneof![Just(None), arb_team_id().prop_map(Some)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A user-role scope accepts a record iff the record is owned by the
    /// actor, regardless of the record's team id.
    #[test]
    fn prop_own_scope_accepts_exactly_owner(
        actor in arb_user_id(),
        owner in arb_user_id(),
        team in arb_opt_team_id(),
    ) {
        let scope = VisibilityScope::Own(actor);
        prop_assert_eq!(scope.allows(owner, team), owner == actor);
    }

    /// The admin scope accepts every record.
    #[test]
    fn prop_all_scope_accepts_everything(
        owner in arb_user_id(),
        team in arb_opt_team_id(),
    ) {
        prop_assert!(VisibilityScope::All.allows(owner, team));
    }

    /// The managed scope accepts a record iff owned by the manager, owned
    /// by a roster member, or tagged with a managed team id.
    #[test]
    fn prop_managed_scope_matches_definition(
        actor in arb_user_id(),
        members in prop::collection::hash_set(arb_user_id(), 0..8),
        teams in prop::collection::hash_set(arb_team_id(), 0..4),
        owner in arb_user_id(),
        team in arb_opt_team_id(),
    ) {
        let scope = VisibilityScope::Managed {
            actor_id: actor,
            team_ids: teams.clone(),
            member_ids: members.clone(),
        };

        let expected = owner == actor
            || members.contains(&owner)
            || team.is_some_and(|t| teams.contains(&t));
        prop_assert_eq!(scope.allows(owner, team), expected);
    }

    /// A managed scope with no teams degenerates to the own scope.
    #[test]
    fn prop_empty_managed_scope_equals_own(
        actor in arb_user_id(),
        owner in arb_user_id(),
        team in arb_opt_team_id(),
    ) {
        let managed = VisibilityScope::Managed {
            actor_id: actor,
            team_ids: HashSet::new(),
            member_ids: HashSet::new(),
        };
        let own = VisibilityScope::Own(actor);
        prop_assert_eq!(managed.allows(owner, team), own.allows(owner, team));
    }
}
