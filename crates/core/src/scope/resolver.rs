//! Visibility scope resolution.
//!
//! Resolves an actor into a reusable [`VisibilityScope`] predicate. The
//! resolver performs exactly one managed-team lookup per call; callers
//! evaluate the returned scope across whole record sets instead of
//! resolving per record.

use std::collections::HashSet;

use tracing::debug;

use super::error::ScopeError;
use super::types::{Actor, Role, VisibilityScope};
use crate::store::DirectoryStore;

/// Stateless resolver for actor visibility.
pub struct ScopeResolver;

impl ScopeResolver {
    /// Resolves the visibility scope for an actor.
    ///
    /// The actor's role is re-read from the directory so that role changes
    /// take effect on the next request; the stored role wins over the
    /// role claimed on the request.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::ActorNotFound` if the actor id is unknown.
    pub async fn resolve<D: DirectoryStore>(
        directory: &D,
        actor: &Actor,
    ) -> Result<VisibilityScope, ScopeError> {
        let stored = directory
            .find_actor(actor.id)
            .await
            .map_err(|e| ScopeError::Store(e.to_string()))?
            .ok_or(ScopeError::ActorNotFound(actor.id))?;

        let scope = match stored.role {
            Role::Admin => VisibilityScope::All,
            Role::User => VisibilityScope::Own(actor.id),
            Role::Manager => {
                let teams = directory
                    .teams_managed_by(actor.id)
                    .await
                    .map_err(|e| ScopeError::Store(e.to_string()))?;

                let mut team_ids = HashSet::new();
                let mut member_ids = HashSet::new();
                for team in teams {
                    team_ids.insert(team.id);
                    member_ids.extend(team.member_ids);
                }

                VisibilityScope::Managed {
                    actor_id: actor.id,
                    team_ids,
                    member_ids,
                }
            }
        };

        debug!(actor_id = %actor.id, role = %stored.role, "resolved visibility scope");
        Ok(scope)
    }
}

#[cfg(test)]
mod tests {
    use spendra_shared::types::{TeamId, UserId};

    use super::*;
    use crate::scope::types::Team;
    use crate::store::MemoryStore;

    fn seeded_store() -> (MemoryStore, Actor, Actor, Actor, UserId, TeamId) {
        let store = MemoryStore::new();
        let admin = Actor::new(UserId::new(), Role::Admin);
        let manager = Actor::new(UserId::new(), Role::Manager);
        let user = Actor::new(UserId::new(), Role::User);
        let member = UserId::new();
        store.add_actor(admin);
        store.add_actor(manager);
        store.add_actor(user);
        store.add_actor(Actor::new(member, Role::User));

        let team_id = TeamId::new();
        store.add_team(Team {
            id: team_id,
            manager_id: manager.id,
            member_ids: [member].into(),
        });

        (store, admin, manager, user, member, team_id)
    }

    #[tokio::test]
    async fn test_admin_resolves_to_all() {
        let (store, admin, ..) = seeded_store();
        let scope = ScopeResolver::resolve(&store, &admin).await.unwrap();
        assert!(scope.is_all());
    }

    #[tokio::test]
    async fn test_user_resolves_to_own() {
        let (store, _, _, user, ..) = seeded_store();
        let scope = ScopeResolver::resolve(&store, &user).await.unwrap();
        assert_eq!(scope, VisibilityScope::Own(user.id));
    }

    #[tokio::test]
    async fn test_manager_scope_covers_roster_and_team() {
        let (store, _, manager, user, member, team_id) = seeded_store();
        let scope = ScopeResolver::resolve(&store, &manager).await.unwrap();

        assert!(scope.allows(manager.id, None));
        // Roster member is visible even without a team id on the record.
        assert!(scope.allows(member, None));
        assert!(scope.allows(member, Some(team_id)));
        assert!(!scope.allows(user.id, None));
    }

    #[tokio::test]
    async fn test_unknown_actor_fails() {
        let (store, ..) = seeded_store();
        let ghost = Actor::new(UserId::new(), Role::Admin);
        let result = ScopeResolver::resolve(&store, &ghost).await;
        assert!(matches!(result, Err(ScopeError::ActorNotFound(id)) if id == ghost.id));
    }

    #[tokio::test]
    async fn test_stored_role_wins_over_claimed_role() {
        let (store, _, _, user, ..) = seeded_store();
        // The request claims admin, but the directory says user.
        let claimed = Actor::new(user.id, Role::Admin);
        let scope = ScopeResolver::resolve(&store, &claimed).await.unwrap();
        assert_eq!(scope, VisibilityScope::Own(user.id));
    }
}
