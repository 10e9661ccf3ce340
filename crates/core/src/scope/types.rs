//! Actor, team, and visibility scope types.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use spendra_shared::types::{TeamId, UserId};

/// Trust level of an actor.
///
/// This is a closed set; every authorization decision in the engine goes
/// through [`Role`] and the scope predicate rather than ad-hoc string
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full visibility and administrative transitions.
    Admin,
    /// Sees own records plus records of managed teams.
    Manager,
    /// Sees own records only.
    User,
}

impl Role {
    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
        }
    }

    /// True if the role may approve or reject pending expenses at all.
    #[must_use]
    pub fn can_approve(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A verified actor attached to a request.
///
/// The transport layer authenticates the caller and supplies this value;
/// the engine never defaults or fabricates one. Role is re-read from the
/// directory per request, never cached across request boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The actor's user id.
    pub id: UserId,
    /// The actor's role.
    pub role: Role,
}

impl Actor {
    /// Creates a new actor value.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// A team of users with exactly one manager.
///
/// Membership is consulted, never mutated, by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Team id.
    pub id: TeamId,
    /// The managing user.
    pub manager_id: UserId,
    /// Member user ids.
    pub member_ids: HashSet<UserId>,
}

impl Team {
    /// True if the given user is on the roster.
    #[must_use]
    pub fn has_member(&self, user_id: UserId) -> bool {
        self.member_ids.contains(&user_id)
    }
}

/// Resolved visibility scope: a predicate over a record's owner and team.
///
/// Resolved once per request and reused across whole record sets; callers
/// must not resolve per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Full visibility (admin).
    All,
    /// Own records plus records of managed teams (manager).
    ///
    /// Roster membership is the authoritative link: a record owned by a
    /// member of a managed team is visible even when the record itself
    /// carries no team id.
    Managed {
        /// The manager's own id.
        actor_id: UserId,
        /// Ids of teams the actor manages.
        team_ids: HashSet<TeamId>,
        /// Roster members of those teams.
        member_ids: HashSet<UserId>,
    },
    /// Own records only (user).
    Own(UserId),
}

impl VisibilityScope {
    /// Evaluates the predicate against a record's `(owner_id, team_id)`.
    #[must_use]
    pub fn allows(&self, owner_id: UserId, team_id: Option<TeamId>) -> bool {
        match self {
            Self::All => true,
            Self::Managed {
                actor_id,
                team_ids,
                member_ids,
            } => {
                owner_id == *actor_id
                    || team_id.is_some_and(|t| team_ids.contains(&t))
                    || member_ids.contains(&owner_id)
            }
            Self::Own(actor_id) => owner_id == *actor_id,
        }
    }

    /// True if the scope grants unrestricted visibility.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("MANAGER"), Some(Role::Manager));
        assert_eq!(Role::parse("User"), Some(Role::User));
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::Manager.as_str(), "manager");
        assert_eq!(Role::User.as_str(), "user");
    }

    #[test]
    fn test_role_can_approve() {
        assert!(Role::Admin.can_approve());
        assert!(Role::Manager.can_approve());
        assert!(!Role::User.can_approve());
    }

    #[test]
    fn test_all_scope_allows_everything() {
        let scope = VisibilityScope::All;
        assert!(scope.allows(UserId::new(), None));
        assert!(scope.allows(UserId::new(), Some(TeamId::new())));
    }

    #[test]
    fn test_own_scope_allows_owner_only() {
        let me = UserId::new();
        let scope = VisibilityScope::Own(me);
        assert!(scope.allows(me, None));
        assert!(scope.allows(me, Some(TeamId::new())));
        assert!(!scope.allows(UserId::new(), None));
    }

    #[test]
    fn test_managed_scope_accepts_roster_member_without_team_id() {
        let manager = UserId::new();
        let member = UserId::new();
        let team = TeamId::new();
        let scope = VisibilityScope::Managed {
            actor_id: manager,
            team_ids: HashSet::from([team]),
            member_ids: HashSet::from([member]),
        };

        // Membership is authoritative even when the record has no team id.
        assert!(scope.allows(member, None));
        assert!(scope.allows(UserId::new(), Some(team)));
        assert!(scope.allows(manager, None));
        assert!(!scope.allows(UserId::new(), None));
        assert!(!scope.allows(UserId::new(), Some(TeamId::new())));
    }
}
