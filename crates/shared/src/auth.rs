//! Acting identity and capability types.
//!
//! The engine performs no authentication of its own: callers arrive with a
//! pre-authorized [`Actor`] carrying an explicit, validated capability set.
//! The core never inspects capabilities; they exist so the boundary can be
//! checked once, with a typed value instead of a loose permission map.

use serde::{Deserialize, Serialize};

use crate::types::{CompanyId, UserId};

/// A single capability the caller has been granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create and post journal entries.
    PostEntries,
    /// Manage the chart of accounts.
    ManageAccounts,
    /// Lock and unlock reporting periods.
    ManagePeriodLocks,
    /// Create, depreciate, and dispose fixed assets.
    ManageAssets,
}

/// An explicit, validated set of capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet(Vec<Capability>);

impl CapabilitySet {
    /// Creates a capability set, deduplicating grants.
    #[must_use]
    pub fn new(mut capabilities: Vec<Capability>) -> Self {
        capabilities.sort_by_key(|c| *c as u8);
        capabilities.dedup();
        Self(capabilities)
    }

    /// Returns true if the set contains the given capability.
    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// A set granting every capability.
    #[must_use]
    pub fn all() -> Self {
        Self::new(vec![
            Capability::PostEntries,
            Capability::ManageAccounts,
            Capability::ManagePeriodLocks,
            Capability::ManageAssets,
        ])
    }
}

/// The pre-authorized identity performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting user.
    pub user_id: UserId,
    /// The company context the actor operates in.
    pub company_id: CompanyId,
    /// Capabilities granted to the actor for this call.
    pub capabilities: CapabilitySet,
}

impl Actor {
    /// Creates an actor with the given capability set.
    #[must_use]
    pub fn new(user_id: UserId, company_id: CompanyId, capabilities: CapabilitySet) -> Self {
        Self {
            user_id,
            company_id,
            capabilities,
        }
    }

    /// Returns true if the actor holds the given capability.
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.allows(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_set_dedup() {
        let set = CapabilitySet::new(vec![
            Capability::PostEntries,
            Capability::PostEntries,
            Capability::ManageAssets,
        ]);
        assert!(set.allows(Capability::PostEntries));
        assert!(set.allows(Capability::ManageAssets));
        assert!(!set.allows(Capability::ManagePeriodLocks));
    }

    #[test]
    fn test_all_grants_everything() {
        let actor = Actor::new(UserId::new(), CompanyId::new(), CapabilitySet::all());
        assert!(actor.can(Capability::PostEntries));
        assert!(actor.can(Capability::ManageAccounts));
        assert!(actor.can(Capability::ManagePeriodLocks));
        assert!(actor.can(Capability::ManageAssets));
    }

    #[test]
    fn test_empty_set_denies() {
        let actor = Actor::new(UserId::new(), CompanyId::new(), CapabilitySet::default());
        assert!(!actor.can(Capability::PostEntries));
    }
}
