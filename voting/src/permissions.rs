//! Capability checks performed before each gated operation.
//!
//! The permission framework itself lives outside the engine; the registry and
//! the dissent oracle only ask a [`PermissionChecker`] whether `who` may use a
//! capability on an app.

use dandelion_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// A named, grantable capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    CreateVotes,
    ModifySupport,
    ModifyQuorum,
    ModifyBufferBlocks,
    ModifyExecutionDelay,
    ModifyDissentConfig,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Self::CreateVotes,
        Self::ModifySupport,
        Self::ModifyQuorum,
        Self::ModifyBufferBlocks,
        Self::ModifyExecutionDelay,
        Self::ModifyDissentConfig,
    ];

    /// Role name as registered with the permission framework.
    pub fn role(&self) -> &'static str {
        match self {
            Self::CreateVotes => "CREATE_VOTES_ROLE",
            Self::ModifySupport => "MODIFY_SUPPORT_ROLE",
            Self::ModifyQuorum => "MODIFY_QUORUM_ROLE",
            Self::ModifyBufferBlocks => "MODIFY_BUFFER_BLOCKS_ROLE",
            Self::ModifyExecutionDelay => "MODIFY_EXECUTION_DELAY_ROLE",
            Self::ModifyDissentConfig => "MODIFY_DISSENT_CONFIG_ROLE",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role())
    }
}

/// Answers capability checks for gated entry points.
pub trait PermissionChecker: Send + Sync {
    fn has_permission(&self, who: &Address, app: &Address, capability: Capability) -> bool;
}

/// In-memory grant table. A grant to [`Address::ANY`] covers every entity.
#[derive(Default)]
pub struct PermissionTable {
    grants: RwLock<HashSet<(Address, Address, Capability)>>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, who: Address, app: Address, capability: Capability) {
        tracing::debug!(%who, %app, %capability, "permission granted");
        self.grants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((who, app, capability));
    }

    pub fn revoke(&self, who: Address, app: Address, capability: Capability) {
        tracing::debug!(%who, %app, %capability, "permission revoked");
        self.grants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(who, app, capability));
    }

    /// Grant every capability on `app` to any entity.
    pub fn grant_all(&self, app: Address) {
        for capability in Capability::ALL {
            self.grant(Address::ANY, app, capability);
        }
    }
}

impl PermissionChecker for PermissionTable {
    fn has_permission(&self, who: &Address, app: &Address, capability: Capability) -> bool {
        let grants = self.grants.read().unwrap_or_else(PoisonError::into_inner);
        grants.contains(&(*who, *app, capability))
            || grants.contains(&(Address::ANY, *app, capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_grant() {
        let table = PermissionTable::new();
        let app = Address::from_low_u64(0xa0);
        let who = Address::from_low_u64(1);
        table.grant(who, app, Capability::CreateVotes);
        assert!(table.has_permission(&who, &app, Capability::CreateVotes));
        assert!(!table.has_permission(&who, &app, Capability::ModifySupport));
        assert!(!table.has_permission(&Address::from_low_u64(2), &app, Capability::CreateVotes));
    }

    #[test]
    fn wildcard_grant_covers_everyone_on_that_app_only() {
        let table = PermissionTable::new();
        let app = Address::from_low_u64(0xa0);
        table.grant(Address::ANY, app, Capability::ModifyQuorum);
        assert!(table.has_permission(&Address::from_low_u64(7), &app, Capability::ModifyQuorum));
        assert!(!table.has_permission(
            &Address::from_low_u64(7),
            &Address::from_low_u64(0xa1),
            Capability::ModifyQuorum
        ));
    }

    #[test]
    fn revoke_removes_grant() {
        let table = PermissionTable::new();
        let app = Address::from_low_u64(0xa0);
        table.grant_all(app);
        table.revoke(Address::ANY, app, Capability::CreateVotes);
        assert!(!table.has_permission(&Address::ZERO, &app, Capability::CreateVotes));
        assert!(table.has_permission(&Address::ZERO, &app, Capability::ModifySupport));
    }
}
