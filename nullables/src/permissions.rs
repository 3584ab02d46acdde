//! Nullable permissions: a fixed yes or no for every check.

use dandelion_types::Address;
use dandelion_voting::{Capability, PermissionChecker};

pub struct NullPermissions {
    allow: bool,
}

impl NullPermissions {
    pub fn allow_all() -> Self {
        Self { allow: true }
    }

    pub fn deny_all() -> Self {
        Self { allow: false }
    }
}

impl PermissionChecker for NullPermissions {
    fn has_permission(&self, _who: &Address, _app: &Address, _capability: Capability) -> bool {
        self.allow
    }
}
