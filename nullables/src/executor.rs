//! Nullable executor: counter targets with all-or-nothing commits.

use dandelion_types::Address;
use dandelion_voting::{ExecScript, ExecutionContext, ScriptError, ScriptExecutor};
use std::collections::{HashMap, HashSet};

/// Treats every target as a counter that each call increments by one.
///
/// Targets marked with [`revert_on`](Self::revert_on) revert every call. A
/// script's increments are staged and only committed when every action
/// succeeds.
#[derive(Default)]
pub struct NullExecutor {
    counters: HashMap<Address, u64>,
    reverting: HashSet<Address>,
    executions: Vec<ExecutionContext>,
}

impl NullExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revert_on(&mut self, target: Address) {
        self.reverting.insert(target);
    }

    pub fn stop_reverting(&mut self, target: &Address) {
        self.reverting.remove(target);
    }

    pub fn counter(&self, target: &Address) -> u64 {
        self.counters.get(target).copied().unwrap_or(0)
    }

    /// Contexts of successfully committed scripts, in order.
    pub fn executions(&self) -> &[ExecutionContext] {
        &self.executions
    }
}

impl ScriptExecutor for NullExecutor {
    fn execute(&mut self, script: &ExecScript, ctx: &ExecutionContext) -> Result<(), ScriptError> {
        let mut staged = self.counters.clone();
        for (index, action) in script.actions.iter().enumerate() {
            if self.reverting.contains(&action.target) {
                return Err(ScriptError::ActionReverted {
                    index,
                    reason: format!("target {} reverted", action.target),
                });
            }
            *staged.entry(action.target).or_insert(0) += 1;
        }
        self.counters = staged;
        self.executions.push(*ctx);
        Ok(())
    }
}
