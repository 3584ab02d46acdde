//! Script executor used by the replay tool: logs actions, applies nothing.

use dandelion_voting::{ExecScript, ExecutionContext, ScriptError, ScriptExecutor};

/// Records every executed action in the log. Nothing is ever applied, so
/// execution always succeeds.
#[derive(Debug, Default)]
pub struct LoggingExecutor {
    actions_logged: usize,
}

impl LoggingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions_logged(&self) -> usize {
        self.actions_logged
    }
}

impl ScriptExecutor for LoggingExecutor {
    fn execute(&mut self, script: &ExecScript, ctx: &ExecutionContext) -> Result<(), ScriptError> {
        for (index, action) in script.actions.iter().enumerate() {
            tracing::info!(
                vote_id = %ctx.vote_id,
                index,
                target = %action.target,
                calldata = %hex::encode(&action.calldata),
                "script action"
            );
        }
        self.actions_logged += script.actions.len();
        Ok(())
    }
}
