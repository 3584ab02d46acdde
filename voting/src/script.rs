//! Call scripts attached to votes and the executor seam that applies them.
//!
//! Wire format (calls script, version 1):
//! ```text
//! 00000001 | target(20) len(4, BE) calldata(len) | target(20) len(4, BE) ...
//! ```
//! `00000001` alone, or no bytes at all, is the empty script.

use crate::vote::VoteId;
use dandelion_types::{Address, BlockNumber, ScriptHash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version prefix of a calls script.
pub const CALLS_SCRIPT_ID: [u8; 4] = [0, 0, 0, 1];

const ACTION_HEADER_LEN: usize = Address::LEN + 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("malformed script: {0}")]
    Malformed(String),

    #[error("action {index} reverted: {reason}")]
    ActionReverted { index: usize, reason: String },
}

/// One call: `calldata` sent to `target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallAction {
    pub target: Address,
    pub calldata: Vec<u8>,
}

impl CallAction {
    pub fn new(target: Address, calldata: Vec<u8>) -> Self {
        Self { target, calldata }
    }
}

/// An ordered list of calls, applied all-or-nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecScript {
    pub actions: Vec<CallAction>,
}

impl ExecScript {
    pub fn new(actions: Vec<CallAction>) -> Self {
        Self { actions }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Whether `bytes` encode a script with no actions.
    pub fn is_empty_encoding(bytes: &[u8]) -> bool {
        bytes.is_empty() || bytes == CALLS_SCRIPT_ID
    }

    pub fn encode(&self) -> Vec<u8> {
        let body: usize = self
            .actions
            .iter()
            .map(|a| ACTION_HEADER_LEN + a.calldata.len())
            .sum();
        let mut out = Vec::with_capacity(CALLS_SCRIPT_ID.len() + body);
        out.extend_from_slice(&CALLS_SCRIPT_ID);
        for action in &self.actions {
            out.extend_from_slice(action.target.as_bytes());
            out.extend_from_slice(&(action.calldata.len() as u32).to_be_bytes());
            out.extend_from_slice(&action.calldata);
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ScriptError> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        let (version, mut rest) = bytes
            .split_first_chunk::<4>()
            .ok_or_else(|| ScriptError::Malformed("missing version prefix".into()))?;
        if *version != CALLS_SCRIPT_ID {
            return Err(ScriptError::Malformed(format!(
                "unsupported script version 0x{}",
                hex::encode(version)
            )));
        }
        let mut actions = Vec::new();
        while !rest.is_empty() {
            let index = actions.len();
            if rest.len() < ACTION_HEADER_LEN {
                return Err(ScriptError::Malformed(format!(
                    "action {index}: truncated header"
                )));
            }
            let (header, tail) = rest.split_at(ACTION_HEADER_LEN);
            let target = Address::from_slice(&header[..Address::LEN])
                .map_err(|e| ScriptError::Malformed(e.to_string()))?;
            let mut len_bytes = [0u8; 4];
            len_bytes.copy_from_slice(&header[Address::LEN..]);
            let len = u32::from_be_bytes(len_bytes) as usize;
            if tail.len() < len {
                return Err(ScriptError::Malformed(format!(
                    "action {index}: calldata needs {len} bytes, {} left",
                    tail.len()
                )));
            }
            let (calldata, next) = tail.split_at(len);
            actions.push(CallAction::new(target, calldata.to_vec()));
            rest = next;
        }
        Ok(Self { actions })
    }

    /// Decode a `0x`-prefixed (or bare) hex string.
    pub fn decode_hex(s: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))
            .map_err(|e| ScriptError::Malformed(e.to_string()))?;
        Self::decode(&bytes)
    }

    pub fn hash(&self) -> ScriptHash {
        ScriptHash::digest(&self.encode())
    }
}

/// What an executor is told about the vote being enacted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    pub vote_id: VoteId,
    pub block: BlockNumber,
    pub script_hash: ScriptHash,
}

/// Applies decoded scripts to the hosting environment.
///
/// Implementations must be atomic: on `Err`, none of the script's actions may
/// leave an effect behind.
pub trait ScriptExecutor {
    fn execute(&mut self, script: &ExecScript, ctx: &ExecutionContext) -> Result<(), ScriptError>;
}
