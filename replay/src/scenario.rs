//! JSON scenario files: a list of actions, each applied at a block.

use crate::error::ReplayError;
use dandelion_types::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Block the action is sequenced in. Never decreases between steps.
    pub block: u64,
    #[serde(flatten)]
    pub action: Action,
}

/// Scripts are `0x`-prefixed hex in the call-script wire format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    NewVote {
        sender: Address,
        #[serde(default)]
        script: Option<String>,
        #[serde(default)]
        metadata: String,
        #[serde(default)]
        cast_vote: bool,
    },
    Forward {
        sender: Address,
        script: String,
    },
    Vote {
        sender: Address,
        vote_id: u64,
        supports: bool,
    },
    Execute {
        vote_id: u64,
    },
    Mint {
        holder: Address,
        amount: u64,
    },
    Burn {
        holder: Address,
        amount: u64,
    },
    Transfer {
        from: Address,
        to: Address,
        amount: u64,
    },
    ChangeSupportRequired {
        sender: Address,
        percent: u64,
    },
    ChangeMinQuorum {
        sender: Address,
        percent: u64,
    },
    ChangeVoteBuffer {
        sender: Address,
        blocks: u64,
    },
    ChangeExecutionDelay {
        sender: Address,
        blocks: u64,
    },
    SetDissentWindow {
        sender: Address,
        blocks: u64,
    },
    CanPerform {
        who: Address,
        #[serde(default)]
        voter: Option<Address>,
        #[serde(default)]
        window_blocks: Option<u64>,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewVote { .. } => "new_vote",
            Self::Forward { .. } => "forward",
            Self::Vote { .. } => "vote",
            Self::Execute { .. } => "execute",
            Self::Mint { .. } => "mint",
            Self::Burn { .. } => "burn",
            Self::Transfer { .. } => "transfer",
            Self::ChangeSupportRequired { .. } => "change_support_required",
            Self::ChangeMinQuorum { .. } => "change_min_quorum",
            Self::ChangeVoteBuffer { .. } => "change_vote_buffer",
            Self::ChangeExecutionDelay { .. } => "change_execution_delay",
            Self::SetDissentWindow { .. } => "set_dissent_window",
            Self::CanPerform { .. } => "can_perform",
        }
    }
}

impl Scenario {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReplayError::Scenario(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ReplayError> {
        serde_json::from_str(s).map_err(|e| ReplayError::Scenario(e.to_string()))
    }
}
