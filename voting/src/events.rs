//! Events emitted by the voting registry, drained by indexers.

use crate::vote::VoteId;
use dandelion_types::{Address, BlockNumber, Pct, ScriptHash, TokenAmount};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingEvent {
    StartVote {
        vote_id: VoteId,
        creator: Address,
        metadata: String,
    },
    CastVote {
        vote_id: VoteId,
        voter: Address,
        supports: bool,
        stake: TokenAmount,
    },
    ExecuteVote {
        vote_id: VoteId,
        block: BlockNumber,
        script_hash: ScriptHash,
    },
    ChangeSupportRequired {
        support_required_pct: Pct,
    },
    ChangeMinQuorum {
        min_accept_quorum_pct: Pct,
    },
    ChangeVoteBufferBlocks {
        vote_buffer_blocks: u64,
    },
    ChangeExecutionDelayBlocks {
        execution_delay_blocks: u64,
    },
}

impl VotingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartVote { .. } => "StartVote",
            Self::CastVote { .. } => "CastVote",
            Self::ExecuteVote { .. } => "ExecuteVote",
            Self::ChangeSupportRequired { .. } => "ChangeSupportRequired",
            Self::ChangeMinQuorum { .. } => "ChangeMinQuorum",
            Self::ChangeVoteBufferBlocks { .. } => "ChangeVoteBufferBlocks",
            Self::ChangeExecutionDelayBlocks { .. } => "ChangeExecutionDelayBlocks",
        }
    }
}
