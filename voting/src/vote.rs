//! Votes and their block-driven lifecycle.

use crate::pct::is_value_pct;
use crate::script::ExecScript;
use dandelion_types::{Address, BlockNumber, Pct, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a vote; ids follow creation order starting at 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VoteId(u64);

impl VoteId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an address voted on a given vote. Written once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoterState {
    #[default]
    Absent,
    Yea,
    Nay,
}

impl VoterState {
    pub fn from_support(supports: bool) -> Self {
        if supports {
            Self::Yea
        } else {
            Self::Nay
        }
    }
}

/// Block-derived phase of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotePhase {
    /// Before `start_block` (buffer-delayed).
    Pending,
    /// `[start_block, end_block)`.
    Open,
    /// `[end_block, execution_block)`.
    Delayed,
    /// At or after `execution_block`.
    Closed,
}

/// Outcome-aware status, as shown to voters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteStatus {
    Upcoming,
    Ongoing,
    Rejected,
    Delayed,
    /// Passed with nothing to execute.
    Accepted,
    PendingEnactment,
    Enacted,
}

/// A vote. Created by the registry, never destroyed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub creator: Address,
    pub metadata: String,
    /// Encoded call script; decoded only at execution.
    pub script: Vec<u8>,
    pub start_block: BlockNumber,
    pub snapshot_block: BlockNumber,
    pub end_block: BlockNumber,
    pub execution_block: BlockNumber,
    pub support_required_pct: Pct,
    pub min_accept_quorum_pct: Pct,
    /// Total supply at `snapshot_block`.
    pub voting_power: TokenAmount,
    pub yea: TokenAmount,
    pub nay: TokenAmount,
    pub executed: bool,
    pub(crate) voters: HashMap<Address, VoterState>,
}

impl Vote {
    pub fn phase(&self, now: BlockNumber) -> VotePhase {
        if now < self.start_block {
            VotePhase::Pending
        } else if now < self.end_block {
            VotePhase::Open
        } else if now < self.execution_block {
            VotePhase::Delayed
        } else {
            VotePhase::Closed
        }
    }

    /// Open for casting. A vote with no voting power never opens.
    pub fn is_open(&self, now: BlockNumber) -> bool {
        self.phase(now) == VotePhase::Open && !self.voting_power.is_zero()
    }

    pub fn voter_state(&self, voter: &Address) -> VoterState {
        self.voters.get(voter).copied().unwrap_or_default()
    }

    /// Number of addresses that have voted.
    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Passes outright on total power, or on cast-vote support plus quorum.
    pub fn is_accepted(&self) -> bool {
        let cast = self.yea.checked_add(self.nay).unwrap_or(TokenAmount::new(u128::MAX));
        let support = is_value_pct(self.yea, cast, self.support_required_pct);
        let outright = is_value_pct(self.yea, self.voting_power, self.support_required_pct);
        let quorum = is_value_pct(self.yea, self.voting_power, self.min_accept_quorum_pct);
        outright || (support && quorum)
    }

    pub fn has_script(&self) -> bool {
        !ExecScript::is_empty_encoding(&self.script)
    }

    pub fn status(&self, now: BlockNumber) -> VoteStatus {
        match self.phase(now) {
            VotePhase::Pending => return VoteStatus::Upcoming,
            VotePhase::Open => return VoteStatus::Ongoing,
            VotePhase::Delayed | VotePhase::Closed => {}
        }
        if !self.is_accepted() {
            return VoteStatus::Rejected;
        }
        if self.phase(now) == VotePhase::Delayed {
            return VoteStatus::Delayed;
        }
        match (self.has_script(), self.executed) {
            (false, _) => VoteStatus::Accepted,
            (true, true) => VoteStatus::Enacted,
            (true, false) => VoteStatus::PendingEnactment,
        }
    }
}
