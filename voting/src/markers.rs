//! Per-voter markers read by the dissent oracle.

use crate::vote::VoterState;
use dandelion_types::{Address, BlockNumber};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Last-yea start blocks and the kind of each voter's latest ballot.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VoterMarkers {
    last_yea_vote_block: HashMap<Address, BlockNumber>,
    last_vote_state: HashMap<Address, VoterState>,
}

impl VoterMarkers {
    /// Record a ballot cast on a vote that started at `start_block`.
    ///
    /// The last-yea marker only ever moves forward.
    pub fn record(&mut self, voter: Address, state: VoterState, start_block: BlockNumber) {
        if state == VoterState::Yea {
            let marker = self.last_yea_vote_block.entry(voter).or_insert(start_block);
            if start_block > *marker {
                *marker = start_block;
            }
        }
        self.last_vote_state.insert(voter, state);
    }

    pub fn last_yea_vote_block(&self, voter: &Address) -> Option<BlockNumber> {
        self.last_yea_vote_block.get(voter).copied()
    }

    pub fn last_vote_state(&self, voter: &Address) -> VoterState {
        self.last_vote_state.get(voter).copied().unwrap_or_default()
    }
}

/// Read interface over a voting app's per-voter markers.
pub trait LastVoteSource: Send + Sync {
    /// Start block of the latest-starting vote `voter` supported, if any.
    fn last_yea_vote_block(&self, voter: &Address) -> Option<BlockNumber>;

    /// Kind of the most recent ballot `voter` cast.
    fn last_vote_state(&self, voter: &Address) -> VoterState;
}
