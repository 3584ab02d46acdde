//! Binary snapshots of registry state.

use crate::error::VotingError;
use crate::markers::VoterMarkers;
use crate::settings::VoteSettings;
use crate::vote::Vote;
use dandelion_types::{Address, BlockNumber};
use serde::{Deserialize, Serialize};

/// Everything the registry owns, minus its token and permission handles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub app: Address,
    pub settings: Option<VoteSettings>,
    pub initialized_at: Option<BlockNumber>,
    pub votes: Vec<Vote>,
    pub markers: VoterMarkers,
}

impl RegistrySnapshot {
    pub fn encode(&self) -> Result<Vec<u8>, VotingError> {
        bincode::serialize(self).map_err(|e| VotingError::Snapshot(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, VotingError> {
        bincode::deserialize(bytes).map_err(|e| VotingError::Snapshot(e.to_string()))
    }
}
