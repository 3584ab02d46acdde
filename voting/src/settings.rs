//! Global voting settings.
//!
//! Read at vote creation and copied into each vote; changing them only
//! affects votes created afterwards.

use crate::error::{ThresholdError, VotingError};
use dandelion_types::Pct;
use serde::{Deserialize, Serialize};

/// All tunable voting parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSettings {
    /// Share of cast votes (or of total power) YEA must exceed.
    pub support_required_pct: Pct,

    /// Share of total power YEA must exceed when passing on cast-vote support.
    pub min_accept_quorum_pct: Pct,

    /// Blocks a vote stays open. Fixed at initialization.
    pub vote_duration_blocks: u64,

    /// Minimum spacing between the start blocks of consecutive votes.
    pub vote_buffer_blocks: u64,

    /// Blocks between the end of voting and the earliest execution.
    pub execution_delay_blocks: u64,
}

impl VoteSettings {
    /// Validate thresholds and block counts together.
    pub fn validate(&self) -> Result<(), VotingError> {
        check_thresholds(self.support_required_pct, self.min_accept_quorum_pct)?;
        check_blocks("vote duration", self.vote_duration_blocks)?;
        check_blocks("vote buffer", self.vote_buffer_blocks)?;
        check_blocks("execution delay", self.execution_delay_blocks)?;
        Ok(())
    }
}

/// `0 <= quorum <= support < 100%`.
pub fn check_thresholds(support: Pct, quorum: Pct) -> Result<(), ThresholdError> {
    if !support.is_below_hundred() {
        return Err(ThresholdError::SupportTooLarge { support });
    }
    if quorum > support {
        return Err(ThresholdError::QuorumExceedsSupport { quorum, support });
    }
    Ok(())
}

pub(crate) fn check_blocks(name: &'static str, blocks: u64) -> Result<(), VotingError> {
    if blocks == 0 {
        return Err(VotingError::InvalidDuration(name));
    }
    Ok(())
}
