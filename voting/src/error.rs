use crate::permissions::Capability;
use crate::script::ScriptError;
use crate::vote::VoteId;
use dandelion_types::Pct;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VotingError {
    #[error("voting app is already initialized")]
    AlreadyInitialized,

    #[error("voting app is not initialized")]
    NotInitialized,

    #[error("sender lacks {capability}")]
    AuthFailed { capability: Capability },

    #[error("vote {0} does not exist")]
    NoSuchVote(VoteId),

    #[error("invalid thresholds: {0}")]
    InvalidThresholds(#[from] ThresholdError),

    #[error("{0} must be at least one block")]
    InvalidDuration(&'static str),

    #[error("cannot vote on vote {0}")]
    VotingNotAllowed(VoteId),

    #[error("cannot execute vote {0}")]
    ExecutionNotAllowed(VoteId),

    #[error("cannot forward: sender may not create votes")]
    ForwardingNotAllowed,

    #[error("script of vote {vote_id} failed: {source}")]
    ScriptExecutionFailed {
        vote_id: VoteId,
        #[source]
        source: ScriptError,
    },

    #[error("arithmetic overflow in vote bookkeeping")]
    Overflow,

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Violations of `0 <= min_accept_quorum_pct <= support_required_pct < 100%`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdError {
    #[error("support {support} must be below 100%")]
    SupportTooLarge { support: Pct },

    #[error("quorum {quorum} exceeds support {support}")]
    QuorumExceedsSupport { quorum: Pct, support: Pct },
}
