//! Dandelion Voting: token-weighted governance scheduled in blocks.
//!
//! Lifecycle of a vote: Pending → Open → Delayed → Closed.
//! - Votes start no closer together than `vote_buffer_blocks`.
//! - Weight is `min(balance at snapshot, balance now)`; the snapshot block is
//!   always `start_block - 1`.
//! - Thresholds are snapshotted at creation; later setting changes never
//!   touch existing votes.
//! - Successful votes execute strictly in creation order.
//!
//! Every YEA vote moves the voter's last-yea marker forward, which the
//! dissent oracle reads to keep recent supporters from acting immediately.

pub mod error;
pub mod events;
pub mod markers;
pub mod pct;
pub mod permissions;
pub mod registry;
pub mod script;
pub mod sequencer;
pub mod settings;
pub mod snapshot;
pub mod vote;
pub mod weight;

pub use error::{ThresholdError, VotingError};
pub use events::VotingEvent;
pub use markers::{LastVoteSource, VoterMarkers};
pub use pct::is_value_pct;
pub use permissions::{Capability, PermissionChecker, PermissionTable};
pub use registry::VoteRegistry;
pub use script::{CallAction, ExecScript, ExecutionContext, ScriptError, ScriptExecutor};
pub use settings::VoteSettings;
pub use snapshot::RegistrySnapshot;
pub use vote::{Vote, VoteId, VotePhase, VoteStatus, VoterState};
pub use weight::voter_weight;
