//! Historical token balances for Dandelion Voting.
//!
//! Voting weight is read from a token that can answer "what was the balance
//! at block N" for any past block. The voting engine depends only on the
//! [`VotingToken`] trait; [`CheckpointToken`] is an in-memory implementation
//! that keeps a checkpoint history per holder.

pub mod checkpoint;
pub mod error;
pub mod source;

pub use checkpoint::{Checkpoint, CheckpointToken};
pub use error::TokenError;
pub use source::VotingToken;
