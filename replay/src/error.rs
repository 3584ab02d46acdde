use dandelion_dissent::DissentError;
use dandelion_token::TokenError;
use dandelion_voting::{ScriptError, VotingError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("config error: {0}")]
    Config(String),

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("step {index} at block {block} goes back in time (last block {last})")]
    BlockRegression { index: usize, block: u64, last: u64 },

    #[error("invalid script: {0}")]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Voting(#[from] VotingError),

    #[error(transparent)]
    Dissent(#[from] DissentError),

    #[error(transparent)]
    Token(#[from] TokenError),
}
