//! Scenario replay for Dandelion Voting.
//!
//! Builds a token, permission table, voting registry and dissent oracle from
//! a [`ReplayConfig`], then applies the steps of a JSON [`Scenario`] in block
//! order and reports the resulting votes and events.

pub mod config;
pub mod error;
pub mod executor;
pub mod runner;
pub mod scenario;

pub use config::ReplayConfig;
pub use error::ReplayError;
pub use executor::LoggingExecutor;
pub use runner::{Replay, ReplayReport, StepOutcome, VoteReport};
pub use scenario::{Action, Scenario, Step};
