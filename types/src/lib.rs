//! Fundamental types for Dandelion Voting.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, block numbers, token amounts, fixed-point percentages and script hashes.

pub mod address;
pub mod amount;
pub mod block;
pub mod error;
pub mod hash;
pub mod pct;

pub use address::Address;
pub use amount::TokenAmount;
pub use block::BlockNumber;
pub use error::DandelionError;
pub use hash::ScriptHash;
pub use pct::{pct16, Pct, PCT_BASE};
