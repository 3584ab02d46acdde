//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while constructing or parsing the shared types.
#[derive(Debug, Error)]
pub enum DandelionError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("{0}")]
    Other(String),
}
