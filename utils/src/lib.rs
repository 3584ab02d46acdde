//! Shared utilities for Dandelion Voting tooling.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
