//! The Dissent Oracle.
//!
//! A permission predicate consulted before privileged actions. An address
//! that voted YEA is barred for `dissent_window_blocks` after the start of
//! that vote, so supporters cannot act on an outcome they just pushed for.
//! A later NAY lifts the bar immediately.

pub mod error;
pub mod events;
pub mod oracle;

pub use error::DissentError;
pub use events::DissentEvent;
pub use oracle::{DissentOracle, DissentSubject};
