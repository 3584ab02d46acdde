//! Block number type. All time in the engine is measured in blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Height of a block in the hosting ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockNumber(u64);

impl BlockNumber {
    pub const GENESIS: Self = Self(0);

    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    pub fn checked_add(self, blocks: u64) -> Option<Self> {
        self.0.checked_add(blocks).map(Self)
    }

    pub fn checked_sub(self, blocks: u64) -> Option<Self> {
        self.0.checked_sub(blocks).map(Self)
    }

    pub fn saturating_add(self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }

    /// Blocks elapsed since this block (relative to `now`), zero if `now` is earlier.
    pub fn elapsed_since(&self, now: BlockNumber) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether `now` is at or past this block + `blocks`.
    pub fn has_elapsed(&self, blocks: u64, now: BlockNumber) -> bool {
        now.0 >= self.0.saturating_add(blocks)
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for BlockNumber {
    fn from(height: u64) -> Self {
        Self(height)
    }
}
