//! Nullable chain: deterministic block height for testing.

use dandelion_types::BlockNumber;
use std::cell::Cell;

/// A deterministic block clock.
///
/// The height only moves when you tell it to.
pub struct NullChain {
    height: Cell<u64>,
}

impl NullChain {
    pub fn new(initial_height: u64) -> Self {
        Self {
            height: Cell::new(initial_height),
        }
    }

    /// Current block.
    pub fn now(&self) -> BlockNumber {
        BlockNumber::new(self.height.get())
    }

    /// Mine `blocks` empty blocks.
    pub fn advance(&self, blocks: u64) {
        self.height.set(self.height.get() + blocks);
    }

    /// Mine up to exactly `height`. Never moves backwards.
    pub fn advance_to(&self, height: u64) {
        if height > self.height.get() {
            self.height.set(height);
        }
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new(1)
    }
}
