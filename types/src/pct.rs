//! Fixed-point percentages.
//!
//! A percentage is an integer scaled by [`PCT_BASE`] (`10^18` = 100%).
//! `pct16(50)` is 50%.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 100% in fixed-point.
pub const PCT_BASE: u128 = 1_000_000_000_000_000_000;

/// A fraction scaled by [`PCT_BASE`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pct(u128);

impl Pct {
    pub const ZERO: Self = Self(0);
    pub const HUNDRED: Self = Self(PCT_BASE);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// Whether this value is strictly below 100%.
    pub fn is_below_hundred(&self) -> bool {
        self.0 < PCT_BASE
    }
}

/// `x` percent expressed with 16 decimals, i.e. `x * 10^16`.
pub const fn pct16(x: u128) -> Pct {
    Pct(x * 10_000_000_000_000_000)
}

impl fmt::Display for Pct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 10_000_000_000_000_000;
        let frac = self.0 % 10_000_000_000_000_000;
        if frac == 0 {
            write!(f, "{whole}%")
        } else {
            write!(f, "{whole}.{:016}%", frac)
        }
    }
}
