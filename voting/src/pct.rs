//! Exact "is value over percentage of total" comparison.
//!
//! `value / total > pct / PCT_BASE` is evaluated as
//! `value * PCT_BASE > pct * total` in 256-bit arithmetic, so no rounding can
//! move a result across the threshold.

use dandelion_types::{Pct, TokenAmount, PCT_BASE};
use primitive_types::U256;

/// Whether `value` is strictly more than `pct` of `total`.
///
/// Always `false` when `total` is zero. Equal ratios fail.
pub fn is_value_pct(value: TokenAmount, total: TokenAmount, pct: Pct) -> bool {
    if total.is_zero() {
        return false;
    }
    // Both products are below 2^256: each factor fits in 128 bits.
    let computed = U256::from(value.raw()) * U256::from(PCT_BASE);
    let required = U256::from(pct.raw()) * U256::from(total.raw());
    computed > required
}
