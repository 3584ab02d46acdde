use dandelion_types::BlockNumber;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("write at block {at} precedes latest checkpoint at {latest}")]
    NonMonotonicBlock { at: BlockNumber, latest: BlockNumber },

    #[error("arithmetic overflow in token supply")]
    Overflow,

    #[error("amount must be non-zero")]
    ZeroAmount,
}
