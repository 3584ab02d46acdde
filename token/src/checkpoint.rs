//! Checkpointed token ledger.
//!
//! Every balance change appends (or overwrites, within the same block) a
//! `(from_block, value)` checkpoint, so historical lookups are a binary search.
//! Writes must arrive in non-decreasing block order.

use crate::error::TokenError;
use crate::source::VotingToken;
use dandelion_types::{Address, BlockNumber, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// A value that holds from `from_block` until the next checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub from_block: BlockNumber,
    pub value: TokenAmount,
}

#[derive(Default)]
struct Ledger {
    balances: HashMap<Address, Vec<Checkpoint>>,
    supply: Vec<Checkpoint>,
    last_write: BlockNumber,
}

impl Ledger {
    fn ensure_monotonic(&self, at: BlockNumber) -> Result<(), TokenError> {
        if at < self.last_write {
            return Err(TokenError::NonMonotonicBlock {
                at,
                latest: self.last_write,
            });
        }
        Ok(())
    }

    fn balance_at(&self, owner: &Address, block: BlockNumber) -> TokenAmount {
        self.balances
            .get(owner)
            .map(|history| value_at(history, block))
            .unwrap_or(TokenAmount::ZERO)
    }

    fn latest_balance(&self, owner: &Address) -> TokenAmount {
        self.balances
            .get(owner)
            .and_then(|history| history.last())
            .map(|c| c.value)
            .unwrap_or(TokenAmount::ZERO)
    }

    fn latest_supply(&self) -> TokenAmount {
        self.supply.last().map(|c| c.value).unwrap_or(TokenAmount::ZERO)
    }
}

fn value_at(history: &[Checkpoint], block: BlockNumber) -> TokenAmount {
    let idx = history.partition_point(|c| c.from_block <= block);
    if idx == 0 {
        TokenAmount::ZERO
    } else {
        history[idx - 1].value
    }
}

fn record(history: &mut Vec<Checkpoint>, at: BlockNumber, value: TokenAmount) {
    match history.last_mut() {
        Some(last) if last.from_block == at => last.value = value,
        _ => history.push(Checkpoint {
            from_block: at,
            value,
        }),
    }
}

/// An in-memory token with historical balances.
///
/// Thread-safe; writes take `&self` so the token can be shared with the
/// voting registry while holders keep minting and transferring.
#[derive(Default)]
pub struct CheckpointToken {
    ledger: RwLock<Ledger>,
}

impl CheckpointToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` to `owner` at block `at`.
    pub fn generate_tokens(
        &self,
        owner: &Address,
        amount: TokenAmount,
        at: BlockNumber,
    ) -> Result<(), TokenError> {
        if amount.is_zero() {
            return Err(TokenError::ZeroAmount);
        }
        let mut ledger = self.ledger.write().unwrap_or_else(PoisonError::into_inner);
        ledger.ensure_monotonic(at)?;
        let supply = ledger
            .latest_supply()
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = ledger
            .latest_balance(owner)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        record(&mut ledger.supply, at, supply);
        record(ledger.balances.entry(*owner).or_default(), at, balance);
        ledger.last_write = at;
        tracing::trace!(%owner, %amount, block = %at, "tokens generated");
        Ok(())
    }

    /// Burn `amount` from `owner` at block `at`.
    pub fn destroy_tokens(
        &self,
        owner: &Address,
        amount: TokenAmount,
        at: BlockNumber,
    ) -> Result<(), TokenError> {
        if amount.is_zero() {
            return Err(TokenError::ZeroAmount);
        }
        let mut ledger = self.ledger.write().unwrap_or_else(PoisonError::into_inner);
        ledger.ensure_monotonic(at)?;
        let available = ledger.latest_balance(owner);
        let balance = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                needed: amount.raw(),
                available: available.raw(),
            })?;
        let supply = ledger
            .latest_supply()
            .checked_sub(amount)
            .ok_or(TokenError::Overflow)?;
        record(&mut ledger.supply, at, supply);
        record(ledger.balances.entry(*owner).or_default(), at, balance);
        ledger.last_write = at;
        tracing::trace!(%owner, %amount, block = %at, "tokens destroyed");
        Ok(())
    }

    /// Move `amount` from `from` to `to` at block `at`.
    pub fn transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
        at: BlockNumber,
    ) -> Result<(), TokenError> {
        if amount.is_zero() {
            return Err(TokenError::ZeroAmount);
        }
        let mut ledger = self.ledger.write().unwrap_or_else(PoisonError::into_inner);
        ledger.ensure_monotonic(at)?;
        let available = ledger.latest_balance(from);
        let from_balance =
            available
                .checked_sub(amount)
                .ok_or(TokenError::InsufficientBalance {
                    needed: amount.raw(),
                    available: available.raw(),
                })?;
        record(ledger.balances.entry(*from).or_default(), at, from_balance);
        let to_balance = ledger
            .latest_balance(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        record(ledger.balances.entry(*to).or_default(), at, to_balance);
        ledger.last_write = at;
        tracing::trace!(%from, %to, %amount, block = %at, "tokens transferred");
        Ok(())
    }

    /// Latest balance of `owner`.
    pub fn balance_of(&self, owner: &Address) -> TokenAmount {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .latest_balance(owner)
    }

    /// Latest total supply.
    pub fn total_supply(&self) -> TokenAmount {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .latest_supply()
    }

    /// Full checkpoint history of `owner`.
    pub fn history_of(&self, owner: &Address) -> Vec<Checkpoint> {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .balances
            .get(owner)
            .cloned()
            .unwrap_or_default()
    }
}

impl VotingToken for CheckpointToken {
    fn balance_of_at(&self, owner: &Address, block: BlockNumber) -> TokenAmount {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .balance_at(owner, block)
    }

    fn total_supply_at(&self, block: BlockNumber) -> TokenAmount {
        let ledger = self.ledger.read().unwrap_or_else(PoisonError::into_inner);
        value_at(&ledger.supply, block)
    }
}
