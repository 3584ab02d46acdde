//! The token collaborator consumed by the voting engine.

use dandelion_types::{Address, BlockNumber, TokenAmount};

/// A token whose balances and supply can be queried at any past block.
///
/// Values reported for block `N` include every change applied at `N`.
pub trait VotingToken: Send + Sync {
    /// Balance held by `owner` at the end of `block`.
    fn balance_of_at(&self, owner: &Address, block: BlockNumber) -> TokenAmount;

    /// Total weighted supply at the end of `block`.
    fn total_supply_at(&self, block: BlockNumber) -> TokenAmount;
}
