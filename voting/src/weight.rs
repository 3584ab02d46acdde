//! Voting weight resolution.

use dandelion_token::VotingToken;
use dandelion_types::{Address, BlockNumber, TokenAmount};

/// Weight `voter` may cast on a vote snapshotted at `snapshot_block`.
///
/// The lesser of the snapshot balance and the balance at `now`: tokens
/// received after the snapshot add nothing, tokens sent away are no longer
/// counted.
pub fn voter_weight(
    token: &dyn VotingToken,
    voter: &Address,
    snapshot_block: BlockNumber,
    now: BlockNumber,
) -> TokenAmount {
    let at_snapshot = token.balance_of_at(voter, snapshot_block);
    if at_snapshot.is_zero() {
        return at_snapshot;
    }
    at_snapshot.min(token.balance_of_at(voter, now))
}
