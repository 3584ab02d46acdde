//! Creation-order execution of successful votes.

use crate::vote::{Vote, VoteId};

/// The earlier vote, if any, that must execute before `vote_id` may.
///
/// A vote is blocked by any earlier vote that passed and has not executed.
/// Failed votes never block. The scan stops at the nearest executed vote:
/// everything before it was already cleared when it executed, and tallies of
/// earlier votes are final by then because their voting ended first.
pub fn blocking_vote(votes: &[Vote], vote_id: VoteId) -> Option<VoteId> {
    let earlier = votes.get(..vote_id.index())?;
    earlier
        .iter()
        .rev()
        .take_while(|v| !v.executed)
        .find(|v| v.is_accepted())
        .map(|v| v.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ExecScript;
    use dandelion_types::{pct16, Address, BlockNumber, TokenAmount};
    use std::collections::HashMap;

    fn vote(id: u64, yea: u128, executed: bool) -> Vote {
        Vote {
            id: VoteId::new(id),
            creator: Address::from_low_u64(1),
            metadata: String::new(),
            script: ExecScript::default().encode(),
            start_block: BlockNumber::new(100 * (id + 1)),
            snapshot_block: BlockNumber::new(100 * (id + 1) - 1),
            end_block: BlockNumber::new(100 * (id + 1) + 500),
            execution_block: BlockNumber::new(100 * (id + 1) + 700),
            support_required_pct: pct16(50),
            min_accept_quorum_pct: pct16(20),
            voting_power: TokenAmount::new(100),
            yea: TokenAmount::new(yea),
            nay: TokenAmount::ZERO,
            executed,
            voters: HashMap::new(),
        }
    }

    #[test]
    fn first_vote_is_never_blocked() {
        let votes = vec![vote(0, 51, false)];
        assert_eq!(blocking_vote(&votes, VoteId::new(0)), None);
    }

    #[test]
    fn pending_successful_predecessor_blocks() {
        let votes = vec![vote(0, 51, false), vote(1, 51, false)];
        assert_eq!(blocking_vote(&votes, VoteId::new(1)), Some(VoteId::new(0)));
    }

    #[test]
    fn executed_predecessor_unblocks() {
        let votes = vec![vote(0, 51, true), vote(1, 51, false)];
        assert_eq!(blocking_vote(&votes, VoteId::new(1)), None);
    }

    #[test]
    fn failed_predecessor_is_skipped() {
        let votes = vec![vote(0, 51, false), vote(1, 0, false), vote(2, 51, false)];
        assert_eq!(blocking_vote(&votes, VoteId::new(2)), Some(VoteId::new(0)));
        let votes = vec![vote(0, 0, false), vote(1, 0, false), vote(2, 51, false)];
        assert_eq!(blocking_vote(&votes, VoteId::new(2)), None);
    }
}
