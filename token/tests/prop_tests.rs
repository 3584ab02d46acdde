use proptest::prelude::*;

use dandelion_token::{CheckpointToken, VotingToken};
use dandelion_types::{Address, BlockNumber, TokenAmount};

proptest! {
    /// Historical queries return the balance as of the last mint at or before the block.
    #[test]
    fn history_matches_running_total(
        mints in prop::collection::vec((1u64..20, 1u128..1_000), 1..20),
        probe in 0u64..500,
    ) {
        let token = CheckpointToken::new();
        let owner = Address::from_low_u64(1);
        let mut height = 0u64;
        let mut expected = 0u128;
        for (gap, amount) in &mints {
            height += gap;
            token.generate_tokens(&owner, TokenAmount::new(*amount), BlockNumber::new(height)).unwrap();
            if height <= probe {
                expected += amount;
            }
        }
        prop_assert_eq!(token.balance_of_at(&owner, BlockNumber::new(probe)).raw(), expected);
        prop_assert_eq!(token.total_supply_at(BlockNumber::new(probe)).raw(), expected);
    }

    /// Transfers conserve total supply at every block.
    #[test]
    fn transfers_conserve_supply(initial in 1u128..1_000_000, moved in 0u128..1_000_000) {
        let token = CheckpointToken::new();
        let a = Address::from_low_u64(1);
        let b = Address::from_low_u64(2);
        token.generate_tokens(&a, TokenAmount::new(initial), BlockNumber::new(1)).unwrap();
        let _ = token.transfer(&a, &b, TokenAmount::new(moved), BlockNumber::new(2));
        let at = BlockNumber::new(2);
        let sum = token.balance_of_at(&a, at).raw() + token.balance_of_at(&b, at).raw();
        prop_assert_eq!(sum, token.total_supply_at(at).raw());
    }
}
