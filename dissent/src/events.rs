use dandelion_types::Address;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DissentEvent {
    ChangeDissentWindow { dissent_window_blocks: u64 },
    ChangeVotingApp { voting_app: Address },
}
