//! The vote registry: creation, casting, execution and settings.
//!
//! All mutations go through `&mut self`, so operations are applied one at a
//! time in the order the caller sequences them. Every operation either
//! completes or returns an error having changed nothing.

use crate::error::VotingError;
use crate::events::VotingEvent;
use crate::markers::{LastVoteSource, VoterMarkers};
use crate::permissions::{Capability, PermissionChecker};
use crate::script::{ExecScript, ExecutionContext, ScriptExecutor};
use crate::sequencer::blocking_vote;
use crate::settings::{check_blocks, check_thresholds, VoteSettings};
use crate::snapshot::RegistrySnapshot;
use crate::vote::{Vote, VoteId, VotePhase, VoterState};
use crate::weight::voter_weight;
use dandelion_token::VotingToken;
use dandelion_types::{Address, BlockNumber, Pct, ScriptHash, TokenAmount};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// State fixed by `initialize`.
struct Deployment {
    token: Arc<dyn VotingToken>,
    settings: VoteSettings,
    initialized_at: BlockNumber,
}

/// Owns every vote, the global settings and the per-voter markers.
pub struct VoteRegistry {
    app: Address,
    permissions: Arc<dyn PermissionChecker>,
    deployment: Option<Deployment>,
    votes: Vec<Vote>,
    markers: VoterMarkers,
    events: Vec<VotingEvent>,
}

impl VoteRegistry {
    /// An uninitialized registry living at `app`.
    pub fn new(app: Address, permissions: Arc<dyn PermissionChecker>) -> Self {
        Self {
            app,
            permissions,
            deployment: None,
            votes: Vec::new(),
            markers: VoterMarkers::default(),
            events: Vec::new(),
        }
    }

    /// One-shot setup: binds the token and validates the initial settings.
    pub fn initialize(
        &mut self,
        token: Arc<dyn VotingToken>,
        settings: VoteSettings,
        now: BlockNumber,
    ) -> Result<(), VotingError> {
        if self.deployment.is_some() {
            return Err(VotingError::AlreadyInitialized);
        }
        settings.validate()?;
        tracing::info!(
            app = %self.app,
            block = %now,
            support = %settings.support_required_pct,
            quorum = %settings.min_accept_quorum_pct,
            duration = settings.vote_duration_blocks,
            buffer = settings.vote_buffer_blocks,
            delay = settings.execution_delay_blocks,
            "voting app initialized"
        );
        self.deployment = Some(Deployment {
            token,
            settings,
            initialized_at: now,
        });
        Ok(())
    }

    pub fn has_initialized(&self) -> bool {
        self.deployment.is_some()
    }

    pub fn initialized_at(&self) -> Option<BlockNumber> {
        self.deployment.as_ref().map(|d| d.initialized_at)
    }

    pub fn app(&self) -> Address {
        self.app
    }

    pub fn settings(&self) -> Result<&VoteSettings, VotingError> {
        Ok(&self.deployment()?.settings)
    }

    pub fn token(&self) -> Result<Arc<dyn VotingToken>, VotingError> {
        Ok(Arc::clone(&self.deployment()?.token))
    }

    fn deployment(&self) -> Result<&Deployment, VotingError> {
        self.deployment.as_ref().ok_or(VotingError::NotInitialized)
    }

    fn settings_mut(&mut self) -> Result<&mut VoteSettings, VotingError> {
        self.deployment
            .as_mut()
            .map(|d| &mut d.settings)
            .ok_or(VotingError::NotInitialized)
    }

    /// An uninitialized app grants nothing.
    fn authorize(&self, sender: &Address, capability: Capability) -> Result<(), VotingError> {
        if self.deployment.is_some()
            && self.permissions.has_permission(sender, &self.app, capability)
        {
            return Ok(());
        }
        tracing::debug!(%sender, %capability, "authorization failed");
        Err(VotingError::AuthFailed { capability })
    }

    // ── Settings ────────────────────────────────────────────────────────

    pub fn change_support_required_pct(
        &mut self,
        sender: &Address,
        support_required_pct: Pct,
    ) -> Result<(), VotingError> {
        self.authorize(sender, Capability::ModifySupport)?;
        let settings = self.settings_mut()?;
        check_thresholds(support_required_pct, settings.min_accept_quorum_pct)?;
        settings.support_required_pct = support_required_pct;
        tracing::info!(support = %support_required_pct, "support required changed");
        self.events.push(VotingEvent::ChangeSupportRequired {
            support_required_pct,
        });
        Ok(())
    }

    pub fn change_min_accept_quorum_pct(
        &mut self,
        sender: &Address,
        min_accept_quorum_pct: Pct,
    ) -> Result<(), VotingError> {
        self.authorize(sender, Capability::ModifyQuorum)?;
        let settings = self.settings_mut()?;
        check_thresholds(settings.support_required_pct, min_accept_quorum_pct)?;
        settings.min_accept_quorum_pct = min_accept_quorum_pct;
        tracing::info!(quorum = %min_accept_quorum_pct, "minimum quorum changed");
        self.events.push(VotingEvent::ChangeMinQuorum {
            min_accept_quorum_pct,
        });
        Ok(())
    }

    pub fn change_vote_buffer_blocks(
        &mut self,
        sender: &Address,
        vote_buffer_blocks: u64,
    ) -> Result<(), VotingError> {
        self.authorize(sender, Capability::ModifyBufferBlocks)?;
        check_blocks("vote buffer", vote_buffer_blocks)?;
        self.settings_mut()?.vote_buffer_blocks = vote_buffer_blocks;
        tracing::info!(buffer = vote_buffer_blocks, "vote buffer changed");
        self.events.push(VotingEvent::ChangeVoteBufferBlocks { vote_buffer_blocks });
        Ok(())
    }

    pub fn change_execution_delay_blocks(
        &mut self,
        sender: &Address,
        execution_delay_blocks: u64,
    ) -> Result<(), VotingError> {
        self.authorize(sender, Capability::ModifyExecutionDelay)?;
        check_blocks("execution delay", execution_delay_blocks)?;
        self.settings_mut()?.execution_delay_blocks = execution_delay_blocks;
        tracing::info!(delay = execution_delay_blocks, "execution delay changed");
        self.events.push(VotingEvent::ChangeExecutionDelayBlocks {
            execution_delay_blocks,
        });
        Ok(())
    }

    // ── Creation ────────────────────────────────────────────────────────

    /// Create a vote. With `cast_vote`, the creator votes YEA in the same
    /// step when the vote opens immediately and they hold weight.
    pub fn new_vote(
        &mut self,
        sender: &Address,
        script: Vec<u8>,
        metadata: impl Into<String>,
        cast_vote: bool,
        now: BlockNumber,
    ) -> Result<VoteId, VotingError> {
        self.authorize(sender, Capability::CreateVotes)?;
        self.create_vote(*sender, script, metadata.into(), cast_vote, now)
    }

    /// Wrap `script` into a new vote, casting the sender's YEA if possible.
    pub fn forward(
        &mut self,
        sender: &Address,
        script: Vec<u8>,
        now: BlockNumber,
    ) -> Result<VoteId, VotingError> {
        if !self.can_forward(sender) {
            tracing::debug!(%sender, "forwarding refused");
            return Err(VotingError::ForwardingNotAllowed);
        }
        self.create_vote(*sender, script, String::new(), true, now)
    }

    pub fn can_forward(&self, sender: &Address) -> bool {
        self.deployment.is_some()
            && self
                .permissions
                .has_permission(sender, &self.app, Capability::CreateVotes)
    }

    pub fn is_forwarder(&self) -> bool {
        true
    }

    fn create_vote(
        &mut self,
        creator: Address,
        script: Vec<u8>,
        metadata: String,
        cast_vote: bool,
        now: BlockNumber,
    ) -> Result<VoteId, VotingError> {
        let deployment = self.deployment()?;
        let settings = &deployment.settings;

        let start_block = match self.votes.last() {
            None => now,
            Some(last) => last
                .start_block
                .checked_add(settings.vote_buffer_blocks)
                .ok_or(VotingError::Overflow)?
                .max(now),
        };
        let snapshot_block = start_block.checked_sub(1).ok_or(VotingError::Overflow)?;
        let end_block = start_block
            .checked_add(settings.vote_duration_blocks)
            .ok_or(VotingError::Overflow)?;
        let execution_block = end_block
            .checked_add(settings.execution_delay_blocks)
            .ok_or(VotingError::Overflow)?;

        let id = VoteId::new(self.votes.len() as u64);
        let mut vote = Vote {
            id,
            creator,
            metadata,
            script,
            start_block,
            snapshot_block,
            end_block,
            execution_block,
            support_required_pct: settings.support_required_pct,
            min_accept_quorum_pct: settings.min_accept_quorum_pct,
            voting_power: deployment.token.total_supply_at(snapshot_block),
            yea: TokenAmount::ZERO,
            nay: TokenAmount::ZERO,
            executed: false,
            voters: HashMap::new(),
        };

        let mut creator_stake = None;
        if cast_vote {
            if vote.is_open(now) {
                let stake = voter_weight(deployment.token.as_ref(), &creator, snapshot_block, now);
                if !stake.is_zero() {
                    apply_ballot(&mut vote, creator, true, stake)?;
                    creator_stake = Some(stake);
                }
            } else {
                tracing::debug!(vote_id = %id, %start_block, "vote not open yet, creator ballot skipped");
            }
        }

        tracing::info!(
            vote_id = %id,
            %creator,
            %start_block,
            %end_block,
            %execution_block,
            voting_power = %vote.voting_power,
            "vote started"
        );
        self.events.push(VotingEvent::StartVote {
            vote_id: id,
            creator,
            metadata: vote.metadata.clone(),
        });
        if let Some(stake) = creator_stake {
            self.record_ballot(id, creator, true, stake, start_block);
        }
        self.votes.push(vote);
        Ok(id)
    }

    // ── Casting ─────────────────────────────────────────────────────────

    /// Cast `sender`'s ballot. Unknown ids are reported as not votable.
    pub fn vote(
        &mut self,
        sender: &Address,
        vote_id: VoteId,
        supports: bool,
        now: BlockNumber,
    ) -> Result<(), VotingError> {
        self.deployment()?;
        let stake = self
            .votes
            .get(vote_id.index())
            .and_then(|vote| self.voting_stake(vote, sender, now))
            .ok_or(VotingError::VotingNotAllowed(vote_id))?;
        let vote = self
            .votes
            .get_mut(vote_id.index())
            .ok_or(VotingError::VotingNotAllowed(vote_id))?;
        apply_ballot(vote, *sender, supports, stake)?;
        let start_block = vote.start_block;
        self.record_ballot(vote_id, *sender, supports, stake, start_block);
        Ok(())
    }

    pub fn can_vote(
        &self,
        vote_id: VoteId,
        voter: &Address,
        now: BlockNumber,
    ) -> Result<bool, VotingError> {
        let vote = self.get_vote(vote_id)?;
        Ok(self.voting_stake(vote, voter, now).is_some())
    }

    /// Weight `voter` would cast now, or `None` when they may not vote.
    fn voting_stake(&self, vote: &Vote, voter: &Address, now: BlockNumber) -> Option<TokenAmount> {
        let token = &self.deployment.as_ref()?.token;
        if !vote.is_open(now) {
            tracing::debug!(vote_id = %vote.id, %voter, phase = ?vote.phase(now), "vote is not open");
            return None;
        }
        if vote.voter_state(voter) != VoterState::Absent {
            tracing::debug!(vote_id = %vote.id, %voter, "voter already voted");
            return None;
        }
        let stake = voter_weight(token.as_ref(), voter, vote.snapshot_block, now);
        if stake.is_zero() {
            tracing::debug!(vote_id = %vote.id, %voter, "voter has no weight");
            return None;
        }
        Some(stake)
    }

    fn record_ballot(
        &mut self,
        vote_id: VoteId,
        voter: Address,
        supports: bool,
        stake: TokenAmount,
        start_block: BlockNumber,
    ) {
        self.markers
            .record(voter, VoterState::from_support(supports), start_block);
        tracing::info!(%vote_id, %voter, supports, %stake, "vote cast");
        self.events.push(VotingEvent::CastVote {
            vote_id,
            voter,
            supports,
            stake,
        });
    }

    // ── Execution ───────────────────────────────────────────────────────

    /// Execute a closed, successful vote whose predecessors are settled.
    ///
    /// `executed` is set before the script runs and cleared again if the
    /// executor fails, so a failed execution leaves the vote untouched.
    pub fn execute_vote(
        &mut self,
        vote_id: VoteId,
        executor: &mut dyn ScriptExecutor,
        now: BlockNumber,
    ) -> Result<(), VotingError> {
        self.deployment()?;
        let executable = self
            .votes
            .get(vote_id.index())
            .is_some_and(|vote| self.executable(vote, now));
        if !executable {
            return Err(VotingError::ExecutionNotAllowed(vote_id));
        }
        let vote = self
            .votes
            .get_mut(vote_id.index())
            .ok_or(VotingError::ExecutionNotAllowed(vote_id))?;

        vote.executed = true;
        let script_hash = ScriptHash::digest(&vote.script);
        let outcome = if vote.has_script() {
            let ctx = ExecutionContext {
                vote_id,
                block: now,
                script_hash,
            };
            ExecScript::decode(&vote.script).and_then(|script| executor.execute(&script, &ctx))
        } else {
            Ok(())
        };
        if let Err(source) = outcome {
            vote.executed = false;
            tracing::warn!(%vote_id, error = %source, "vote script failed, execution rolled back");
            return Err(VotingError::ScriptExecutionFailed { vote_id, source });
        }

        tracing::info!(%vote_id, block = %now, %script_hash, "vote executed");
        self.events.push(VotingEvent::ExecuteVote {
            vote_id,
            block: now,
            script_hash,
        });
        Ok(())
    }

    pub fn can_execute(&self, vote_id: VoteId, now: BlockNumber) -> Result<bool, VotingError> {
        let vote = self.get_vote(vote_id)?;
        Ok(self.executable(vote, now))
    }

    fn executable(&self, vote: &Vote, now: BlockNumber) -> bool {
        if vote.phase(now) != VotePhase::Closed {
            tracing::debug!(vote_id = %vote.id, phase = ?vote.phase(now), "vote is not closed");
            return false;
        }
        if vote.executed {
            tracing::debug!(vote_id = %vote.id, "vote already executed");
            return false;
        }
        if !vote.is_accepted() {
            tracing::debug!(vote_id = %vote.id, "vote did not pass");
            return false;
        }
        if let Some(blocker) = blocking_vote(&self.votes, vote.id) {
            tracing::debug!(vote_id = %vote.id, blocked_by = %blocker, "earlier passed vote not executed");
            return false;
        }
        true
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn get_vote(&self, vote_id: VoteId) -> Result<&Vote, VotingError> {
        self.deployment()?;
        self.votes
            .get(vote_id.index())
            .ok_or(VotingError::NoSuchVote(vote_id))
    }

    pub fn get_voter_state(
        &self,
        vote_id: VoteId,
        voter: &Address,
    ) -> Result<VoterState, VotingError> {
        Ok(self.get_vote(vote_id)?.voter_state(voter))
    }

    pub fn vote_success(&self, vote_id: VoteId) -> Result<bool, VotingError> {
        Ok(self.get_vote(vote_id)?.is_accepted())
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn votes_length(&self) -> u64 {
        self.votes.len() as u64
    }

    pub fn last_yea_vote_block(&self, voter: &Address) -> Option<BlockNumber> {
        self.markers.last_yea_vote_block(voter)
    }

    pub fn last_vote_state(&self, voter: &Address) -> VoterState {
        self.markers.last_vote_state(voter)
    }

    /// Drain queued events, oldest first.
    pub fn take_events(&mut self) -> Vec<VotingEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Serialize settings, votes and markers. Collaborators are not included.
    pub fn save_state(&self) -> Result<Vec<u8>, VotingError> {
        RegistrySnapshot {
            app: self.app,
            settings: self.deployment.as_ref().map(|d| d.settings.clone()),
            initialized_at: self.initialized_at(),
            votes: self.votes.clone(),
            markers: self.markers.clone(),
        }
        .encode()
    }

    /// Restore a registry saved with [`save_state`](Self::save_state).
    pub fn load_state(
        bytes: &[u8],
        token: Arc<dyn VotingToken>,
        permissions: Arc<dyn PermissionChecker>,
    ) -> Result<Self, VotingError> {
        let snapshot = RegistrySnapshot::decode(bytes)?;
        if let Some((index, _)) = snapshot
            .votes
            .iter()
            .enumerate()
            .find(|(index, vote)| vote.id.index() != *index)
        {
            return Err(VotingError::Snapshot(format!("vote at position {index} has a mismatched id")));
        }
        let deployment = match (snapshot.settings, snapshot.initialized_at) {
            (Some(settings), Some(initialized_at)) => Some(Deployment {
                token,
                settings,
                initialized_at,
            }),
            (None, None) if snapshot.votes.is_empty() => None,
            _ => return Err(VotingError::Snapshot("incomplete deployment record".into())),
        };
        tracing::debug!(app = %snapshot.app, votes = snapshot.votes.len(), "registry state loaded");
        Ok(Self {
            app: snapshot.app,
            permissions,
            deployment,
            votes: snapshot.votes,
            markers: snapshot.markers,
            events: Vec::new(),
        })
    }
}

fn apply_ballot(
    vote: &mut Vote,
    voter: Address,
    supports: bool,
    stake: TokenAmount,
) -> Result<(), VotingError> {
    let tally = if supports { &mut vote.yea } else { &mut vote.nay };
    *tally = tally.checked_add(stake).ok_or(VotingError::Overflow)?;
    vote.voters.insert(voter, VoterState::from_support(supports));
    Ok(())
}

impl LastVoteSource for VoteRegistry {
    fn last_yea_vote_block(&self, voter: &Address) -> Option<BlockNumber> {
        self.markers.last_yea_vote_block(voter)
    }

    fn last_vote_state(&self, voter: &Address) -> VoterState {
        self.markers.last_vote_state(voter)
    }
}

/// Shared registry, as held by both the host and a dissent oracle.
impl LastVoteSource for RwLock<VoteRegistry> {
    fn last_yea_vote_block(&self, voter: &Address) -> Option<BlockNumber> {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .last_yea_vote_block(voter)
    }

    fn last_vote_state(&self, voter: &Address) -> VoterState {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .last_vote_state(voter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::PermissionTable;
    use crate::script::{CallAction, ScriptError};
    use dandelion_token::CheckpointToken;
    use dandelion_types::pct16;

    const APP: Address = Address::from_low_u64(0xa0);
    const ALICE: Address = Address::from_low_u64(1);
    const BOB: Address = Address::from_low_u64(2);

    #[derive(Default)]
    struct Recorder {
        runs: Vec<(VoteId, usize)>,
        fail: bool,
    }

    impl ScriptExecutor for Recorder {
        fn execute(&mut self, script: &ExecScript, ctx: &ExecutionContext) -> Result<(), ScriptError> {
            if self.fail {
                return Err(ScriptError::ActionReverted {
                    index: 0,
                    reason: "nope".into(),
                });
            }
            self.runs.push((ctx.vote_id, script.actions.len()));
            Ok(())
        }
    }

    fn settings() -> VoteSettings {
        VoteSettings {
            support_required_pct: pct16(50),
            min_accept_quorum_pct: pct16(20),
            vote_duration_blocks: 10,
            vote_buffer_blocks: 5,
            execution_delay_blocks: 3,
        }
    }

    fn setup() -> (VoteRegistry, Arc<CheckpointToken>) {
        let token = Arc::new(CheckpointToken::new());
        token.generate_tokens(&ALICE, TokenAmount::new(60), BlockNumber::new(1)).unwrap();
        token.generate_tokens(&BOB, TokenAmount::new(40), BlockNumber::new(1)).unwrap();
        let permissions = Arc::new(PermissionTable::new());
        permissions.grant_all(APP);
        let mut registry = VoteRegistry::new(APP, permissions);
        registry
            .initialize(token.clone(), settings(), BlockNumber::new(1))
            .unwrap();
        (registry, token)
    }

    fn script() -> Vec<u8> {
        ExecScript::new(vec![CallAction::new(Address::from_low_u64(0xee), vec![0xab])]).encode()
    }

    #[test]
    fn second_initialize_fails() {
        let (mut registry, token) = setup();
        assert!(matches!(
            registry.initialize(token, settings(), BlockNumber::new(2)),
            Err(VotingError::AlreadyInitialized)
        ));
    }

    #[test]
    fn uninitialized_registry_rejects_everything() {
        let mut registry = VoteRegistry::new(APP, Arc::new(PermissionTable::new()));
        assert!(matches!(
            registry.new_vote(&ALICE, Vec::new(), "", false, BlockNumber::new(5)),
            Err(VotingError::AuthFailed {
                capability: Capability::CreateVotes
            })
        ));
        assert!(matches!(
            registry.forward(&ALICE, Vec::new(), BlockNumber::new(5)),
            Err(VotingError::ForwardingNotAllowed)
        ));
        assert!(matches!(
            registry.vote(&ALICE, VoteId::new(0), true, BlockNumber::new(5)),
            Err(VotingError::NotInitialized)
        ));
        assert!(matches!(registry.settings(), Err(VotingError::NotInitialized)));
    }

    #[test]
    fn creator_vote_is_cast_when_open() {
        let (mut registry, _) = setup();
        let id = registry
            .new_vote(&ALICE, Vec::new(), "hello", true, BlockNumber::new(10))
            .unwrap();
        let vote = registry.get_vote(id).unwrap();
        assert_eq!(vote.yea, TokenAmount::new(60));
        assert_eq!(vote.voter_state(&ALICE), VoterState::Yea);
        assert_eq!(registry.last_yea_vote_block(&ALICE), Some(BlockNumber::new(10)));

        let events = registry.take_events();
        assert!(matches!(events[0], VotingEvent::StartVote { .. }));
        assert!(matches!(events[1], VotingEvent::CastVote { supports: true, .. }));
        assert!(registry.take_events().is_empty());
    }

    #[test]
    fn buffered_vote_skips_creator_ballot() {
        let (mut registry, _) = setup();
        registry.new_vote(&ALICE, Vec::new(), "", false, BlockNumber::new(10)).unwrap();
        let id = registry
            .new_vote(&ALICE, Vec::new(), "", true, BlockNumber::new(11))
            .unwrap();
        let vote = registry.get_vote(id).unwrap();
        assert_eq!(vote.start_block, BlockNumber::new(15));
        assert_eq!(vote.snapshot_block, BlockNumber::new(14));
        assert!(vote.yea.is_zero());
        assert_eq!(vote.voter_state(&ALICE), VoterState::Absent);
    }

    #[test]
    fn vote_at_genesis_overflows() {
        let (mut registry, _) = setup();
        assert!(matches!(
            registry.new_vote(&ALICE, Vec::new(), "", false, BlockNumber::GENESIS),
            Err(VotingError::Overflow)
        ));
        assert_eq!(registry.votes_length(), 0);
    }

    #[test]
    fn unknown_vote_ids() {
        let (mut registry, _) = setup();
        let missing = VoteId::new(3);
        assert!(matches!(
            registry.vote(&ALICE, missing, true, BlockNumber::new(10)),
            Err(VotingError::VotingNotAllowed(_))
        ));
        assert!(matches!(
            registry.execute_vote(missing, &mut Recorder::default(), BlockNumber::new(10)),
            Err(VotingError::ExecutionNotAllowed(_))
        ));
        assert!(matches!(registry.get_vote(missing), Err(VotingError::NoSuchVote(_))));
        assert!(matches!(
            registry.can_execute(missing, BlockNumber::new(10)),
            Err(VotingError::NoSuchVote(_))
        ));
    }

    #[test]
    fn execution_runs_script_once() {
        let (mut registry, _) = setup();
        let id = registry
            .new_vote(&ALICE, script(), "", true, BlockNumber::new(10))
            .unwrap();
        let mut executor = Recorder::default();
        assert!(matches!(
            registry.execute_vote(id, &mut executor, BlockNumber::new(22)),
            Err(VotingError::ExecutionNotAllowed(_))
        ));
        registry.execute_vote(id, &mut executor, BlockNumber::new(23)).unwrap();
        assert_eq!(executor.runs, vec![(id, 1)]);
        assert!(registry.get_vote(id).unwrap().executed);
        assert!(matches!(
            registry.execute_vote(id, &mut executor, BlockNumber::new(24)),
            Err(VotingError::ExecutionNotAllowed(_))
        ));
    }

    #[test]
    fn failed_script_leaves_vote_unexecuted() {
        let (mut registry, _) = setup();
        let id = registry
            .new_vote(&ALICE, script(), "", true, BlockNumber::new(10))
            .unwrap();
        registry.take_events();
        let mut executor = Recorder {
            fail: true,
            ..Recorder::default()
        };
        assert!(matches!(
            registry.execute_vote(id, &mut executor, BlockNumber::new(23)),
            Err(VotingError::ScriptExecutionFailed { .. })
        ));
        assert!(!registry.get_vote(id).unwrap().executed);
        assert!(registry.take_events().is_empty());
        assert!(registry.can_execute(id, BlockNumber::new(23)).unwrap());
    }

    #[test]
    fn malformed_script_fails_execution() {
        let (mut registry, _) = setup();
        let id = registry
            .new_vote(&ALICE, vec![0, 0, 0, 1, 0xde, 0xad], "", true, BlockNumber::new(10))
            .unwrap();
        let mut executor = Recorder::default();
        let err = registry
            .execute_vote(id, &mut executor, BlockNumber::new(23))
            .unwrap_err();
        assert!(matches!(
            err,
            VotingError::ScriptExecutionFailed {
                source: ScriptError::Malformed(_),
                ..
            }
        ));
        assert!(executor.runs.is_empty());
        assert!(!registry.get_vote(id).unwrap().executed);
    }

    #[test]
    fn empty_script_skips_executor() {
        let (mut registry, _) = setup();
        let id = registry
            .new_vote(&ALICE, ExecScript::default().encode(), "", true, BlockNumber::new(10))
            .unwrap();
        let mut executor = Recorder {
            fail: true,
            ..Recorder::default()
        };
        registry.execute_vote(id, &mut executor, BlockNumber::new(23)).unwrap();
        assert!(registry.get_vote(id).unwrap().executed);
    }

    #[test]
    fn threshold_changes_validate_prospective_values() {
        let (mut registry, _) = setup();
        assert!(matches!(
            registry.change_min_accept_quorum_pct(&ALICE, pct16(51)),
            Err(VotingError::InvalidThresholds(_))
        ));
        assert!(matches!(
            registry.change_support_required_pct(&ALICE, pct16(19)),
            Err(VotingError::InvalidThresholds(_))
        ));
        registry.change_support_required_pct(&ALICE, pct16(70)).unwrap();
        registry.change_min_accept_quorum_pct(&ALICE, pct16(70)).unwrap();
        assert!(matches!(
            registry.change_vote_buffer_blocks(&ALICE, 0),
            Err(VotingError::InvalidDuration(_))
        ));
        let settings = registry.settings().unwrap();
        assert_eq!(settings.support_required_pct, pct16(70));
        assert_eq!(settings.min_accept_quorum_pct, pct16(70));
    }

    #[test]
    fn settings_changes_need_capability() {
        let token = Arc::new(CheckpointToken::new());
        let permissions = Arc::new(PermissionTable::new());
        permissions.grant(ALICE, APP, Capability::ModifyBufferBlocks);
        let mut registry = VoteRegistry::new(APP, permissions);
        registry.initialize(token, settings(), BlockNumber::new(1)).unwrap();

        registry.change_vote_buffer_blocks(&ALICE, 9).unwrap();
        assert!(matches!(
            registry.change_vote_buffer_blocks(&BOB, 9),
            Err(VotingError::AuthFailed { .. })
        ));
        assert!(matches!(
            registry.change_execution_delay_blocks(&ALICE, 9),
            Err(VotingError::AuthFailed {
                capability: Capability::ModifyExecutionDelay
            })
        ));
    }

    #[test]
    fn state_roundtrips_through_snapshot() {
        let (mut registry, token) = setup();
        let id = registry
            .new_vote(&ALICE, script(), "persist me", true, BlockNumber::new(10))
            .unwrap();
        registry.vote(&BOB, id, false, BlockNumber::new(12)).unwrap();

        let bytes = registry.save_state().unwrap();
        let restored =
            VoteRegistry::load_state(&bytes, token, Arc::new(PermissionTable::new())).unwrap();
        let vote = restored.get_vote(id).unwrap();
        assert_eq!(vote.metadata, "persist me");
        assert_eq!(vote.yea, TokenAmount::new(60));
        assert_eq!(vote.nay, TokenAmount::new(40));
        assert_eq!(restored.get_voter_state(id, &BOB).unwrap(), VoterState::Nay);
        assert_eq!(restored.last_yea_vote_block(&ALICE), Some(BlockNumber::new(10)));
        assert_eq!(restored.last_vote_state(&BOB), VoterState::Nay);
        assert_eq!(restored.settings().unwrap(), &settings());
    }

    #[test]
    fn garbage_snapshot_rejected() {
        let token = Arc::new(CheckpointToken::new());
        assert!(matches!(
            VoteRegistry::load_state(&[1, 2, 3], token, Arc::new(PermissionTable::new())),
            Err(VotingError::Snapshot(_))
        ));
    }
}
