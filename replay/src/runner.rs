//! Applies scenario steps to an in-memory deployment.

use crate::config::ReplayConfig;
use crate::error::ReplayError;
use crate::executor::LoggingExecutor;
use crate::scenario::{Action, Scenario, Step};
use dandelion_dissent::{DissentEvent, DissentOracle, DissentSubject};
use dandelion_token::CheckpointToken;
use dandelion_types::{pct16, Address, BlockNumber, Pct, TokenAmount};
use dandelion_voting::{
    Capability, ExecScript, PermissionTable, ScriptError, Vote, VoteId, VoteRegistry, VoteStatus,
    VotingEvent,
};
use serde::Serialize;
use serde_json::json;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Result of one step.
#[derive(Clone, Debug, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub block: u64,
    pub action: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A vote as shown in the final report.
#[derive(Clone, Debug, Serialize)]
pub struct VoteReport {
    pub id: u64,
    pub creator: Address,
    pub metadata: String,
    pub script: String,
    pub start_block: u64,
    pub snapshot_block: u64,
    pub end_block: u64,
    pub execution_block: u64,
    pub support_required_pct: Pct,
    pub min_accept_quorum_pct: Pct,
    pub voting_power: TokenAmount,
    pub yea: TokenAmount,
    pub nay: TokenAmount,
    pub voters: usize,
    pub executed: bool,
    pub status: VoteStatus,
}

impl VoteReport {
    fn new(vote: &Vote, now: BlockNumber) -> Self {
        Self {
            id: vote.id.get(),
            creator: vote.creator,
            metadata: vote.metadata.clone(),
            script: format!("0x{}", hex::encode(&vote.script)),
            start_block: vote.start_block.get(),
            snapshot_block: vote.snapshot_block.get(),
            end_block: vote.end_block.get(),
            execution_block: vote.execution_block.get(),
            support_required_pct: vote.support_required_pct,
            min_accept_quorum_pct: vote.min_accept_quorum_pct,
            voting_power: vote.voting_power,
            yea: vote.yea,
            nay: vote.nay,
            voters: vote.voter_count(),
            executed: vote.executed,
            status: vote.status(now),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ReplayReport {
    pub final_block: u64,
    pub steps: Vec<StepOutcome>,
    pub votes: Vec<VoteReport>,
    pub voting_events: Vec<VotingEvent>,
    pub dissent_events: Vec<DissentEvent>,
    pub actions_logged: usize,
}

pub struct Replay {
    token: Arc<CheckpointToken>,
    registry: Arc<RwLock<VoteRegistry>>,
    oracle: DissentOracle,
    executor: LoggingExecutor,
    last_block: u64,
    outcomes: Vec<StepOutcome>,
    voting_events: Vec<VotingEvent>,
    dissent_events: Vec<DissentEvent>,
}

impl Replay {
    /// Deploy token, permissions, registry and oracle at `config.start_block`.
    pub fn from_config(config: &ReplayConfig) -> Result<Self, ReplayError> {
        let start = BlockNumber::new(config.start_block);

        let permissions = Arc::new(PermissionTable::new());
        if config.grant_all {
            permissions.grant_all(config.voting_app);
            permissions.grant_all(config.dissent_app);
        }
        for grant in &config.grants {
            let app = match grant.capability {
                Capability::ModifyDissentConfig => config.dissent_app,
                _ => config.voting_app,
            };
            permissions.grant(grant.grantee, app, grant.capability);
        }

        let token = Arc::new(CheckpointToken::new());
        for allocation in &config.allocations {
            token.generate_tokens(
                &allocation.holder,
                TokenAmount::new(u128::from(allocation.amount)),
                start,
            )?;
        }

        let mut registry = VoteRegistry::new(config.voting_app, permissions.clone());
        registry.initialize(token.clone(), config.vote_settings(), start)?;
        let registry = Arc::new(RwLock::new(registry));

        let mut oracle = DissentOracle::new(config.dissent_app, permissions);
        oracle.initialize(
            config.voting_app,
            registry.clone(),
            config.dissent_window_blocks,
            start,
        )?;

        tracing::info!(
            voting_app = %config.voting_app,
            dissent_app = %config.dissent_app,
            holders = config.allocations.len(),
            block = %start,
            "replay deployment ready"
        );
        Ok(Self {
            token,
            registry,
            oracle,
            executor: LoggingExecutor::new(),
            last_block: config.start_block,
            outcomes: Vec::new(),
            voting_events: Vec::new(),
            dissent_events: Vec::new(),
        })
    }

    /// Apply every step in order. Failed steps are recorded and skipped.
    pub fn run(&mut self, scenario: &Scenario) -> ReplayReport {
        for (index, step) in scenario.steps.iter().enumerate() {
            self.run_step(index, step);
        }
        self.report()
    }

    /// Apply one step and record its outcome.
    pub fn run_step(&mut self, index: usize, step: &Step) -> &StepOutcome {
        let action = step.action.name();
        let outcome = match self.apply(index, step) {
            Ok(result) => {
                tracing::info!(index, block = step.block, action, "step applied");
                StepOutcome {
                    index,
                    block: step.block,
                    action,
                    ok: true,
                    result,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(index, block = step.block, action, error = %e, "step failed");
                StepOutcome {
                    index,
                    block: step.block,
                    action,
                    ok: false,
                    result: None,
                    error: Some(e.to_string()),
                }
            }
        };
        let voting_events = self.registry_mut().take_events();
        self.voting_events.extend(voting_events);
        self.dissent_events.extend(self.oracle.take_events());
        self.outcomes.push(outcome);
        &self.outcomes[self.outcomes.len() - 1]
    }

    fn apply(&mut self, index: usize, step: &Step) -> Result<Option<serde_json::Value>, ReplayError> {
        if step.block < self.last_block {
            return Err(ReplayError::BlockRegression {
                index,
                block: step.block,
                last: self.last_block,
            });
        }
        self.last_block = step.block;
        let now = BlockNumber::new(step.block);

        match &step.action {
            Action::NewVote {
                sender,
                script,
                metadata,
                cast_vote,
            } => {
                let script = match script {
                    Some(hex) => decode_script(hex)?,
                    None => ExecScript::default().encode(),
                };
                let id = self
                    .registry_mut()
                    .new_vote(sender, script, metadata.clone(), *cast_vote, now)?;
                Ok(Some(json!({ "vote_id": id.get() })))
            }
            Action::Forward { sender, script } => {
                let script = decode_script(script)?;
                let id = self.registry_mut().forward(sender, script, now)?;
                Ok(Some(json!({ "vote_id": id.get() })))
            }
            Action::Vote {
                sender,
                vote_id,
                supports,
            } => {
                self.registry_mut()
                    .vote(sender, VoteId::new(*vote_id), *supports, now)?;
                Ok(None)
            }
            Action::Execute { vote_id } => {
                self.registry
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .execute_vote(VoteId::new(*vote_id), &mut self.executor, now)?;
                Ok(None)
            }
            Action::Mint { holder, amount } => {
                self.token.generate_tokens(holder, tokens(*amount), now)?;
                Ok(None)
            }
            Action::Burn { holder, amount } => {
                self.token.destroy_tokens(holder, tokens(*amount), now)?;
                Ok(None)
            }
            Action::Transfer { from, to, amount } => {
                self.token.transfer(from, to, tokens(*amount), now)?;
                Ok(None)
            }
            Action::ChangeSupportRequired { sender, percent } => {
                self.registry_mut()
                    .change_support_required_pct(sender, percent_to_pct(*percent))?;
                Ok(None)
            }
            Action::ChangeMinQuorum { sender, percent } => {
                self.registry_mut()
                    .change_min_accept_quorum_pct(sender, percent_to_pct(*percent))?;
                Ok(None)
            }
            Action::ChangeVoteBuffer { sender, blocks } => {
                self.registry_mut().change_vote_buffer_blocks(sender, *blocks)?;
                Ok(None)
            }
            Action::ChangeExecutionDelay { sender, blocks } => {
                self.registry_mut()
                    .change_execution_delay_blocks(sender, *blocks)?;
                Ok(None)
            }
            Action::SetDissentWindow { sender, blocks } => {
                self.oracle.set_dissent_window(sender, *blocks)?;
                Ok(None)
            }
            Action::CanPerform {
                who,
                voter,
                window_blocks,
            } => {
                let subject = DissentSubject {
                    voter: *voter,
                    window_blocks: *window_blocks,
                };
                let allowed = self.oracle.can_perform(who, Some(subject), now)?;
                Ok(Some(json!({ "allowed": allowed })))
            }
        }
    }

    pub fn report(&self) -> ReplayReport {
        let now = BlockNumber::new(self.last_block);
        let votes = self
            .registry()
            .votes()
            .iter()
            .map(|vote| VoteReport::new(vote, now))
            .collect();
        ReplayReport {
            final_block: self.last_block,
            steps: self.outcomes.clone(),
            votes,
            voting_events: self.voting_events.clone(),
            dissent_events: self.dissent_events.clone(),
            actions_logged: self.executor.actions_logged(),
        }
    }

    fn registry(&self) -> RwLockReadGuard<'_, VoteRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, VoteRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn tokens(amount: u64) -> TokenAmount {
    TokenAmount::new(u128::from(amount))
}

fn percent_to_pct(percent: u64) -> Pct {
    pct16(u128::from(percent))
}

/// Scripts are stored as given; malformed ones fail at execution.
fn decode_script(text: &str) -> Result<Vec<u8>, ReplayError> {
    hex::decode(text.strip_prefix("0x").unwrap_or(text))
        .map_err(|e| ReplayError::Script(ScriptError::Malformed(e.to_string())))
}
