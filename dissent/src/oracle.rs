//! Window check over a voting app's last-yea markers.

use crate::error::DissentError;
use crate::events::DissentEvent;
use dandelion_types::{Address, BlockNumber};
use dandelion_voting::{Capability, LastVoteSource, PermissionChecker, VoterState};
use std::sync::Arc;

/// Per-check override of the subject voter and the window length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DissentSubject {
    pub voter: Option<Address>,
    pub window_blocks: Option<u64>,
}

struct Binding {
    voting_app: Address,
    source: Arc<dyn LastVoteSource>,
    dissent_window_blocks: u64,
}

pub struct DissentOracle {
    app: Address,
    permissions: Arc<dyn PermissionChecker>,
    binding: Option<Binding>,
    events: Vec<DissentEvent>,
}

impl DissentOracle {
    pub fn new(app: Address, permissions: Arc<dyn PermissionChecker>) -> Self {
        Self {
            app,
            permissions,
            binding: None,
            events: Vec::new(),
        }
    }

    /// Bind to the voting app at `voting_app`, read through `source`.
    pub fn initialize(
        &mut self,
        voting_app: Address,
        source: Arc<dyn LastVoteSource>,
        dissent_window_blocks: u64,
        now: BlockNumber,
    ) -> Result<(), DissentError> {
        if self.binding.is_some() {
            return Err(DissentError::AlreadyInitialized);
        }
        tracing::info!(
            app = %self.app,
            %voting_app,
            window = dissent_window_blocks,
            block = %now,
            "dissent oracle initialized"
        );
        self.binding = Some(Binding {
            voting_app,
            source,
            dissent_window_blocks,
        });
        Ok(())
    }

    pub fn has_initialized(&self) -> bool {
        self.binding.is_some()
    }

    pub fn app(&self) -> Address {
        self.app
    }

    pub fn voting_app(&self) -> Result<Address, DissentError> {
        Ok(self.binding()?.voting_app)
    }

    pub fn dissent_window_blocks(&self) -> Result<u64, DissentError> {
        Ok(self.binding()?.dissent_window_blocks)
    }

    fn binding(&self) -> Result<&Binding, DissentError> {
        self.binding.as_ref().ok_or(DissentError::NotInitialized)
    }

    fn authorize(&self, sender: &Address) -> Result<(), DissentError> {
        let capability = Capability::ModifyDissentConfig;
        if self.binding.is_some() && self.permissions.has_permission(sender, &self.app, capability) {
            return Ok(());
        }
        tracing::debug!(%sender, %capability, "authorization failed");
        Err(DissentError::AuthFailed { capability })
    }

    pub fn set_voting_app(
        &mut self,
        sender: &Address,
        voting_app: Address,
        source: Arc<dyn LastVoteSource>,
    ) -> Result<(), DissentError> {
        self.authorize(sender)?;
        let binding = self.binding.as_mut().ok_or(DissentError::NotInitialized)?;
        binding.voting_app = voting_app;
        binding.source = source;
        tracing::info!(%voting_app, "dissent oracle voting app changed");
        self.events.push(DissentEvent::ChangeVotingApp { voting_app });
        Ok(())
    }

    pub fn set_dissent_window(
        &mut self,
        sender: &Address,
        dissent_window_blocks: u64,
    ) -> Result<(), DissentError> {
        self.authorize(sender)?;
        let binding = self.binding.as_mut().ok_or(DissentError::NotInitialized)?;
        binding.dissent_window_blocks = dissent_window_blocks;
        tracing::info!(window = dissent_window_blocks, "dissent window changed");
        self.events.push(DissentEvent::ChangeDissentWindow {
            dissent_window_blocks,
        });
        Ok(())
    }

    /// Whether `who` (or the overriding subject) is clear of the dissent
    /// window at `now`.
    ///
    /// Clear when the voter never voted YEA, when their latest ballot was a
    /// NAY, or once `window` blocks have passed since the start of the last
    /// vote they supported.
    pub fn can_perform(
        &self,
        who: &Address,
        subject: Option<DissentSubject>,
        now: BlockNumber,
    ) -> Result<bool, DissentError> {
        let binding = self.binding()?;
        let subject = subject.unwrap_or_default();
        let voter = subject.voter.unwrap_or(*who);
        let window = subject.window_blocks.unwrap_or(binding.dissent_window_blocks);

        let Some(last_yea) = binding.source.last_yea_vote_block(&voter) else {
            return Ok(true);
        };
        if binding.source.last_vote_state(&voter) == VoterState::Nay {
            return Ok(true);
        }
        let clear = last_yea.has_elapsed(window, now);
        if !clear {
            tracing::debug!(%voter, %last_yea, window, block = %now, "inside dissent window");
        }
        Ok(clear)
    }

    pub fn take_events(&mut self) -> Vec<DissentEvent> {
        std::mem::take(&mut self.events)
    }
}
