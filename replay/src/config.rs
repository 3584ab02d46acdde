//! Replay configuration with TOML file support.

use crate::error::ReplayError;
use dandelion_types::{pct16, Address};
use dandelion_utils::LogFormat;
use dandelion_voting::{Capability, VoteSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tokens minted to `holder` before the first step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub holder: Address,
    pub amount: u64,
}

/// A single capability granted on the app it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub grantee: Address,
    pub capability: Capability,
}

/// Deployment the scenario runs against.
///
/// Loaded from a TOML file via [`ReplayConfig::from_toml_file`] or built
/// programmatically. Percentages are whole percents.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplayConfig {
    #[serde(default = "default_voting_app")]
    pub voting_app: Address,

    #[serde(default = "default_dissent_app")]
    pub dissent_app: Address,

    /// Block at which both apps are initialized and allocations minted.
    #[serde(default = "default_start_block")]
    pub start_block: u64,

    #[serde(default = "default_support_percent")]
    pub support_required_percent: u64,

    #[serde(default = "default_quorum_percent")]
    pub min_accept_quorum_percent: u64,

    #[serde(default = "default_vote_duration")]
    pub vote_duration_blocks: u64,

    #[serde(default = "default_vote_buffer")]
    pub vote_buffer_blocks: u64,

    #[serde(default = "default_execution_delay")]
    pub execution_delay_blocks: u64,

    #[serde(default = "default_dissent_window")]
    pub dissent_window_blocks: u64,

    /// Grant every capability on both apps to any entity.
    #[serde(default = "default_true")]
    pub grant_all: bool,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub grants: Vec<Grant>,

    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

// ── Defaults ───────────────────────────────────────────────────────────

fn default_voting_app() -> Address {
    Address::from_low_u64(0xa0)
}

fn default_dissent_app() -> Address {
    Address::from_low_u64(0xd0)
}

fn default_start_block() -> u64 {
    1
}

fn default_support_percent() -> u64 {
    50
}

fn default_quorum_percent() -> u64 {
    20
}

fn default_vote_duration() -> u64 {
    500
}

fn default_vote_buffer() -> u64 {
    100
}

fn default_execution_delay() -> u64 {
    200
}

fn default_dissent_window() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ReplayConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReplayError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ReplayError> {
        toml::from_str(s).map_err(|e| ReplayError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ReplayError> {
        toml::to_string_pretty(self).map_err(|e| ReplayError::Config(e.to_string()))
    }

    /// Initial voting settings. Validated when the registry is initialized.
    pub fn vote_settings(&self) -> VoteSettings {
        VoteSettings {
            support_required_pct: pct16(u128::from(self.support_required_percent)),
            min_accept_quorum_pct: pct16(u128::from(self.min_accept_quorum_percent)),
            vote_duration_blocks: self.vote_duration_blocks,
            vote_buffer_blocks: self.vote_buffer_blocks,
            execution_delay_blocks: self.execution_delay_blocks,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            voting_app: default_voting_app(),
            dissent_app: default_dissent_app(),
            start_block: default_start_block(),
            support_required_percent: default_support_percent(),
            min_accept_quorum_percent: default_quorum_percent(),
            vote_duration_blocks: default_vote_duration(),
            vote_buffer_blocks: default_vote_buffer(),
            execution_delay_blocks: default_execution_delay(),
            dissent_window_blocks: default_dissent_window(),
            grant_all: default_true(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            grants: Vec::new(),
            allocations: Vec::new(),
        }
    }
}
