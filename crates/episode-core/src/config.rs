//! Episode configuration.
//!
//! Tuning parameters load from a TOML file so weights can be adjusted
//! without recompiling; `Default` is the reference configuration.
//! Validation is strict: a bad roster or cadence must fail fast rather
//! than be silently defaulted, since silent substitution would break
//! the determinism contract without anyone noticing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Default tuning file path.
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EpisodeConfig {
    pub simulation: SimulationConfig,
    pub agents: AgentConfig,
    pub weights: WeightConfig,
    pub chances: ChanceConfig,
}

/// Episode cadence parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of full rounds; every living agent acts once per turn.
    pub turns: u32,
    /// A voting phase triggers every this many turns...
    pub voting_interval: u32,
    /// ...but only strictly inside this window (exclusive bounds).
    pub voting_window_start: u32,
    pub voting_window_end: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            turns: 150,
            voting_interval: 30,
            voting_window_start: 0,
            voting_window_end: 120,
        }
    }
}

/// Roster configuration. Order matters: it fixes spawn positions,
/// turn order, and the traitor draw's index space.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub names: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            names: ["Alice", "Bob", "Charlie", "Diana", "Eve"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Integer weights for the action candidate list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub move_step: i32,
    pub gather: i32,
    pub deposit: i32,
    pub build: i32,
    pub eat: i32,
    pub send_message: i32,
    pub wait: i32,
    pub sabotage: i32,
    pub poison: i32,
    pub frame: i32,
}

impl WeightConfig {
    /// Named view over every weight, for validation and reporting.
    fn entries(&self) -> [(&'static str, i32); 10] {
        [
            ("move_step", self.move_step),
            ("gather", self.gather),
            ("deposit", self.deposit),
            ("build", self.build),
            ("eat", self.eat),
            ("send_message", self.send_message),
            ("wait", self.wait),
            ("sabotage", self.sabotage),
            ("poison", self.poison),
            ("frame", self.frame),
        ]
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            move_step: 3,
            gather: 5,
            deposit: 8,
            build: 10,
            eat: 7,
            send_message: 2,
            wait: 1,
            sabotage: 15,
            poison: 12,
            frame: 8,
        }
    }
}

/// Percent probability gates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChanceConfig {
    /// Gate on including the send-message candidate at all.
    pub send_message: i32,
    /// Gates on including the traitor's special candidates.
    pub sabotage: i32,
    pub poison: i32,
    pub frame: i32,
    /// Chance a colonist's vote lands on the true traitor.
    pub vote_accuracy: i32,
}

impl ChanceConfig {
    fn entries(&self) -> [(&'static str, i32); 5] {
        [
            ("send_message", self.send_message),
            ("sabotage", self.sabotage),
            ("poison", self.poison),
            ("frame", self.frame),
            ("vote_accuracy", self.vote_accuracy),
        ]
    }
}

impl Default for ChanceConfig {
    fn default() -> Self {
        Self {
            send_message: 15,
            sabotage: 30,
            poison: 25,
            frame: 20,
            vote_accuracy: 60,
        }
    }
}

/// Configuration rejection reasons. These are caller contract
/// violations, reported at `generate_episode` entry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("agent roster is empty")]
    EmptyRoster,
    #[error("duplicate agent name: {0}")]
    DuplicateAgent(String),
    #[error("turn count must be positive")]
    ZeroTurns,
    #[error("voting interval must be positive")]
    InvalidVotingInterval,
    #[error("voting window start {start} must precede end {end}")]
    InvalidVotingWindow { start: u32, end: u32 },
    #[error("action weight '{name}' must be positive, got {value}")]
    NonPositiveWeight { name: &'static str, value: i32 },
    #[error("chance '{name}' must be a percent in 0..=100, got {value}")]
    InvalidChance { name: &'static str, value: i32 },
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl EpisodeConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Fail-fast validation of the determinism-critical parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agents.names.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        let mut seen = BTreeSet::new();
        for name in &self.agents.names {
            if !seen.insert(name.to_lowercase()) {
                return Err(ConfigError::DuplicateAgent(name.clone()));
            }
        }
        if self.simulation.turns == 0 {
            return Err(ConfigError::ZeroTurns);
        }
        if self.simulation.voting_interval == 0 {
            return Err(ConfigError::InvalidVotingInterval);
        }
        if self.simulation.voting_window_start >= self.simulation.voting_window_end {
            return Err(ConfigError::InvalidVotingWindow {
                start: self.simulation.voting_window_start,
                end: self.simulation.voting_window_end,
            });
        }
        // Every candidate weight is positive, so the weighted draw
        // always sees a non-empty range.
        for (name, value) in self.weights.entries() {
            if value <= 0 {
                return Err(ConfigError::NonPositiveWeight { name, value });
            }
        }
        for (name, value) in self.chances.entries() {
            if !(0..=100).contains(&value) {
                return Err(ConfigError::InvalidChance { name, value });
            }
        }
        Ok(())
    }
}
