//! Snapshot structs for display binding.
//!
//! Snapshots capture agent and ledger state at a point in time. They
//! are emitted for rendering, not re-interpreted by the generator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::ResourceKind;

/// Grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Agent state for display binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: String,
    pub name: String,
    pub role: String,
    pub energy: i32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inventory: BTreeMap<ResourceKind, u32>,
    pub alive: bool,
    pub position: Position,
}

/// Shared economy state: common inventory plus construction progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub common_inventory: BTreeMap<ResourceKind, u32>,
    pub components: BTreeMap<String, u32>,
    /// Win/lose signal in [0, 100]. Deliberately decoupled from the
    /// per-component ledger above.
    pub overall_progress: f64,
}
