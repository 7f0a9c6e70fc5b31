//! Shared economy: common inventory and ship construction bookkeeping.

use std::collections::BTreeMap;

use episode_events::{LedgerSnapshot, ResourceKind};

use crate::rng::EpisodeRng;

/// Ship components tracked by the construction ledger, in fixed order.
pub const SHIP_COMPONENTS: [&str; 4] = ["hull", "mast", "sail", "rudder"];

/// Progress added to one component per build action.
const BUILD_INCREMENT: u32 = 10;
/// A component is done at this progress value.
const COMPONENT_COMPLETE: u32 = 100;

/// Common inventory plus construction progress.
///
/// The per-component ledger is bookkeeping detail; `overall` is the
/// separate win/lose scalar adjusted directly by build, deposit, and
/// sabotage step deltas. The two are intentionally decoupled.
#[derive(Debug, Clone)]
pub struct Ledger {
    common: BTreeMap<ResourceKind, u32>,
    components: BTreeMap<&'static str, u32>,
    overall: f64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            common: BTreeMap::new(),
            components: SHIP_COMPONENTS.iter().map(|&c| (c, 0)).collect(),
            overall: 0.0,
        }
    }

    pub fn common_stock(&self, kind: ResourceKind) -> u32 {
        self.common.get(&kind).copied().unwrap_or(0)
    }

    pub fn overall_progress(&self) -> f64 {
        self.overall
    }

    pub fn component_progress(&self, component: &str) -> u32 {
        self.components.get(component).copied().unwrap_or(0)
    }

    /// Move every positive count from the agent's personal inventory
    /// into the common inventory, zeroing the source in the same step.
    /// Returns the moved kinds in enum order, for the reasoning text.
    pub fn deposit(&mut self, inventory: &mut BTreeMap<ResourceKind, u32>) -> Vec<ResourceKind> {
        let mut moved = Vec::new();
        for (&kind, count) in inventory.iter_mut() {
            if *count == 0 {
                continue;
            }
            *self.common.entry(kind).or_insert(0) += *count;
            *count = 0;
            moved.push(kind);
        }
        moved
    }

    /// Advance one randomly chosen unfinished component and consume one
    /// wood and one metal from common stock, flooring at zero.
    /// Insufficient stock is not an error. Returns the component name,
    /// or `None` when every component is already complete.
    pub fn build(&mut self, rng: &mut EpisodeRng) -> Option<&'static str> {
        let unfinished: Vec<&'static str> = SHIP_COMPONENTS
            .iter()
            .copied()
            .filter(|c| self.components[c] < COMPONENT_COMPLETE)
            .collect();
        if unfinished.is_empty() {
            return None;
        }
        let chosen = *rng.pick(&unfinished);
        let progress = self.components.get_mut(chosen).expect("known component");
        *progress = (*progress + BUILD_INCREMENT).min(COMPONENT_COMPLETE);

        for kind in [ResourceKind::Wood, ResourceKind::Metal] {
            let stock = self.common.entry(kind).or_insert(0);
            *stock = stock.saturating_sub(1);
        }
        Some(chosen)
    }

    /// Adjust overall ship progress, clamping to [0, 100] after every
    /// adjustment.
    pub fn apply_ship_delta(&mut self, delta: f64) {
        self.overall = (self.overall + delta).clamp(0.0, 100.0);
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            common_inventory: self
                .common
                .iter()
                .filter(|(_, &n)| n > 0)
                .map(|(&k, &n)| (k, n))
                .collect(),
            components: self
                .components
                .iter()
                .map(|(&c, &p)| (c.to_string(), p))
                .collect(),
            overall_progress: self.overall,
        }
    }
}
