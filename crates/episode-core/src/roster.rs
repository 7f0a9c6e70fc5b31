//! Agent roster: identity, role assignment, mutable per-agent state.

use std::collections::BTreeMap;

use episode_events::{AgentSnapshot, Position, ResourceKind};
use tracing::info;

use crate::rng::EpisodeRng;

/// Poison stock the traitor starts with.
const TRAITOR_POISON_STOCK: u32 = 2;

/// Exactly one agent per episode is the traitor; everyone else is a
/// colonist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Colonist,
    Traitor,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Colonist => "colonist",
            Role::Traitor => "traitor",
        }
    }
}

/// One island inhabitant. Created at episode start; mutated only by the
/// action policy engine and the voting phase generator.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub x: i32,
    pub y: i32,
    /// Where the agent is headed; the presentation layer interpolates
    /// between position and target, the generator commits both.
    pub target_x: i32,
    pub target_y: i32,
    /// Bounded to [0, 100].
    pub energy: i32,
    pub inventory: BTreeMap<ResourceKind, u32>,
    pub alive: bool,
}

impl Agent {
    pub fn stock(&self, kind: ResourceKind) -> u32 {
        self.inventory.get(&kind).copied().unwrap_or(0)
    }

    pub fn add_stock(&mut self, kind: ResourceKind, amount: u32) {
        *self.inventory.entry(kind).or_insert(0) += amount;
    }

    /// Remove up to `amount`, flooring at zero is a caller bug here:
    /// personal inventory may never go negative.
    pub fn remove_stock(&mut self, kind: ResourceKind, amount: u32) {
        let entry = self.inventory.entry(kind).or_insert(0);
        debug_assert!(*entry >= amount, "inventory underflow for {kind}");
        *entry = entry.saturating_sub(amount);
    }

    pub fn holds_anything(&self) -> bool {
        self.inventory.values().any(|&n| n > 0)
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role.as_str().to_string(),
            energy: self.energy,
            inventory: self
                .inventory
                .iter()
                .filter(|(_, &n)| n > 0)
                .map(|(&k, &n)| (k, n))
                .collect(),
            alive: self.alive,
            position: Position {
                x: self.x,
                y: self.y,
            },
        }
    }
}

/// Build the roster from the configured names, spawn everyone clustered
/// around the base, and draw the single traitor.
///
/// The traitor draw is the first PRNG consumption of the episode, so
/// the assigned index can be verified by hand from the seed alone.
pub fn create_roster(names: &[String], base: (i32, i32), rng: &mut EpisodeRng) -> Vec<Agent> {
    let traitor_index = rng.draw(0, names.len() as i32) as usize;

    let agents: Vec<Agent> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let role = if i == traitor_index {
                Role::Traitor
            } else {
                Role::Colonist
            };
            let x = base.0 + (i as i32 % 3) - 1;
            let y = base.1 + i as i32 / 3;
            let mut inventory = BTreeMap::new();
            if role == Role::Traitor {
                inventory.insert(ResourceKind::Poison, TRAITOR_POISON_STOCK);
            }
            Agent {
                id: name.to_lowercase(),
                name: name.clone(),
                role,
                x,
                y,
                target_x: x,
                target_y: y,
                energy: 100,
                inventory,
                alive: true,
            }
        })
        .collect();

    let traitor = &agents[traitor_index];
    info!(traitor = %traitor.id, roster = agents.len(), "roster created");

    agents
}
