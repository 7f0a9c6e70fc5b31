//! World and action vocabulary shared across the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three island levels. Each has its own fixed-size grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Ground,
    Mountain,
    Cave,
}

impl Level {
    /// All levels, in generation order. The order is part of the
    /// determinism contract: the terrain generator consumes PRNG draws
    /// level by level in exactly this sequence.
    pub fn all() -> &'static [Level] {
        &[Level::Ground, Level::Mountain, Level::Cave]
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Ground => write!(f, "ground"),
            Level::Mountain => write!(f, "mountain"),
            Level::Cave => write!(f, "cave"),
        }
    }
}

/// Terrain classification of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    Land,
    Water,
    Rock,
    Tree,
    Base,
    StairsUp,
    StairsDown,
}

impl TerrainKind {
    /// Display glyph for terminal rendering.
    pub fn glyph(self) -> char {
        match self {
            TerrainKind::Land => '.',
            TerrainKind::Water => '~',
            TerrainKind::Rock => '^',
            TerrainKind::Tree => 'T',
            TerrainKind::Base => '@',
            TerrainKind::StairsUp => '<',
            TerrainKind::StairsDown => '>',
        }
    }

    /// Only plain land may receive a resource marker.
    pub fn accepts_resource(self) -> bool {
        matches!(self, TerrainKind::Land)
    }
}

/// Gatherable resource kinds.
///
/// The enum order doubles as the placement order during terrain
/// generation and the iteration order of inventories (`BTreeMap` keys),
/// so it is part of the determinism contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Wood,
    Food,
    Metal,
    Berries,
    Fiber,
    Poison,
    Antidote,
}

impl ResourceKind {
    /// All kinds, in placement order.
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::Wood,
            ResourceKind::Food,
            ResourceKind::Metal,
            ResourceKind::Berries,
            ResourceKind::Fiber,
            ResourceKind::Poison,
            ResourceKind::Antidote,
        ]
    }

    pub fn glyph(self) -> char {
        match self {
            ResourceKind::Wood => 'w',
            ResourceKind::Food => 'f',
            ResourceKind::Metal => 'm',
            ResourceKind::Berries => 'b',
            ResourceKind::Fiber => 'i',
            ResourceKind::Poison => 'p',
            ResourceKind::Antidote => 'a',
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Wood => write!(f, "wood"),
            ResourceKind::Food => write!(f, "food"),
            ResourceKind::Metal => write!(f, "metal"),
            ResourceKind::Berries => write!(f, "berries"),
            ResourceKind::Fiber => write!(f, "fiber"),
            ResourceKind::Poison => write!(f, "poison"),
            ResourceKind::Antidote => write!(f, "antidote"),
        }
    }
}

/// One grid cell: terrain plus at most one resource marker.
///
/// Invariant: base and stairs tiles never carry a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: TerrainKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resource: Option<ResourceKind>,
}

impl Tile {
    pub fn land() -> Self {
        Self {
            terrain: TerrainKind::Land,
            resource: None,
        }
    }

    /// Display glyph; a resource marker wins over the terrain glyph.
    pub fn glyph(self) -> char {
        match self.resource {
            Some(r) => r.glyph(),
            None => self.terrain.glyph(),
        }
    }
}

/// Every action kind a step record can carry.
///
/// The first ten are policy actions drawn by the action engine; the
/// last four are emitted only inside voting phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Move,
    Gather,
    Deposit,
    Build,
    Eat,
    SendMessage,
    Wait,
    Sabotage,
    Poison,
    Frame,
    CallVote,
    Discuss,
    Vote,
    VoteResult,
}

impl ActionKind {
    /// True for the records batch-inserted by the voting phase
    /// generator.
    pub fn is_voting(self) -> bool {
        matches!(
            self,
            ActionKind::CallVote
                | ActionKind::Discuss
                | ActionKind::Vote
                | ActionKind::VoteResult
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::Move => "MOVE",
            ActionKind::Gather => "GATHER",
            ActionKind::Deposit => "DEPOSIT",
            ActionKind::Build => "BUILD",
            ActionKind::Eat => "EAT",
            ActionKind::SendMessage => "SEND_MESSAGE",
            ActionKind::Wait => "WAIT",
            ActionKind::Sabotage => "SABOTAGE",
            ActionKind::Poison => "POISON",
            ActionKind::Frame => "FRAME",
            ActionKind::CallVote => "CALL_VOTE",
            ActionKind::Discuss => "DISCUSS",
            ActionKind::Vote => "VOTE",
            ActionKind::VoteResult => "VOTE_RESULT",
        };
        write!(f, "{}", s)
    }
}

/// Target of an action, when it has one.
///
/// `Abstain` is the explicit sentinel for a vote with zero eligible
/// candidates; it is never an error condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Resource(ResourceKind),
    Agent(String),
    Component(String),
    Abstain,
}
