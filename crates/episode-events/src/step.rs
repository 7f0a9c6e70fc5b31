//! Step records: the unit of generator output.

use serde::{Deserialize, Serialize};

use crate::types::{ActionKind, Target};

/// A movement delta in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub dx: i32,
    pub dy: i32,
}

/// One atomic logged action with its effects and narrative text.
///
/// Immutable once produced. Ordered by generation sequence; voting
/// records are batch-inserted and carry `turn == 0` as an out-of-band
/// marker (they are stamped with the triggering day instead).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Turn number this step belongs to; 0 for voting-phase records.
    pub turn: u32,
    /// Day number, a pure function of the turn counter.
    pub day: u32,
    /// Acting agent id.
    pub agent: String,
    pub action: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<Target>,
    /// Why the agent did this, for the activity feed.
    pub reasoning: String,
    /// What the agent says out loud. May be a cover story.
    pub dialogue: String,
    pub energy_delta: i32,
    pub reward: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub movement: Option<Movement>,
    /// Contribution to overall ship progress, positive or negative.
    pub ship_delta: f64,
    /// Marks records produced by the voting phase generator so the
    /// consumer can render them as a distinct modal phase.
    pub voting_phase: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_record_round_trips() {
        let step = StepRecord {
            turn: 12,
            day: 3,
            agent: "alice".to_string(),
            action: ActionKind::Gather,
            target: Some(Target::Resource(crate::ResourceKind::Wood)),
            reasoning: "Collecting resources".to_string(),
            dialogue: "Found something!".to_string(),
            energy_delta: -5,
            reward: 0.2,
            movement: None,
            ship_delta: 0.0,
            voting_phase: false,
        };
        let json = serde_json::to_string(&step).unwrap();
        let back: StepRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(step, back);
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let step = StepRecord {
            turn: 1,
            day: 1,
            agent: "bob".to_string(),
            action: ActionKind::Wait,
            target: None,
            reasoning: "Resting".to_string(),
            dialogue: "...".to_string(),
            energy_delta: -1,
            reward: -0.01,
            movement: None,
            ship_delta: 0.0,
            voting_phase: false,
        };
        let json = serde_json::to_string(&step).unwrap();
        assert!(!json.contains("\"target\""));
        assert!(!json.contains("\"movement\""));
    }
}
