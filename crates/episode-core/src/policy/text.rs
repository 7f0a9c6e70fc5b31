//! Narrative text pools for step records.
//!
//! Each action kind has a reasoning pool (the internal monologue shown
//! in the feed) and a dialogue pool (what the agent says out loud).
//! Which line is used is itself a PRNG draw, so text selection is part
//! of the deterministic replay.

use episode_events::{ActionKind, ResourceKind};

use crate::rng::EpisodeRng;

fn reasoning_pool(kind: ActionKind) -> &'static [&'static str] {
    match kind {
        ActionKind::Move => &[
            "Exploring nearby areas",
            "Searching for resources",
            "Patrolling the area",
        ],
        ActionKind::Gather => &[
            "Collecting resources",
            "Found materials nearby",
            "Gathering for construction",
        ],
        ActionKind::Deposit => &[
            "Returning to base",
            "Depositing materials",
            "Contributing to storage",
        ],
        ActionKind::Build => &[
            "Working on ship",
            "Constructing components",
            "Making progress",
        ],
        ActionKind::Eat => &["Restoring energy", "Taking a break", "Consuming food"],
        ActionKind::SendMessage => &[
            "Coordinating with the others",
            "Sharing a status update",
        ],
        ActionKind::Wait => &[
            "Conserving energy",
            "Watching the others",
            "Nothing worth doing here",
        ],
        ActionKind::Sabotage => &[
            "Secretly sabotaging ship progress while alone",
            "Delaying progress",
            "Sabotaging quietly",
        ],
        ActionKind::Poison => &[
            "Slipping poison in unnoticed",
            "Striking while nobody watches",
        ],
        ActionKind::Frame => &["Planting suspicion", "Shifting the blame"],
        _ => &["Performing action"],
    }
}

fn dialogue_pool(kind: ActionKind) -> &'static [&'static str] {
    match kind {
        ActionKind::Move => &["Heading out", "Moving around", "Exploring"],
        ActionKind::Gather => &["Found something!", "Collecting this", "This will help"],
        ActionKind::Deposit => &["At base", "Dropping off supplies"],
        ActionKind::Build => &["Working hard", "Making progress!", "Coming together"],
        ActionKind::Eat => &["Need food", "Restoring energy"],
        ActionKind::SendMessage => &[
            "Anyone found metal yet?",
            "The ship is coming along",
            "Stay safe out there",
        ],
        // Cover story: the saboteur claims to be helping.
        ActionKind::Sabotage => &["Working on the ship!"],
        ActionKind::Poison => &["Here, I saved you some food"],
        ActionKind::Frame => &["Something feels off around here"],
        _ => &["..."],
    }
}

/// Draw a reasoning line for the action kind.
pub fn reasoning(kind: ActionKind, rng: &mut EpisodeRng) -> String {
    (*rng.pick(reasoning_pool(kind))).to_string()
}

/// Draw a dialogue line for the action kind.
pub fn dialogue(kind: ActionKind, rng: &mut EpisodeRng) -> String {
    (*rng.pick(dialogue_pool(kind))).to_string()
}

/// Deposit reasoning names the kinds actually moved to storage.
pub fn deposit_reasoning(moved: &[ResourceKind]) -> String {
    if moved.is_empty() {
        return "Nothing left to deposit".to_string();
    }
    let list = moved
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Depositing {list} into shared storage")
}

/// Frame dialogue names the agent being blamed.
pub fn frame_dialogue(mark_name: &str) -> String {
    format!("I saw {mark_name} acting strange near the ship...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_policy_kind_has_text() {
        let kinds = [
            ActionKind::Move,
            ActionKind::Gather,
            ActionKind::Deposit,
            ActionKind::Build,
            ActionKind::Eat,
            ActionKind::SendMessage,
            ActionKind::Wait,
            ActionKind::Sabotage,
            ActionKind::Poison,
            ActionKind::Frame,
        ];
        let mut rng = EpisodeRng::new(1);
        for kind in kinds {
            assert!(!reasoning(kind, &mut rng).is_empty());
            assert!(!dialogue(kind, &mut rng).is_empty());
        }
    }

    #[test]
    fn deposit_reasoning_lists_kinds_in_order() {
        let line = deposit_reasoning(&[ResourceKind::Wood, ResourceKind::Berries]);
        assert_eq!(line, "Depositing wood, berries into shared storage");
    }

    #[test]
    fn frame_dialogue_names_the_mark() {
        assert_eq!(
            frame_dialogue("Diana"),
            "I saw Diana acting strange near the ship..."
        );
    }
}
