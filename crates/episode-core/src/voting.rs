//! Voting phase generator.
//!
//! Triggered at fixed turn boundaries, a phase batch-produces a
//! call-to-vote, one discussion line per living agent, one vote per
//! living agent, and a resolution record. Phase records carry
//! `turn == 0` (out of band) plus the triggering day, and are marked
//! `voting_phase` so the consumer can render them as a modal phase.

use episode_events::{ActionKind, StepRecord, Target};
use tracing::info;

use crate::config::{EpisodeConfig, SimulationConfig};
use crate::rng::EpisodeRng;
use crate::roster::{Agent, Role};

const SUSPICION_LINES: [&str; 3] = [
    "Someone has been tampering with the ship",
    "Supplies keep going missing when nobody is watching",
    "I don't like how quiet it's been out there",
];

/// True when a voting phase fires at the start of this turn: on the
/// interval, strictly inside the window.
pub fn should_trigger(turn: u32, sim: &SimulationConfig) -> bool {
    turn % sim.voting_interval == 0
        && turn > sim.voting_window_start
        && turn < sim.voting_window_end
}

fn phase_record(
    day: u32,
    agent: &Agent,
    action: ActionKind,
    target: Option<Target>,
    reasoning: String,
    dialogue: String,
) -> StepRecord {
    StepRecord {
        turn: 0,
        day,
        agent: agent.id.clone(),
        action,
        target,
        reasoning,
        dialogue,
        energy_delta: 0,
        reward: 0.0,
        movement: None,
        ship_delta: 0.0,
        voting_phase: true,
    }
}

fn living(agents: &[Agent]) -> Vec<usize> {
    (0..agents.len()).filter(|&i| agents[i].alive).collect()
}

fn living_colonists_except(agents: &[Agent], except: usize) -> Vec<usize> {
    (0..agents.len())
        .filter(|&i| i != except && agents[i].alive && agents[i].role == Role::Colonist)
        .collect()
}

/// Run one voting phase: produce its records and apply the exile.
pub fn run_phase(
    agents: &mut [Agent],
    day: u32,
    cfg: &EpisodeConfig,
    rng: &mut EpisodeRng,
) -> Vec<StepRecord> {
    let mut records = Vec::new();
    let alive = living(agents);
    if alive.is_empty() {
        return records;
    }

    // Call to vote: caller drawn uniformly among the living.
    let caller = *rng.pick(&alive);
    records.push(phase_record(
        day,
        &agents[caller],
        ActionKind::CallVote,
        None,
        "Calling the colony together for a vote".to_string(),
        "Emergency meeting! Someone is sabotaging the ship!".to_string(),
    ));

    // Discussion: one line per living agent, roster order.
    for &i in &alive {
        let record = match agents[i].role {
            Role::Traitor => {
                let marks = living_colonists_except(agents, i);
                if marks.is_empty() {
                    phase_record(
                        day,
                        &agents[i],
                        ActionKind::Discuss,
                        None,
                        "Deflecting suspicion".to_string(),
                        "It's not me, I've been gathering all day".to_string(),
                    )
                } else {
                    let mark = *rng.pick(&marks);
                    phase_record(
                        day,
                        &agents[i],
                        ActionKind::Discuss,
                        Some(Target::Agent(agents[mark].id.clone())),
                        "Deflecting suspicion onto someone else".to_string(),
                        format!(
                            "It's not me, I've been gathering all day. But {} keeps disappearing...",
                            agents[mark].name
                        ),
                    )
                }
            }
            Role::Colonist => {
                let allies = living_colonists_except(agents, i);
                // Even draw between generic suspicion and a trust
                // statement toward a random ally.
                if allies.is_empty() || rng.draw(0, 2) == 0 {
                    phase_record(
                        day,
                        &agents[i],
                        ActionKind::Discuss,
                        None,
                        "Weighing who to trust".to_string(),
                        (*rng.pick(&SUSPICION_LINES)).to_string(),
                    )
                } else {
                    let ally = *rng.pick(&allies);
                    phase_record(
                        day,
                        &agents[i],
                        ActionKind::Discuss,
                        Some(Target::Agent(agents[ally].id.clone())),
                        "Vouching for a trusted ally".to_string(),
                        format!("I trust {}, they've been working nonstop", agents[ally].name),
                    )
                }
            }
        };
        records.push(record);
    }

    // Votes: one per living agent, roster order.
    let mut tally: Vec<u32> = vec![0; agents.len()];
    for &i in &alive {
        let choice = pick_vote_target(agents, i, cfg, rng);
        let record = match choice {
            Some(voted) => {
                tally[voted] += 1;
                phase_record(
                    day,
                    &agents[i],
                    ActionKind::Vote,
                    Some(Target::Agent(agents[voted].id.clone())),
                    "Casting a vote to exile".to_string(),
                    format!("I vote for {}", agents[voted].name),
                )
            }
            None => phase_record(
                day,
                &agents[i],
                ActionKind::Vote,
                Some(Target::Abstain),
                "No one left to accuse".to_string(),
                "I abstain".to_string(),
            ),
        };
        records.push(record);
    }

    // Resolution: most-voted agent is exiled; ties break by roster
    // order. All-abstain rounds are inconclusive.
    let exiled = tally
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map(|(i, _)| i);
    match exiled {
        Some(out) => {
            agents[out].alive = false;
            let votes = tally[out];
            info!(exiled = %agents[out].id, votes, "vote concluded");
            records.push(phase_record(
                day,
                &agents[caller],
                ActionKind::VoteResult,
                Some(Target::Agent(agents[out].id.clone())),
                "Tallying the votes".to_string(),
                format!("{} has been exiled from the colony", agents[out].name),
            ));
        }
        None => {
            records.push(phase_record(
                day,
                &agents[caller],
                ActionKind::VoteResult,
                None,
                "Tallying the votes".to_string(),
                "The vote was inconclusive".to_string(),
            ));
        }
    }

    records
}

/// Vote-target selection. The traitor frames: a uniformly random living
/// colonist. A colonist lands on the true traitor with the configured
/// accuracy, otherwise votes uniformly among all other living agents.
/// Zero eligible candidates falls back to abstaining.
fn pick_vote_target(
    agents: &[Agent],
    voter: usize,
    cfg: &EpisodeConfig,
    rng: &mut EpisodeRng,
) -> Option<usize> {
    let others: Vec<usize> = (0..agents.len())
        .filter(|&i| i != voter && agents[i].alive)
        .collect();
    if others.is_empty() {
        return None;
    }
    match agents[voter].role {
        Role::Traitor => {
            let colonists = living_colonists_except(agents, voter);
            if colonists.is_empty() {
                None
            } else {
                Some(*rng.pick(&colonists))
            }
        }
        Role::Colonist => {
            let traitor = others
                .iter()
                .copied()
                .find(|&i| agents[i].role == Role::Traitor);
            match traitor {
                Some(t) if rng.chance(cfg.chances.vote_accuracy) => Some(t),
                _ => Some(*rng.pick(&others)),
            }
        }
    }
}
