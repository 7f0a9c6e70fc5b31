//! Episode assembly: the full generate-then-replay pipeline.
//!
//! Generation is single-threaded, synchronous, and eager: the whole
//! step sequence is built before any playback. Restart means
//! regenerating from a fresh seed; the sequence itself is immutable.

use episode_events::{AgentSnapshot, LedgerSnapshot, StepRecord};
use tracing::{debug, info};

use crate::config::{ConfigError, EpisodeConfig};
use crate::ledger::Ledger;
use crate::policy;
use crate::rng::EpisodeRng;
use crate::roster::{self, Agent};
use crate::terrain::WorldMap;
use crate::voting;

/// One complete deterministic run from seed to final turn.
#[derive(Debug, Clone)]
pub struct Episode {
    pub seed: u64,
    pub map: WorldMap,
    steps: Vec<StepRecord>,
    agents: Vec<Agent>,
    ledger: Ledger,
}

impl Episode {
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Pull-based iteration over the pre-built sequence.
    pub fn cursor(&self) -> EpisodeCursor<'_> {
        EpisodeCursor {
            episode: self,
            next: 0,
        }
    }

    /// Final agent states, for display binding.
    pub fn agent_snapshots(&self) -> Vec<AgentSnapshot> {
        self.agents.iter().map(Agent::snapshot).collect()
    }

    /// Final ledger state.
    pub fn ledger_snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }
}

/// Playback cursor. `advance` returns `None` at end of episode.
#[derive(Debug, Clone)]
pub struct EpisodeCursor<'a> {
    episode: &'a Episode,
    next: usize,
}

impl<'a> EpisodeCursor<'a> {
    pub fn advance(&mut self) -> Option<&'a StepRecord> {
        let step = self.episode.steps.get(self.next)?;
        self.next += 1;
        Some(step)
    }
}

/// Day number for a turn: one day per full round of the roster.
pub fn day_of_turn(turn: u32, turns_per_day: u32) -> u32 {
    debug_assert!(turn >= 1 && turns_per_day >= 1);
    (turn - 1) / turns_per_day + 1
}

/// Generate a full episode from a seed and configuration.
///
/// Fails fast on configuration violations; everything after validation
/// is a pure function of `(seed, config)`.
pub fn generate_episode(seed: u64, config: &EpisodeConfig) -> Result<Episode, ConfigError> {
    config.validate()?;

    let mut rng = EpisodeRng::new(seed);
    info!(seed, turns = config.simulation.turns, "generating episode");

    // The traitor draw is the first PRNG consumption, then the map.
    let base = crate::terrain::LevelSpec::for_level(episode_events::Level::Ground)
        .base
        .expect("ground level always has a base");
    let mut agents = roster::create_roster(&config.agents.names, base, &mut rng);
    let map = WorldMap::generate(&mut rng);
    let mut ledger = Ledger::new();

    let turns_per_day = agents.len() as u32;
    let mut steps = Vec::new();

    for turn in 1..=config.simulation.turns {
        let day = day_of_turn(turn, turns_per_day);

        if voting::should_trigger(turn, &config.simulation) {
            debug!(turn, day, "voting phase triggered");
            steps.extend(voting::run_phase(&mut agents, day, config, &mut rng));
        }

        for actor in 0..agents.len() {
            if !agents[actor].alive {
                continue;
            }
            let candidates =
                policy::build_candidates(&agents, actor, &map, &ledger, turn, config, &mut rng);
            let chosen = policy::select(&candidates, &mut rng).clone();
            let fragment =
                policy::execute(&chosen, &mut agents, actor, &map, &mut ledger, &mut rng);

            agents[actor].energy = (agents[actor].energy + fragment.energy_delta).clamp(0, 100);
            if fragment.ship_delta != 0.0 {
                ledger.apply_ship_delta(fragment.ship_delta);
            }

            steps.push(StepRecord {
                turn,
                day,
                agent: agents[actor].id.clone(),
                action: fragment.action,
                target: fragment.target,
                reasoning: fragment.reasoning,
                dialogue: fragment.dialogue,
                energy_delta: fragment.energy_delta,
                reward: fragment.reward,
                movement: fragment.movement,
                ship_delta: fragment.ship_delta,
                voting_phase: false,
            });
        }
    }

    info!(
        steps = steps.len(),
        ship_progress = ledger.overall_progress(),
        survivors = agents.iter().filter(|a| a.alive).count(),
        "episode complete"
    );

    Ok(Episode {
        seed,
        map,
        steps,
        agents,
        ledger,
    })
}
