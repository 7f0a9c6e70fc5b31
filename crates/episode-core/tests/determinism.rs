//! Determinism verification tests
//!
//! Two independent generations from the same seed and configuration
//! must produce byte-identical step sequences and terrain grids.

use episode_core::{generate_episode, Episode, EpisodeConfig, EpisodeRng};
use episode_events::{ActionKind, Tile};

fn grid_json(episode: &Episode) -> String {
    let levels: Vec<Vec<Vec<Tile>>> = [
        &episode.map.ground,
        &episode.map.mountain,
        &episode.map.cave,
    ]
    .iter()
    .map(|grid| grid.rows().map(<[Tile]>::to_vec).collect())
    .collect();
    serde_json::to_string(&levels).unwrap()
}

fn steps_json(episode: &Episode) -> String {
    serde_json::to_string(episode.steps()).unwrap()
}

#[test]
fn same_seed_produces_byte_identical_episodes() {
    let cfg = EpisodeConfig::default();
    for seed in [0, 1, 42, 0xDEAD_BEEF] {
        let a = generate_episode(seed, &cfg).unwrap();
        let b = generate_episode(seed, &cfg).unwrap();
        assert_eq!(steps_json(&a), steps_json(&b), "seed {seed}");
        assert_eq!(grid_json(&a), grid_json(&b), "seed {seed}");
    }
}

#[test]
fn different_seeds_produce_different_episodes() {
    let cfg = EpisodeConfig::default();
    let a = generate_episode(42, &cfg).unwrap();
    let b = generate_episode(43, &cfg).unwrap();
    assert_ne!(steps_json(&a), steps_json(&b));
}

#[test]
fn exactly_one_traitor_per_episode() {
    let cfg = EpisodeConfig::default();
    for seed in 0..20 {
        let episode = generate_episode(seed, &cfg).unwrap();
        let traitors = episode
            .agent_snapshots()
            .iter()
            .filter(|a| a.role == "traitor")
            .count();
        assert_eq!(traitors, 1, "seed {seed}");
    }
}

#[test]
fn voting_phases_fire_three_times_in_the_reference_run() {
    let cfg = EpisodeConfig::default();
    let episode = generate_episode(7, &cfg).unwrap();
    let calls = episode
        .steps()
        .iter()
        .filter(|s| s.action == ActionKind::CallVote)
        .count();
    assert_eq!(calls, 3, "interval 30, window (0, 120): turns 30, 60, 90");
}

#[test]
fn voting_records_are_out_of_band() {
    let cfg = EpisodeConfig::default();
    let episode = generate_episode(7, &cfg).unwrap();
    for step in episode.steps() {
        if step.voting_phase {
            assert_eq!(step.turn, 0);
            assert!(step.action.is_voting());
        } else {
            assert!(step.turn >= 1);
            assert!(!step.action.is_voting());
        }
    }
}

#[test]
fn two_agent_scenario_matches_hand_computed_role_draw() {
    let mut cfg = EpisodeConfig::default();
    cfg.agents.names = vec!["A".to_string(), "B".to_string()];
    cfg.simulation.turns = 20;

    let first = generate_episode(1, &cfg).unwrap();
    let second = generate_episode(1, &cfg).unwrap();
    assert_eq!(steps_json(&first), steps_json(&second));

    // The traitor index is the episode's first draw(0, 2); verify it
    // independently via the same recurrence.
    let mut rng = EpisodeRng::new(1);
    let traitor_index = rng.draw(0, 2) as usize;
    let expected_id = cfg.agents.names[traitor_index].to_lowercase();
    let snapshot = first
        .agent_snapshots()
        .into_iter()
        .find(|a| a.role == "traitor")
        .unwrap();
    assert_eq!(snapshot.id, expected_id);
}

#[test]
fn rewards_and_deltas_are_fixed_per_action_kind() {
    let cfg = EpisodeConfig::default();
    let episode = generate_episode(17, &cfg).unwrap();
    for step in episode.steps().iter().filter(|s| !s.voting_phase) {
        let (energy, reward) = match step.action {
            ActionKind::Move => (-3, -0.01),
            ActionKind::Gather => (-5, 0.2),
            ActionKind::Deposit => (-2, 0.3),
            ActionKind::Build => (-4, 0.5),
            ActionKind::Eat => (25, 0.1),
            ActionKind::SendMessage => (-1, -0.01),
            ActionKind::Wait => (-1, -0.01),
            ActionKind::Sabotage => (-5, 2.0),
            ActionKind::Poison => (-3, 10.0),
            ActionKind::Frame => (-2, 1.5),
            other => panic!("unexpected normal-turn action {other:?}"),
        };
        assert_eq!(step.energy_delta, energy, "{:?}", step.action);
        assert_eq!(step.reward, reward, "{:?}", step.action);
    }
}
