//! Action policy engine.
//!
//! Per agent per turn: build a weighted candidate list from the current
//! state, draw one candidate, execute it. Candidates are a tagged enum
//! rather than closures so each kind's precondition and effect are
//! independently testable. The list order is part of the replay
//! contract: it is the tie-break when a weighted draw lands exactly on
//! a boundary.

pub mod text;

use episode_events::{ActionKind, Movement, ResourceKind, Target};
use tracing::trace;

use crate::config::EpisodeConfig;
use crate::ledger::Ledger;
use crate::rng::EpisodeRng;
use crate::roster::{Agent, Role};
use crate::terrain::WorldMap;

/// The 8 compass directions, in candidate order.
pub const COMPASS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// Movement requires more energy than this.
const MOVE_ENERGY_FLOOR: i32 = 10;
/// Eating is only considered below this energy level.
const EAT_ENERGY_CEILING: i32 = 40;
/// Box radius of the gather search.
const GATHER_RADIUS: i32 = 3;
/// Sabotage only pays once the ship is visibly underway.
const SABOTAGE_PROGRESS_FLOOR: f64 = 20.0;
/// Framing starts only after suspicion has had time to build.
const FRAME_TURN_FLOOR: u32 = 50;

/// One legal action for this agent this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateAction {
    Move { dx: i32, dy: i32 },
    /// Gather carries the tile found by the box scan so execution does
    /// not re-search.
    Gather { x: i32, y: i32, kind: ResourceKind },
    Deposit,
    Build,
    Eat,
    SendMessage,
    Wait,
    Sabotage,
    Poison,
    Frame,
}

impl CandidateAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            CandidateAction::Move { .. } => ActionKind::Move,
            CandidateAction::Gather { .. } => ActionKind::Gather,
            CandidateAction::Deposit => ActionKind::Deposit,
            CandidateAction::Build => ActionKind::Build,
            CandidateAction::Eat => ActionKind::Eat,
            CandidateAction::SendMessage => ActionKind::SendMessage,
            CandidateAction::Wait => ActionKind::Wait,
            CandidateAction::Sabotage => ActionKind::Sabotage,
            CandidateAction::Poison => ActionKind::Poison,
            CandidateAction::Frame => ActionKind::Frame,
        }
    }
}

/// A candidate with its integer selection weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedCandidate {
    pub action: CandidateAction,
    pub weight: i32,
}

impl WeightedCandidate {
    fn new(action: CandidateAction, weight: i32) -> Self {
        Self { action, weight }
    }
}

/// What an executed action reports back; the episode loop stamps
/// turn/day/agent on top and applies the energy and ship deltas.
#[derive(Debug, Clone)]
pub struct StepFragment {
    pub action: ActionKind,
    pub target: Option<Target>,
    pub reasoning: String,
    pub dialogue: String,
    pub energy_delta: i32,
    pub reward: f64,
    pub movement: Option<Movement>,
    pub ship_delta: f64,
}

/// Fixed per-kind energy deltas. Deterministic functions of the chosen
/// action kind only.
fn energy_delta(kind: ActionKind) -> i32 {
    match kind {
        ActionKind::Move => -3,
        ActionKind::Gather => -5,
        ActionKind::Deposit => -2,
        ActionKind::Build => -4,
        ActionKind::Eat => 25,
        ActionKind::SendMessage => -1,
        ActionKind::Wait => -1,
        ActionKind::Sabotage => -5,
        ActionKind::Poison => -3,
        ActionKind::Frame => -2,
        _ => 0,
    }
}

/// Fixed per-kind scalar rewards.
fn reward(kind: ActionKind) -> f64 {
    match kind {
        ActionKind::Gather => 0.2,
        ActionKind::Deposit => 0.3,
        ActionKind::Build => 0.5,
        ActionKind::Eat => 0.1,
        ActionKind::Sabotage => 2.0,
        ActionKind::Poison => 10.0,
        ActionKind::Frame => 1.5,
        _ => -0.01,
    }
}

/// Fixed per-kind overall-ship-progress deltas.
fn ship_delta(kind: ActionKind) -> f64 {
    match kind {
        ActionKind::Deposit => 1.0,
        ActionKind::Build => 3.0,
        ActionKind::Sabotage => -15.0,
        _ => 0.0,
    }
}

/// Bounded box scan around (ax, ay): first resource tile in fixed scan
/// order wins. Ties resolve by scan order, not distance.
pub fn find_nearby_resource(
    grid: &crate::terrain::TileGrid,
    ax: i32,
    ay: i32,
) -> Option<(i32, i32, ResourceKind)> {
    for dy in -GATHER_RADIUS..=GATHER_RADIUS {
        for dx in -GATHER_RADIUS..=GATHER_RADIUS {
            let (x, y) = (ax + dx, ay + dy);
            if !grid.in_bounds(x, y) {
                continue;
            }
            if let Some(kind) = grid.tile(x, y).resource {
                return Some((x, y, kind));
            }
        }
    }
    None
}

fn on_base(agent: &Agent, map: &WorldMap) -> bool {
    (agent.x, agent.y) == map.base()
}

/// Build the weighted candidate list for one agent. Inclusion order is
/// fixed: movement, gather, deposit, build, eat, send-message, wait,
/// then the traitor's extras (sabotage, poison, frame).
pub fn build_candidates(
    agents: &[Agent],
    actor: usize,
    map: &WorldMap,
    ledger: &Ledger,
    turn: u32,
    cfg: &EpisodeConfig,
    rng: &mut EpisodeRng,
) -> Vec<WeightedCandidate> {
    let agent = &agents[actor];
    let weights = &cfg.weights;
    let chances = &cfg.chances;
    let mut candidates = Vec::new();

    if agent.energy > MOVE_ENERGY_FLOOR {
        for (dx, dy) in COMPASS {
            candidates.push(WeightedCandidate::new(
                CandidateAction::Move { dx, dy },
                weights.move_step,
            ));
        }
    }

    if let Some((x, y, kind)) = find_nearby_resource(&map.ground, agent.x, agent.y) {
        candidates.push(WeightedCandidate::new(
            CandidateAction::Gather { x, y, kind },
            weights.gather,
        ));
    }

    if on_base(agent, map) && agent.holds_anything() {
        candidates.push(WeightedCandidate::new(
            CandidateAction::Deposit,
            weights.deposit,
        ));
    }

    if on_base(agent, map)
        && (ledger.common_stock(ResourceKind::Wood) > 0
            || ledger.common_stock(ResourceKind::Metal) > 0)
    {
        candidates.push(WeightedCandidate::new(
            CandidateAction::Build,
            weights.build,
        ));
    }

    if agent.energy < EAT_ENERGY_CEILING && agent.stock(ResourceKind::Food) > 0 {
        candidates.push(WeightedCandidate::new(CandidateAction::Eat, weights.eat));
    }

    if rng.chance(chances.send_message) {
        candidates.push(WeightedCandidate::new(
            CandidateAction::SendMessage,
            weights.send_message,
        ));
    }

    // Fallback: the list is never empty.
    candidates.push(WeightedCandidate::new(CandidateAction::Wait, weights.wait));

    if agent.role == Role::Traitor {
        if on_base(agent, map)
            && ledger.overall_progress() > SABOTAGE_PROGRESS_FLOOR
            && rng.chance(chances.sabotage)
        {
            candidates.push(WeightedCandidate::new(
                CandidateAction::Sabotage,
                weights.sabotage,
            ));
        }
        if agent.stock(ResourceKind::Poison) > 0 && rng.chance(chances.poison) {
            candidates.push(WeightedCandidate::new(
                CandidateAction::Poison,
                weights.poison,
            ));
        }
        if turn > FRAME_TURN_FLOOR && rng.chance(chances.frame) {
            candidates.push(WeightedCandidate::new(
                CandidateAction::Frame,
                weights.frame,
            ));
        }
    }

    candidates
}

/// Weighted draw over the candidate list: draw in [0, total), subtract
/// weights in list order, pick when the remainder hits or crosses zero.
pub fn select<'a>(
    candidates: &'a [WeightedCandidate],
    rng: &mut EpisodeRng,
) -> &'a CandidateAction {
    let total: i32 = candidates.iter().map(|c| c.weight).sum();
    let mut remainder = rng.draw(0, total);
    for candidate in candidates {
        remainder -= candidate.weight;
        if remainder <= 0 {
            return &candidate.action;
        }
    }
    // Unreachable with positive weights; mirror the draw contract anyway.
    &candidates.last().expect("candidate list is never empty").action
}

/// Execute the chosen candidate: mutate the acting agent, the ledger,
/// and (for poison) the victim, then report the fragment.
pub fn execute(
    action: &CandidateAction,
    agents: &mut [Agent],
    actor: usize,
    map: &WorldMap,
    ledger: &mut Ledger,
    rng: &mut EpisodeRng,
) -> StepFragment {
    let kind = action.kind();
    let mut fragment = StepFragment {
        action: kind,
        target: None,
        reasoning: String::new(),
        dialogue: String::new(),
        energy_delta: energy_delta(kind),
        reward: reward(kind),
        movement: None,
        ship_delta: ship_delta(kind),
    };

    match action {
        CandidateAction::Move { dx, dy } => {
            let agent = &mut agents[actor];
            let (nx, ny) = map.ground.clamp(agent.x + dx, agent.y + dy);
            agent.target_x = nx;
            agent.target_y = ny;
            agent.x = nx;
            agent.y = ny;
            fragment.movement = Some(Movement { dx: *dx, dy: *dy });
            fragment.reasoning = text::reasoning(kind, rng);
            fragment.dialogue = text::dialogue(kind, rng);
        }
        CandidateAction::Gather { kind: resource, .. } => {
            let amount = rng.draw(1, 4) as u32;
            agents[actor].add_stock(*resource, amount);
            fragment.target = Some(Target::Resource(*resource));
            fragment.reasoning = text::reasoning(kind, rng);
            fragment.dialogue = text::dialogue(kind, rng);
        }
        CandidateAction::Deposit => {
            let moved = ledger.deposit(&mut agents[actor].inventory);
            fragment.reasoning = text::deposit_reasoning(&moved);
            fragment.dialogue = text::dialogue(kind, rng);
        }
        CandidateAction::Build => {
            if let Some(component) = ledger.build(rng) {
                fragment.target = Some(Target::Component(component.to_string()));
            }
            fragment.reasoning = text::reasoning(kind, rng);
            fragment.dialogue = text::dialogue(kind, rng);
        }
        CandidateAction::Eat => {
            agents[actor].remove_stock(ResourceKind::Food, 1);
            fragment.reasoning = text::reasoning(kind, rng);
            fragment.dialogue = text::dialogue(kind, rng);
        }
        CandidateAction::SendMessage | CandidateAction::Wait | CandidateAction::Sabotage => {
            fragment.reasoning = text::reasoning(kind, rng);
            fragment.dialogue = text::dialogue(kind, rng);
        }
        CandidateAction::Poison => {
            let victims: Vec<usize> = (0..agents.len())
                .filter(|&i| i != actor && agents[i].alive)
                .collect();
            fragment.reasoning = text::reasoning(kind, rng);
            fragment.dialogue = text::dialogue(kind, rng);
            if !victims.is_empty() {
                let victim = *rng.pick(&victims);
                agents[actor].remove_stock(ResourceKind::Poison, 1);
                agents[victim].energy = (agents[victim].energy - 30).max(0);
                fragment.target = Some(Target::Agent(agents[victim].id.clone()));
            }
        }
        CandidateAction::Frame => {
            let marks: Vec<usize> = (0..agents.len())
                .filter(|&i| i != actor && agents[i].alive)
                .collect();
            fragment.reasoning = text::reasoning(kind, rng);
            if !marks.is_empty() {
                let mark = *rng.pick(&marks);
                fragment.dialogue = text::frame_dialogue(&agents[mark].name);
                fragment.target = Some(Target::Agent(agents[mark].id.clone()));
            } else {
                fragment.dialogue = text::dialogue(kind, rng);
            }
        }
    }

    trace!(
        agent = %agents[actor].id,
        action = %fragment.action,
        reward = fragment.reward,
        "executed step"
    );

    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::create_roster;
    use episode_events::TerrainKind;

    fn fixture(seed: u64) -> (Vec<Agent>, WorldMap, Ledger, EpisodeConfig, EpisodeRng) {
        let cfg = EpisodeConfig::default();
        let mut rng = EpisodeRng::new(seed);
        let roster = create_roster(&cfg.agents.names, (15, 15), &mut rng);
        let map = WorldMap::generate(&mut rng);
        (roster, map, Ledger::new(), cfg, rng)
    }

    #[test]
    fn low_energy_drops_movement_candidates() {
        let (mut agents, map, ledger, cfg, mut rng) = fixture(1);
        agents[0].energy = 5;
        let candidates = build_candidates(&agents, 0, &map, &ledger, 1, &cfg, &mut rng);
        assert!(
            candidates
                .iter()
                .all(|c| !matches!(c.action, CandidateAction::Move { .. })),
            "movement requires energy > 10"
        );
    }

    #[test]
    fn wait_fallback_is_always_present() {
        let (mut agents, map, ledger, cfg, mut rng) = fixture(2);
        agents[0].energy = 1;
        let candidates = build_candidates(&agents, 0, &map, &ledger, 1, &cfg, &mut rng);
        assert!(candidates
            .iter()
            .any(|c| c.action == CandidateAction::Wait));
    }

    #[test]
    fn colonists_never_get_traitor_candidates() {
        let (agents, map, mut ledger, cfg, mut rng) = fixture(3);
        ledger.apply_ship_delta(50.0);
        let colonist = agents
            .iter()
            .position(|a| a.role == Role::Colonist)
            .unwrap();
        for _ in 0..50 {
            let candidates =
                build_candidates(&agents, colonist, &map, &ledger, 100, &cfg, &mut rng);
            assert!(candidates.iter().all(|c| !matches!(
                c.action,
                CandidateAction::Sabotage | CandidateAction::Poison | CandidateAction::Frame
            )));
        }
    }

    #[test]
    fn deposit_requires_base_and_stock() {
        let (mut agents, map, ledger, cfg, mut rng) = fixture(4);
        let (bx, by) = map.base();
        agents[0].x = bx;
        agents[0].y = by;
        let candidates = build_candidates(&agents, 0, &map, &ledger, 1, &cfg, &mut rng);
        let colonist_empty_handed = agents[0].role == Role::Colonist;
        if colonist_empty_handed {
            assert!(!candidates
                .iter()
                .any(|c| c.action == CandidateAction::Deposit));
        }

        agents[0].add_stock(ResourceKind::Wood, 2);
        let candidates = build_candidates(&agents, 0, &map, &ledger, 1, &cfg, &mut rng);
        assert!(candidates
            .iter()
            .any(|c| c.action == CandidateAction::Deposit));
    }

    #[test]
    fn select_honors_list_order_on_boundaries() {
        // Remainder hitting zero exactly picks the earlier candidate.
        let candidates = vec![
            WeightedCandidate::new(CandidateAction::Wait, 2),
            WeightedCandidate::new(CandidateAction::Deposit, 2),
        ];
        // Walk seeds until the draw lands on each value in [0, 4).
        let mut picked_first = false;
        let mut picked_second = false;
        for seed in 0..4000 {
            let mut probe = EpisodeRng::new(seed);
            let value = probe.draw(0, 4);
            let mut rng = EpisodeRng::new(seed);
            let chosen = select(&candidates, &mut rng);
            if value <= 2 {
                assert_eq!(chosen, &CandidateAction::Wait);
                picked_first = true;
            } else {
                assert_eq!(chosen, &CandidateAction::Deposit);
                picked_second = true;
            }
        }
        assert!(picked_first && picked_second);
    }

    #[test]
    fn selection_only_returns_built_candidates() {
        let (agents, map, ledger, cfg, mut rng) = fixture(6);
        for turn in 1..30 {
            let candidates = build_candidates(&agents, 0, &map, &ledger, turn, &cfg, &mut rng);
            let chosen = select(&candidates, &mut rng).clone();
            assert!(candidates.iter().any(|c| c.action == chosen));
        }
    }

    #[test]
    fn gather_scan_prefers_scan_order_over_distance() {
        let (_, map, _, _, _) = fixture(7);
        let grid = &map.ground;
        // Wherever the scan finds something, no earlier scan cell may
        // hold a resource.
        if let Some((fx, fy, _)) = find_nearby_resource(grid, 15, 15) {
            'outer: for dy in -3..=3 {
                for dx in -3..=3i32 {
                    let (x, y) = (15 + dx, 15 + dy);
                    if (x, y) == (fx, fy) {
                        break 'outer;
                    }
                    if grid.in_bounds(x, y) {
                        assert!(grid.tile(x, y).resource.is_none());
                    }
                }
            }
        }
    }

    #[test]
    fn move_clamps_at_grid_edge() {
        let (mut agents, map, mut ledger, _cfg, mut rng) = fixture(8);
        agents[0].x = 0;
        agents[0].y = 0;
        let fragment = execute(
            &CandidateAction::Move { dx: -1, dy: -1 },
            &mut agents,
            0,
            &map,
            &mut ledger,
            &mut rng,
        );
        assert_eq!((agents[0].x, agents[0].y), (0, 0));
        assert_eq!(fragment.movement, Some(Movement { dx: -1, dy: -1 }));
    }

    #[test]
    fn eat_consumes_food() {
        let (mut agents, map, mut ledger, _cfg, mut rng) = fixture(9);
        agents[0].add_stock(ResourceKind::Food, 2);
        agents[0].energy = 30;
        let fragment = execute(
            &CandidateAction::Eat,
            &mut agents,
            0,
            &map,
            &mut ledger,
            &mut rng,
        );
        assert_eq!(agents[0].stock(ResourceKind::Food), 1);
        assert_eq!(fragment.energy_delta, 25);
    }

    #[test]
    fn poison_hits_a_living_victim() {
        let (mut agents, map, mut ledger, _cfg, mut rng) = fixture(10);
        let traitor = agents.iter().position(|a| a.role == Role::Traitor).unwrap();
        let fragment = execute(
            &CandidateAction::Poison,
            &mut agents,
            traitor,
            &map,
            &mut ledger,
            &mut rng,
        );
        let victim_id = match fragment.target {
            Some(Target::Agent(ref id)) => id.clone(),
            other => panic!("expected agent target, got {other:?}"),
        };
        let victim = agents.iter().find(|a| a.id == victim_id).unwrap();
        assert_eq!(victim.energy, 70);
        assert_eq!(agents[traitor].stock(ResourceKind::Poison), 1);
    }

    #[test]
    fn sabotage_reports_strongly_negative_ship_delta() {
        let (mut agents, map, mut ledger, _cfg, mut rng) = fixture(11);
        let traitor = agents.iter().position(|a| a.role == Role::Traitor).unwrap();
        let fragment = execute(
            &CandidateAction::Sabotage,
            &mut agents,
            traitor,
            &map,
            &mut ledger,
            &mut rng,
        );
        assert_eq!(fragment.ship_delta, -15.0);
        assert_eq!(fragment.reward, 2.0);
        assert_eq!(fragment.dialogue, "Working on the ship!");
    }

    #[test]
    fn base_tile_exists_where_policy_expects_it() {
        let (_, map, _, _, _) = fixture(12);
        let (bx, by) = map.base();
        assert_eq!(map.ground.tile(bx, by).terrain, TerrainKind::Base);
    }
}
