//! Terrain and resource generation.
//!
//! Each level is a grid of tiles laid out in a fixed deterministic
//! order: base, stairs, water clusters, trees, rocks, then one resource
//! cluster per kind. Earlier placements take precedence because later
//! placements skip occupied tiles; that collision policy is deliberate
//! and part of the replay contract.

use std::collections::BTreeMap;

use episode_events::{Level, ResourceKind, TerrainKind, Tile};
use tracing::debug;

use crate::rng::EpisodeRng;

/// Attempts per requested tile before a cluster placement gives up.
/// Under-full clusters are expected on crowded maps, not an error.
const PLACEMENT_ATTEMPT_FACTOR: i32 = 4;

/// Fixed per-level layout parameters.
#[derive(Debug, Clone, Copy)]
pub struct LevelSpec {
    pub level: Level,
    pub width: i32,
    pub height: i32,
    pub base: Option<(i32, i32)>,
    pub stairs_up: Option<(i32, i32)>,
    pub stairs_down: Option<(i32, i32)>,
    /// (cluster count, tiles per cluster, jitter radius)
    pub water: (i32, i32, i32),
    pub trees: i32,
    pub rocks: i32,
    /// Requested cluster size per resource kind, in `ResourceKind::all()` order.
    pub resources: [i32; 7],
}

impl LevelSpec {
    /// Layout table for the three island levels.
    ///
    /// Dimensions and landmark coordinates are compile-time constants,
    /// so grid validity (positive sizes, in-bounds base and stairs) is
    /// guaranteed by construction and never revalidated at runtime.
    pub fn for_level(level: Level) -> LevelSpec {
        match level {
            Level::Ground => LevelSpec {
                level,
                width: 30,
                height: 30,
                base: Some((15, 15)),
                stairs_up: Some((26, 4)),
                stairs_down: Some((4, 26)),
                water: (3, 12, 3),
                trees: 40,
                rocks: 25,
                // wood, food, metal, berries, fiber, poison, antidote
                resources: [18, 14, 6, 12, 10, 3, 2],
            },
            Level::Mountain => LevelSpec {
                level,
                width: 10,
                height: 10,
                base: None,
                stairs_up: None,
                stairs_down: Some((1, 1)),
                water: (1, 4, 1),
                trees: 6,
                rocks: 12,
                // antidote-heavy
                resources: [2, 3, 4, 2, 2, 2, 6],
            },
            Level::Cave => LevelSpec {
                level,
                width: 15,
                height: 15,
                base: None,
                stairs_up: Some((12, 2)),
                stairs_down: None,
                water: (1, 6, 2),
                trees: 0,
                rocks: 20,
                // metal-heavy
                resources: [2, 2, 14, 0, 3, 5, 2],
            },
        }
    }
}

/// A generated level grid plus its derived resource index.
///
/// The index is built once at generation time and never re-scanned.
#[derive(Debug, Clone)]
pub struct TileGrid {
    pub level: Level,
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    resource_locations: BTreeMap<ResourceKind, Vec<(i32, i32)>>,
}

impl TileGrid {
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        debug_assert!(self.in_bounds(x, y));
        self.tiles[(y * self.width + x) as usize]
    }

    fn tile_mut(&mut self, x: i32, y: i32) -> &mut Tile {
        &mut self.tiles[(y * self.width + x) as usize]
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        (x.clamp(0, self.width - 1), y.clamp(0, self.height - 1))
    }

    /// Coordinates of every placed resource, by kind.
    pub fn resource_locations(&self) -> &BTreeMap<ResourceKind, Vec<(i32, i32)>> {
        &self.resource_locations
    }

    /// Row-major tile dump for the presentation layer.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width as usize)
    }
}

/// All three generated levels. Agents act on the ground level; the
/// stairs tiles exist for the presentation layer.
#[derive(Debug, Clone)]
pub struct WorldMap {
    pub ground: TileGrid,
    pub mountain: TileGrid,
    pub cave: TileGrid,
}

impl WorldMap {
    /// Generate every level, consuming PRNG draws in `Level::all()` order.
    pub fn generate(rng: &mut EpisodeRng) -> WorldMap {
        WorldMap {
            ground: generate_level(LevelSpec::for_level(Level::Ground), rng),
            mountain: generate_level(LevelSpec::for_level(Level::Mountain), rng),
            cave: generate_level(LevelSpec::for_level(Level::Cave), rng),
        }
    }

    pub fn level(&self, level: Level) -> &TileGrid {
        match level {
            Level::Ground => &self.ground,
            Level::Mountain => &self.mountain,
            Level::Cave => &self.cave,
        }
    }

    /// Ground base coordinate. Present by construction of the ground spec.
    pub fn base(&self) -> (i32, i32) {
        LevelSpec::for_level(Level::Ground)
            .base
            .expect("ground level always has a base")
    }
}

/// Build one level. Placement order matters: base, stairs, water,
/// trees, rocks, resources-per-kind, with later steps skipping tiles an
/// earlier step claimed.
pub fn generate_level(spec: LevelSpec, rng: &mut EpisodeRng) -> TileGrid {
    let mut grid = TileGrid {
        level: spec.level,
        width: spec.width,
        height: spec.height,
        tiles: vec![Tile::land(); (spec.width * spec.height) as usize],
        resource_locations: BTreeMap::new(),
    };

    if let Some((x, y)) = spec.base {
        grid.tile_mut(x, y).terrain = TerrainKind::Base;
    }
    if let Some((x, y)) = spec.stairs_up {
        grid.tile_mut(x, y).terrain = TerrainKind::StairsUp;
    }
    if let Some((x, y)) = spec.stairs_down {
        grid.tile_mut(x, y).terrain = TerrainKind::StairsDown;
    }

    let (clusters, tiles_per_cluster, radius) = spec.water;
    for _ in 0..clusters {
        place_water_cluster(&mut grid, tiles_per_cluster, radius, rng);
    }

    scatter_terrain(&mut grid, TerrainKind::Tree, spec.trees, rng);
    scatter_terrain(&mut grid, TerrainKind::Rock, spec.rocks, rng);

    for (i, &kind) in ResourceKind::all().iter().enumerate() {
        place_resource_cluster(&mut grid, kind, spec.resources[i], rng);
    }

    debug!(
        level = %spec.level,
        width = spec.width,
        height = spec.height,
        resources = grid.resource_locations.values().map(Vec::len).sum::<usize>(),
        "generated level"
    );

    grid
}

/// A cluster is a drawn center plus a jittered scatter of N tiles
/// within the radius, clipped to bounds and overwriting only land.
fn place_water_cluster(grid: &mut TileGrid, tiles: i32, radius: i32, rng: &mut EpisodeRng) {
    let cx = rng.draw(0, grid.width);
    let cy = rng.draw(0, grid.height);
    for _ in 0..tiles {
        let x = cx + rng.draw(-radius, radius + 1);
        let y = cy + rng.draw(-radius, radius + 1);
        if !grid.in_bounds(x, y) {
            continue;
        }
        let tile = grid.tile_mut(x, y);
        if tile.terrain == TerrainKind::Land {
            tile.terrain = TerrainKind::Water;
        }
    }
}

/// Scatter a fixed count of one terrain kind at drawn coordinates,
/// overwriting only tiles still land.
fn scatter_terrain(grid: &mut TileGrid, kind: TerrainKind, count: i32, rng: &mut EpisodeRng) {
    for _ in 0..count {
        let x = rng.draw(0, grid.width);
        let y = rng.draw(0, grid.height);
        let tile = grid.tile_mut(x, y);
        if tile.terrain == TerrainKind::Land {
            tile.terrain = kind;
        }
    }
}

/// Place up to `count` markers of one resource kind on bare land within
/// a bounded number of attempts.
fn place_resource_cluster(
    grid: &mut TileGrid,
    kind: ResourceKind,
    count: i32,
    rng: &mut EpisodeRng,
) {
    let mut placed = 0;
    let mut attempts = 0;
    let max_attempts = count * PLACEMENT_ATTEMPT_FACTOR;
    while placed < count && attempts < max_attempts {
        attempts += 1;
        let x = rng.draw(0, grid.width);
        let y = rng.draw(0, grid.height);
        let tile = grid.tile_mut(x, y);
        if !tile.terrain.accepts_resource() || tile.resource.is_some() {
            continue;
        }
        tile.resource = Some(kind);
        grid.resource_locations.entry(kind).or_default().push((x, y));
        placed += 1;
    }
}
