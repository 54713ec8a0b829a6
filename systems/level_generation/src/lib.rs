#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural maze generation for Maze Rampage levels.
//!
//! A level is a bordered tile grid with randomly scattered walls, a single
//! smoothing pass, guaranteed-empty spawn areas, a handful of portal pairs,
//! and an enemy count. Structure depends only on the level index; content
//! depends on the injected randomness source.

use log::{debug, warn};
use maze_rampage_core::{
    CellCoord, LevelPlan, PortalPair, SpawnLayout, Tile, TileGrid, WorldDimensions,
    PORTAL_PALETTE,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

const RNG_STREAM_LEVEL: &str = "level";

const MAX_PORTAL_PAIRS: u32 = 3;
const PORTAL_PAIR_ATTEMPTS: u32 = 50;
const EMPTY_CELL_ATTEMPTS: u32 = 100;
const MIN_PORTAL_SEPARATION: f32 = 5.0;
const PORTAL_EDGE_CLEARANCE: u32 = 2;

const PLAYER_CLEARANCE: i64 = 2;
const ENEMY_CLEARANCE: i64 = 1;

const BASE_ENEMY_COUNT: u32 = 5;

const SPARSE_NEIGHBORS: u8 = 1;
const CROWDED_NEIGHBORS: u8 = 6;

/// Largest enemy count any level asks for.
pub const MAX_ENEMY_COUNT: u32 = 12;

/// Probability that an interior cell starts as a wall on the provided level.
///
/// Level `0` is treated as level `1`. The ramp is non-decreasing and capped
/// at 32%.
#[must_use]
pub fn wall_density(level: u32) -> f32 {
    match level.max(1) {
        1 => 0.12,
        level @ 2..=3 => 0.12 + (level - 2) as f32 * 0.03,
        level @ 4..=6 => 0.18 + (level - 4) as f32 * 0.03,
        level => (0.25 + (level - 7) as f32 * 0.01).min(0.32),
    }
}

/// Number of portal pairs requested for the provided level.
#[must_use]
pub fn portal_count(level: u32) -> u32 {
    if level < 2 {
        return 0;
    }
    ((level - 1) / 2).min(MAX_PORTAL_PAIRS)
}

/// Number of enemies spawned on the provided level.
#[must_use]
pub fn enemy_count(level: u32) -> u32 {
    BASE_ENEMY_COUNT
        .saturating_add(level / 2)
        .min(MAX_ENEMY_COUNT)
}

/// Derives the seed used to build `level` from a session-wide seed.
#[must_use]
pub fn derive_level_seed(global_seed: u64, level: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(RNG_STREAM_LEVEL.as_bytes());
    hasher.update(level.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

/// Builds [`LevelPlan`] values for a fixed playfield size.
#[derive(Clone, Copy, Debug, Default)]
pub struct LevelGenerator {
    dimensions: WorldDimensions,
}

impl LevelGenerator {
    /// Creates a generator for the provided playfield.
    #[must_use]
    pub const fn new(dimensions: WorldDimensions) -> Self {
        Self { dimensions }
    }

    /// Playfield the generator lays levels out on.
    #[must_use]
    pub const fn dimensions(&self) -> WorldDimensions {
        self.dimensions
    }

    /// Generates a level whose content is fully determined by `global_seed` and `level`.
    #[must_use]
    pub fn generate_seeded(&self, global_seed: u64, level: u32) -> LevelPlan {
        let mut rng = ChaCha8Rng::seed_from_u64(derive_level_seed(global_seed, level));
        self.generate(level, &mut rng)
    }

    /// Generates a level using the provided randomness source.
    pub fn generate<R>(&self, level: u32, rng: &mut R) -> LevelPlan
    where
        R: Rng + ?Sized,
    {
        let level = level.max(1);
        let mut grid = TileGrid::bordered(
            self.dimensions.columns(),
            self.dimensions.rows(),
            self.dimensions.tile_length(),
        );

        let density = wall_density(level);
        if density > 0.0 {
            scatter_walls(&mut grid, density, rng);
            smooth_walls(&mut grid);
        }

        clear_spawn_areas(&mut grid);

        let requested = portal_count(level);
        let portals = place_portals(&grid, requested, rng);
        let enemy_count = enemy_count(level);

        debug!(
            "generated level {level}: density {density:.2}, {} walls, {}/{requested} portal pairs, {enemy_count} enemies",
            grid.wall_count(),
            portals.len(),
        );

        LevelPlan {
            grid,
            portals,
            enemy_count,
            wall_density: density,
            level,
        }
    }
}

fn interior_cells(grid: &TileGrid) -> impl Iterator<Item = CellCoord> {
    let columns = grid.columns();
    let rows = grid.rows();
    (1..rows.saturating_sub(1))
        .flat_map(move |row| (1..columns.saturating_sub(1)).map(move |column| (column, row)))
        .map(|(column, row)| CellCoord::new(column, row))
}

fn scatter_walls<R>(grid: &mut TileGrid, density: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let cells: Vec<CellCoord> = interior_cells(grid).collect();
    for cell in cells {
        if rng.gen::<f32>() < density {
            grid.set(cell, Tile::Wall);
        }
    }
}

/// Single in-place pass; earlier updates are visible to later cells.
fn smooth_walls(grid: &mut TileGrid) {
    let cells: Vec<CellCoord> = interior_cells(grid).collect();
    for cell in cells {
        let neighbors = grid.wall_neighbors(cell);
        match grid.tile(cell) {
            Some(Tile::Wall) if neighbors <= SPARSE_NEIGHBORS => grid.set(cell, Tile::Empty),
            Some(Tile::Empty) if neighbors >= CROWDED_NEIGHBORS => grid.set(cell, Tile::Wall),
            _ => {}
        }
    }
}

fn clear_spawn_areas(grid: &mut TileGrid) {
    let layout = SpawnLayout::for_grid(grid.columns(), grid.rows());
    if let Some(player) = layout.player() {
        clear_area(grid, player, PLAYER_CLEARANCE);
    }
    for &enemy in layout.enemies() {
        clear_area(grid, enemy, ENEMY_CLEARANCE);
    }
}

fn clear_area(grid: &mut TileGrid, center: CellCoord, radius: i64) {
    for rows in -radius..=radius {
        for columns in -radius..=radius {
            if let Some(cell) = center.offset(columns, rows) {
                grid.set(cell, Tile::Empty);
            }
        }
    }
}

fn place_portals<R>(grid: &TileGrid, count: u32, rng: &mut R) -> Vec<PortalPair>
where
    R: Rng + ?Sized,
{
    let mut portals = Vec::new();
    for index in 0..count {
        let mut attempts = 0;
        let (first, second) = loop {
            let first = find_empty_cell(grid, rng);
            let second = find_empty_cell(grid, rng);
            attempts += 1;

            let separation = match (first, second) {
                (Some(first), Some(second)) => first.euclidean_distance(second),
                _ => 0.0,
            };
            if separation >= MIN_PORTAL_SEPARATION || attempts >= PORTAL_PAIR_ATTEMPTS {
                break (first, second);
            }
        };

        let (Some(first), Some(second)) = (first, second) else {
            warn!("dropping portal pair {index}: no empty endpoint found");
            continue;
        };

        let color = PORTAL_PALETTE[index as usize % PORTAL_PALETTE.len()];
        portals.push(PortalPair::new(
            grid.cell_center(first),
            grid.cell_center(second),
            color,
        ));
    }
    portals
}

fn find_empty_cell<R>(grid: &TileGrid, rng: &mut R) -> Option<CellCoord>
where
    R: Rng + ?Sized,
{
    let column_end = grid.columns().checked_sub(PORTAL_EDGE_CLEARANCE)?;
    let row_end = grid.rows().checked_sub(PORTAL_EDGE_CLEARANCE)?;
    if column_end <= PORTAL_EDGE_CLEARANCE || row_end <= PORTAL_EDGE_CLEARANCE {
        return None;
    }

    for _ in 0..EMPTY_CELL_ATTEMPTS {
        let cell = CellCoord::new(
            rng.gen_range(PORTAL_EDGE_CLEARANCE..column_end),
            rng.gen_range(PORTAL_EDGE_CLEARANCE..row_end),
        );
        if grid.tile(cell) == Some(Tile::Empty) {
            return Some(cell);
        }
    }
    None
}
