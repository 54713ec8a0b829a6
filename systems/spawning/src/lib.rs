#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use std::f32::consts::TAU;

use log::warn;
use maze_rampage_core::{Command, Event, SpawnLayout, TileGrid, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const BAND_EDGE_MARGIN: f32 = 50.0;
const BAND_TOP: f32 = 50.0;
const BAND_BOTTOM: f32 = 200.0;
const PLACEMENT_ATTEMPTS: u32 = 20;
const DEFAULT_ENEMY_SPEED: f32 = 80.0;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    enemy_speed: f32,
}

impl Config {
    /// Creates a new configuration using the provided seed and the default enemy speed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            enemy_speed: DEFAULT_ENEMY_SPEED,
        }
    }

    /// Replaces the speed freshly spawned enemies start moving with.
    #[must_use]
    pub const fn with_enemy_speed(mut self, enemy_speed: f32) -> Self {
        self.enemy_speed = enemy_speed;
        self
    }
}

/// Pure system that places a level's enemies in the band along the top of the maze.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    enemy_speed: f32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            enemy_speed: config.enemy_speed,
        }
    }

    /// Consumes events and the maze geometry to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], grid: &TileGrid, out: &mut Vec<Command>) {
        for event in events {
            let Event::LevelStarted { enemy_count, .. } = event else {
                continue;
            };

            let fallbacks: Vec<Vec2> = SpawnLayout::for_grid(grid.columns(), grid.rows())
                .enemies()
                .iter()
                .map(|cell| grid.cell_center(*cell))
                .collect();

            for index in 0..*enemy_count {
                let position = self
                    .random_open_position(grid)
                    .unwrap_or_else(|| fallback_position(grid, &fallbacks, index));
                let heading = self.rng.gen::<f32>() * TAU;
                out.push(Command::SpawnEnemy {
                    position,
                    velocity: Vec2::from_angle(heading) * self.enemy_speed,
                });
            }
        }
    }

    fn random_open_position(&mut self, grid: &TileGrid) -> Option<Vec2> {
        let width = grid.columns() as f32 * grid.tile_length();
        let height = grid.rows() as f32 * grid.tile_length();

        for _ in 0..PLACEMENT_ATTEMPTS {
            let position = Vec2::new(
                sample_span(&mut self.rng, BAND_EDGE_MARGIN, width - BAND_EDGE_MARGIN, width),
                sample_span(&mut self.rng, BAND_TOP, BAND_BOTTOM.min(height - BAND_TOP), height),
            );
            let open = grid
                .cell_at(position)
                .map_or(false, |cell| !grid.is_wall(cell));
            if open {
                return Some(position);
            }
        }
        None
    }
}

/// Uniform sample from `[low, high]`, or the middle of `extent` when the span is empty.
fn sample_span<R>(rng: &mut R, low: f32, high: f32, extent: f32) -> f32
where
    R: Rng + ?Sized,
{
    if high > low {
        rng.gen_range(low..=high)
    } else {
        extent * 0.5
    }
}

fn fallback_position(grid: &TileGrid, fallbacks: &[Vec2], index: u32) -> Vec2 {
    warn!("no open tile found in the spawn band, using spawn area {index}");
    if fallbacks.is_empty() {
        let tile = grid.tile_length();
        return Vec2::new(grid.columns() as f32 * tile, grid.rows() as f32 * tile) * 0.5;
    }
    fallbacks[index as usize % fallbacks.len()]
}
