//! Axis-separated box movement against wall tiles and the playable bounds.

use maze_rampage_core::{BlockedSides, Bounds, CellCoord, TileGrid, Vec2};

/// Outcome of moving a box for a single physics step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Motion {
    pub(crate) position: Vec2,
    pub(crate) blocked: BlockedSides,
}

/// Moves a square box of `half_extent` by `velocity * seconds`.
///
/// The horizontal axis is resolved before the vertical one. A box that
/// already overlaps a wall may move freely so it can work itself loose.
pub(crate) fn step(
    grid: &TileGrid,
    bounds: Bounds,
    position: Vec2,
    velocity: Vec2,
    half_extent: f32,
    seconds: f32,
) -> Motion {
    let mut blocked = BlockedSides::NONE;
    let mut current = position;
    let embedded = box_hits_wall(grid, current, half_extent);

    let horizontal = Vec2::new(current.x + velocity.x * seconds, current.y);
    if velocity.x != 0.0 && !embedded && box_hits_wall(grid, horizontal, half_extent) {
        if velocity.x < 0.0 {
            blocked.left = true;
        } else {
            blocked.right = true;
        }
    } else {
        current = horizontal;
    }

    let vertical = Vec2::new(current.x, current.y + velocity.y * seconds);
    if velocity.y != 0.0 && !embedded && box_hits_wall(grid, vertical, half_extent) {
        if velocity.y < 0.0 {
            blocked.up = true;
        } else {
            blocked.down = true;
        }
    } else {
        current = vertical;
    }

    let clamped = bounds.clamp(current, half_extent);
    blocked.left |= clamped.x > current.x;
    blocked.right |= clamped.x < current.x;
    blocked.up |= clamped.y > current.y;
    blocked.down |= clamped.y < current.y;

    Motion {
        position: clamped,
        blocked,
    }
}

/// Reports whether a square box overlaps any wall tile. Cells outside the
/// grid count as walls.
pub(crate) fn box_hits_wall(grid: &TileGrid, center: Vec2, half_extent: f32) -> bool {
    let tile = grid.tile_length();
    if tile <= 0.0 {
        return false;
    }

    let min = (center - Vec2::splat(half_extent)) / tile;
    let max = (center + Vec2::splat(half_extent)) / tile;
    let first_column = min.x.floor() as i64;
    let last_column = max.x.ceil() as i64 - 1;
    let first_row = min.y.floor() as i64;
    let last_row = max.y.ceil() as i64 - 1;

    for row in first_row..=last_row {
        for column in first_column..=last_column {
            let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) else {
                return true;
            };
            if grid.is_wall(CellCoord::new(column, row)) {
                return true;
            }
        }
    }
    false
}

/// Reports whether two square boxes overlap.
pub(crate) fn boxes_overlap(a: Vec2, a_half: f32, b: Vec2, b_half: f32) -> bool {
    let reach = a_half + b_half;
    (a.x - b.x).abs() < reach && (a.y - b.y).abs() < reach
}
