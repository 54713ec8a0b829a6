//! Plain-text presentation of maze levels.

use maze_rampage_core::{LevelPlan, SpawnLayout, Tile};

const WALL: char = '#';
const FLOOR: char = '.';
const PLAYER_SPAWN: char = '@';
const ENEMY_SPAWN: char = 'e';
const PORTAL_MARKERS: [char; 3] = ['1', '2', '3'];

/// Draws the plan one character per tile, rows separated by newlines.
///
/// Portal endpoints are numbered by pair and take precedence over spawn markers.
pub(crate) fn render_plan(plan: &LevelPlan) -> String {
    let grid = &plan.grid;
    let columns = grid.columns() as usize;
    let mut canvas: Vec<Vec<char>> = (0..grid.rows())
        .map(|_| Vec::with_capacity(columns))
        .collect();
    for (cell, tile) in grid.cells() {
        canvas[cell.row() as usize].push(match tile {
            Tile::Wall => WALL,
            Tile::Empty => FLOOR,
        });
    }

    let mut mark = |column: u32, row: u32, marker: char| {
        if let Some(slot) = canvas
            .get_mut(row as usize)
            .and_then(|line| line.get_mut(column as usize))
        {
            *slot = marker;
        }
    };

    let layout = SpawnLayout::for_grid(grid.columns(), grid.rows());
    if let Some(player) = layout.player() {
        mark(player.column(), player.row(), PLAYER_SPAWN);
    }
    for enemy in layout.enemies() {
        mark(enemy.column(), enemy.row(), ENEMY_SPAWN);
    }
    for (index, portal) in plan.portals.iter().enumerate() {
        let marker = PORTAL_MARKERS[index % PORTAL_MARKERS.len()];
        for endpoint in [portal.first(), portal.second()] {
            if let Some(cell) = grid.cell_at(endpoint) {
                mark(cell.column(), cell.row(), marker);
            }
        }
    }

    canvas
        .into_iter()
        .map(|line| line.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
