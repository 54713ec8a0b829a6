use maze_rampage_core::{
    CellCoord, DisplayProfile, LevelPlan, SpawnLayout, Tile, TileGrid, WorldDimensions,
    PORTAL_PALETTE,
};
use maze_rampage_system_level_generation::{
    enemy_count, portal_count, wall_density, LevelGenerator,
};
use rand::{rngs::mock::StepRng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn desktop() -> LevelGenerator {
    LevelGenerator::new(WorldDimensions::for_profile(DisplayProfile::Desktop))
}

fn assert_border_walled(grid: &TileGrid) {
    for (cell, tile) in grid.cells() {
        if grid.is_border(cell) {
            assert_eq!(tile, Tile::Wall, "border cell {cell:?} is open");
        }
    }
}

fn assert_square_empty(grid: &TileGrid, center: CellCoord, radius: i64) {
    for rows in -radius..=radius {
        for columns in -radius..=radius {
            let cell = center.offset(columns, rows).expect("spawn area inside grid");
            let expected = if grid.is_border(cell) {
                Tile::Wall
            } else {
                Tile::Empty
            };
            assert_eq!(
                grid.tile(cell),
                Some(expected),
                "spawn area around {center:?} has the wrong tile at {cell:?}"
            );
        }
    }
}

fn assert_spawn_areas_clear(plan: &LevelPlan) {
    let layout = SpawnLayout::for_grid(plan.grid.columns(), plan.grid.rows());
    assert_square_empty(&plan.grid, layout.player().expect("player spawn"), 2);
    assert_eq!(layout.enemies().len(), 5);
    for &enemy in layout.enemies() {
        assert_square_empty(&plan.grid, enemy, 1);
    }
}

#[test]
fn every_level_has_a_walled_border_and_scheduled_enemy_count() {
    let generator = desktop();
    for level in 1..=30 {
        for seed in 0..4 {
            let plan = generator.generate_seeded(seed, level);
            assert_eq!(plan.grid.columns(), 20);
            assert_eq!(plan.grid.rows(), 15);
            assert_border_walled(&plan.grid);
            assert_eq!(plan.enemy_count, (5 + level / 2).min(12));
            assert_eq!(plan.level, level);
        }
    }
}

#[test]
fn wall_density_ramps_up_and_caps() {
    let mut previous = 0.0;
    for level in 1..=200 {
        let density = wall_density(level);
        assert!(
            density >= previous,
            "density dropped at level {level}: {density} < {previous}"
        );
        assert!(density <= 0.32 + f32::EPSILON);
        previous = density;
    }
    assert!((wall_density(3) - 0.15).abs() < 1e-6);
    assert!((wall_density(5) - 0.21).abs() < 1e-6);
    assert!((wall_density(u32::MAX) - 0.32).abs() < 1e-6);
}

#[test]
fn portal_count_follows_schedule() {
    assert_eq!(portal_count(1), 0);
    assert_eq!(portal_count(2), 0);
    assert_eq!(portal_count(3), 1);
    assert_eq!(portal_count(5), 2);
    assert_eq!(portal_count(7), 3);
    for level in 13..=40 {
        assert_eq!(portal_count(level), 3);
    }
}

#[test]
fn enemy_count_caps_at_twelve() {
    assert_eq!(enemy_count(1), 5);
    assert_eq!(enemy_count(7), 8);
    assert_eq!(enemy_count(14), 12);
    assert_eq!(enemy_count(u32::MAX), 12);
}

#[test]
fn spawn_areas_stay_clear_for_random_content() {
    let generator = desktop();
    for level in 1..=25 {
        for seed in 10..14 {
            assert_spawn_areas_clear(&generator.generate_seeded(seed, level));
        }
    }
}

#[test]
fn spawn_areas_stay_clear_even_when_every_draw_places_a_wall() {
    let generator = desktop();
    let mut rng = StepRng::new(0, 0);
    let plan = generator.generate(20, &mut rng);

    assert_border_walled(&plan.grid);
    assert_spawn_areas_clear(&plan);
    assert!(plan.grid.is_wall(CellCoord::new(10, 7)));
}

#[test]
fn first_level_scenario() {
    let plan = desktop().generate_seeded(1, 1);
    assert!((plan.wall_density - 0.12).abs() < 1e-6);
    assert!(plan.portals.is_empty());
    assert_eq!(plan.enemy_count, 5);
}

#[test]
fn seventh_level_scenario() {
    let plan = desktop().generate_seeded(1, 7);
    assert!((plan.wall_density - 0.25).abs() < 1e-6);
    assert_eq!(plan.portals.len(), 3);
    assert_eq!(plan.enemy_count, 8);
}

#[test]
fn twentieth_level_scenario() {
    let plan = desktop().generate_seeded(1, 20);
    assert!((plan.wall_density - 0.32).abs() < 1e-6);
    assert_eq!(plan.portals.len(), 3);
    assert_eq!(plan.enemy_count, 12);
}

#[test]
fn portals_sit_on_empty_tile_centres_with_cycled_colours() {
    let generator = desktop();
    for seed in 0..8 {
        let plan = generator.generate_seeded(seed, 9);
        for (index, portal) in plan.portals.iter().enumerate() {
            assert_eq!(portal.color(), PORTAL_PALETTE[index % PORTAL_PALETTE.len()]);
            for endpoint in [portal.first(), portal.second()] {
                let cell = plan.grid.cell_at(endpoint).expect("endpoint on grid");
                assert_eq!(plan.grid.tile(cell), Some(Tile::Empty));
                assert_eq!(plan.grid.cell_center(cell), endpoint);
                assert!(cell.column() >= 2 && cell.column() < 18);
                assert!(cell.row() >= 2 && cell.row() < 13);
            }
        }
    }
}

#[test]
fn portal_endpoints_are_at_least_five_tiles_apart() {
    let generator = desktop();
    let mut separated = 0;
    let mut total = 0;
    for seed in 0..16 {
        let plan = generator.generate_seeded(seed, 13);
        for portal in &plan.portals {
            total += 1;
            if portal.first().distance(portal.second()) >= 5.0 * 40.0 {
                separated += 1;
            }
        }
    }
    assert_eq!(total, 48);
    assert_eq!(separated, total);
}

#[test]
fn tiny_playfields_generate_without_portals() {
    let generator = LevelGenerator::new(WorldDimensions::new(160.0, 160.0, 40.0));
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let plan = generator.generate(9, &mut rng);
    assert_eq!(plan.grid.columns(), 4);
    assert_border_walled(&plan.grid);
    assert!(plan.portals.is_empty());

    let degenerate = LevelGenerator::new(WorldDimensions::new(0.0, 0.0, 40.0));
    let plan = degenerate.generate(3, &mut rng);
    assert_eq!(plan.grid.columns(), 0);
    assert!(plan.portals.is_empty());
}

#[test]
fn mobile_profile_keeps_every_invariant() {
    let generator = LevelGenerator::new(WorldDimensions::for_profile(DisplayProfile::Mobile));
    for level in 1..=15 {
        let plan = generator.generate_seeded(77, level);
        assert_eq!(plan.grid.columns(), 9);
        assert_eq!(plan.grid.rows(), 16);
        assert_border_walled(&plan.grid);
        assert_spawn_areas_clear(&plan);
    }
}

#[test]
fn level_zero_is_treated_as_level_one() {
    let plan = desktop().generate_seeded(5, 0);
    assert_eq!(plan.level, 1);
    assert_eq!(plan.enemy_count, 5);
}
