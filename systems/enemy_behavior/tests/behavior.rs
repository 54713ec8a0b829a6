use std::time::Duration;

use maze_rampage_core::{
    CellCoord, Command, Cue, EnemyId, Event, LevelPlan, Tile, TileGrid, TimeScale, Vec2,
};
use maze_rampage_system_enemy_behavior::{BehaviorTuning, Config, EnemyBehavior};
use maze_rampage_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);

struct Arena {
    world: World,
    behavior: EnemyBehavior,
    events: Vec<Event>,
    cues: Vec<Cue>,
}

impl Arena {
    fn new(plan: LevelPlan, tuning: BehaviorTuning) -> Self {
        let mut arena = Self {
            world: World::default(),
            behavior: EnemyBehavior::new(Config::new(0x5eed).with_tuning(tuning)),
            events: Vec::new(),
            cues: Vec::new(),
        };
        arena.run(vec![Command::StartLevel { plan }]);
        arena
    }

    fn spawn(&mut self, position: Vec2) -> EnemyId {
        let before = self.events.len();
        self.run(vec![Command::SpawnEnemy {
            position,
            velocity: Vec2::ZERO,
        }]);
        self.events[before..]
            .iter()
            .find_map(|event| match event {
                Event::EnemySpawned { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .expect("enemy spawned")
    }

    /// Applies commands and lets the behaviour system react until it goes quiet.
    fn run(&mut self, mut commands: Vec<Command>) {
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.behavior.handle(
                &events,
                &query::arena_view(&self.world),
                &mut commands,
                &mut self.cues,
            );
            self.events.extend(events);
        }
    }

    fn frame(&mut self) {
        self.run(vec![Command::Tick { dt: FRAME }]);
    }
}

fn open_plan() -> LevelPlan {
    LevelPlan {
        grid: TileGrid::bordered(20, 15, 40.0),
        portals: Vec::new(),
        enemy_count: 1,
        wall_density: 0.0,
        level: 1,
    }
}

fn certain_dodges() -> BehaviorTuning {
    BehaviorTuning {
        dodge_base_chance: 1.0,
        dodge_max_chance: 1.0,
        dodge_success_chance: 0.0,
        ..BehaviorTuning::default()
    }
}

#[test]
fn projectile_passes_through_a_dodging_enemy() {
    let mut arena = Arena::new(open_plan(), certain_dodges());
    let enemy = arena.spawn(Vec2::new(420.0, 300.0));
    arena.run(vec![Command::FireProjectile]);

    let mut overlaps = 0;
    for _ in 0..60 {
        let before = arena.events.len();
        arena.frame();
        for event in &arena.events[before..] {
            if let Event::ProjectileOverlap { projectile, .. } = event {
                overlaps += 1;
                assert!(
                    query::projectiles(&arena.world)
                        .iter()
                        .any(|candidate| candidate.id == *projectile),
                    "projectile was consumed by a dodging enemy"
                );
            }
        }
    }

    assert!(overlaps > 0, "projectile never reached the enemy");
    let record = arena.behavior.enemy(enemy).expect("enemy alive");
    assert!(record.is_dodging());
    assert_eq!(record.health(), 100);
    assert_eq!(query::time_scale(&arena.world), TimeScale::Slowed);
    assert!(arena
        .events
        .iter()
        .all(|event| !matches!(event, Event::EnemyDied { .. })));
}

#[test]
fn second_dodger_neither_takes_nor_releases_slow_motion() {
    let mut arena = Arena::new(open_plan(), certain_dodges());
    let lower = arena.spawn(Vec2::new(420.0, 300.0));
    let upper = arena.spawn(Vec2::new(420.0, 200.0));
    arena.run(vec![Command::FireProjectile]);

    for _ in 0..60 {
        arena.frame();
    }
    assert!(arena.behavior.enemy(lower).expect("lower").is_dodging());
    assert!(arena.behavior.enemy(upper).expect("upper").is_dodging());
    assert_eq!(query::slow_motion_owner(&arena.world), Some(lower));

    // The first dodge ends roughly 3150ms in; the second one lasts longer.
    for _ in 0..150 {
        arena.frame();
    }
    assert!(!arena.behavior.enemy(lower).expect("lower").is_dodging());
    assert!(arena.behavior.enemy(upper).expect("upper").is_dodging());
    assert_eq!(query::time_scale(&arena.world), TimeScale::Normal);

    for _ in 0..60 {
        arena.frame();
    }
    let changes: Vec<&Event> = arena
        .events
        .iter()
        .filter(|event| matches!(event, Event::TimeScaleChanged { .. }))
        .collect();
    assert_eq!(changes.len(), 2);
    assert_eq!(
        arena
            .cues
            .iter()
            .filter(|cue| matches!(cue, Cue::DodgeStarted { .. }))
            .count(),
        2
    );
}

#[test]
fn walled_off_chaser_enrages_and_breaks_through() {
    let mut plan = open_plan();
    for column in 1..19 {
        plan.grid.set(CellCoord::new(column, 9), Tile::Wall);
    }
    let tuning = BehaviorTuning {
        dodge_base_chance: 0.0,
        dodge_chance_per_level: 0.0,
        ..BehaviorTuning::default()
    };
    let mut arena = Arena::new(plan, tuning);
    let enemy = arena.spawn(Vec2::new(420.0, 300.0));
    // The player walks up against the wall, well inside attack range.
    arena.run(vec![Command::SetPlayerVelocity {
        velocity: Vec2::new(0.0, -100.0),
    }]);

    let mut broke_through = false;
    for _ in 0..500 {
        arena.frame();
        if arena
            .events
            .iter()
            .any(|event| matches!(event, Event::WallsDestroyed { .. }))
        {
            broke_through = true;
            break;
        }
    }

    assert!(broke_through, "enemy never destroyed a wall");
    assert!(arena.cues.contains(&Cue::FrustrationWarning { enemy }));
    assert!(arena.cues.contains(&Cue::FinalWarning { enemy }));
    assert!(arena.cues.iter().any(|cue| matches!(
        cue,
        Cue::BerserkerEntered { enemy: raging, .. } if *raging == enemy
    )));
    assert!(!query::tile_grid(&arena.world).is_wall(CellCoord::new(10, 9)));
    assert!(query::tile_grid(&arena.world).is_wall(CellCoord::new(0, 9)));
}

#[test]
fn killing_every_enemy_clears_the_level() {
    let tuning = BehaviorTuning {
        dodge_base_chance: 0.0,
        dodge_chance_per_level: 0.0,
        ..BehaviorTuning::default()
    };
    let mut arena = Arena::new(open_plan(), tuning);
    let enemy = arena.spawn(Vec2::new(420.0, 150.0));

    for _ in 0..120 {
        arena.run(vec![Command::FireProjectile]);
        arena.frame();
        if arena.behavior.enemy(enemy).is_none() {
            break;
        }
    }

    assert!(arena.behavior.enemies().is_empty());
    assert!(arena.events.contains(&Event::EnemyDied { enemy }));
    assert!(arena.events.contains(&Event::LevelCleared { level: 1 }));
    assert_eq!(
        arena
            .cues
            .iter()
            .filter(|cue| matches!(cue, Cue::EnemyHit { .. }))
            .count(),
        2
    );
}
