//! Headless game loop wiring the world to its systems.

use std::{fmt, time::Duration};

use log::{debug, info, warn};
use maze_rampage_core::{Command, Cue, Event, LevelPlan, WorldDimensions};
use maze_rampage_system_enemy_behavior::{self as enemy_behavior, BehaviorTuning, EnemyBehavior};
use maze_rampage_system_level_generation::LevelGenerator;
use maze_rampage_system_spawning::{self as spawning, Spawning};
use maze_rampage_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::autopilot::Autopilot;

/// Final tally of a headless run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) level: u32,
    pub(crate) levels_cleared: u32,
    pub(crate) frames: u64,
    pub(crate) player_health: Option<i32>,
    pub(crate) enemies_remaining: usize,
    pub(crate) defeated: bool,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let health = self
            .player_health
            .map_or_else(|| "-".to_owned(), |health| health.to_string());
        write!(
            f,
            "level {} after {} frames: {} cleared, {} enemies left, player health {}{}",
            self.level,
            self.frames,
            self.levels_cleared,
            self.enemies_remaining,
            health,
            if self.defeated { " (defeated)" } else { "" }
        )
    }
}

/// Owns the world plus every system and routes messages between them.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    generator: LevelGenerator,
    spawning: Spawning,
    behavior: EnemyBehavior,
    autopilot: Autopilot,
    global_seed: u64,
    levels_cleared: u32,
    frames: u64,
    defeated: bool,
    cues: Vec<Cue>,
}

impl Session {
    /// Creates an idle session; systems draw their seeds from `global_seed`.
    pub(crate) fn new(dimensions: WorldDimensions, global_seed: u64) -> Self {
        Self::with_tuning(dimensions, global_seed, BehaviorTuning::default())
    }

    /// Creates an idle session whose enemies follow `tuning`, spawn speed included.
    pub(crate) fn with_tuning(
        dimensions: WorldDimensions,
        global_seed: u64,
        tuning: BehaviorTuning,
    ) -> Self {
        let mut seeds = ChaCha8Rng::seed_from_u64(global_seed);
        let spawn_config = spawning::Config::new(seeds.gen()).with_enemy_speed(tuning.base_speed);
        let behavior_config = enemy_behavior::Config::new(seeds.gen()).with_tuning(tuning);
        Self {
            world: World::new(dimensions),
            generator: LevelGenerator::new(dimensions),
            spawning: Spawning::new(spawn_config),
            behavior: EnemyBehavior::new(behavior_config),
            autopilot: Autopilot::default(),
            global_seed,
            levels_cleared: 0,
            frames: 0,
            defeated: false,
            cues: Vec::new(),
        }
    }

    /// Replaces the arena with the provided plan.
    pub(crate) fn start(&mut self, plan: LevelPlan) {
        info!(
            "starting level {} with {} enemies and {} portals",
            plan.level,
            plan.enemy_count,
            plan.portals.len()
        );
        let events = self.pump(vec![Command::StartLevel { plan }]);
        self.settle(events);
    }

    /// Runs up to `frames` frames of `dt`, stopping early once the player falls.
    pub(crate) fn run(&mut self, frames: u64, dt: Duration) -> Summary {
        for _ in 0..frames {
            if self.defeated {
                break;
            }
            self.frame(dt);
        }
        self.summary()
    }

    /// Advances the simulation by one frame of player input and physics.
    pub(crate) fn frame(&mut self, dt: Duration) {
        let mut commands = self.autopilot.steer(&query::arena_view(&self.world));
        commands.push(Command::Tick { dt });
        let events = self.pump(commands);
        self.frames += 1;
        self.settle(events);
    }

    /// Snapshot of the run so far.
    pub(crate) fn summary(&self) -> Summary {
        Summary {
            level: query::level(&self.world),
            levels_cleared: self.levels_cleared,
            frames: self.frames,
            player_health: query::player(&self.world).map(|player| player.health),
            enemies_remaining: query::enemy_bodies(&self.world).len(),
            defeated: self.defeated,
        }
    }

    /// Applies commands and lets every system respond until no commands remain.
    fn pump(&mut self, mut commands: Vec<Command>) -> Vec<Event> {
        let mut published = Vec::new();
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.spawning
                .handle(&events, query::tile_grid(&self.world), &mut commands);
            self.behavior.handle(
                &events,
                &query::arena_view(&self.world),
                &mut commands,
                &mut self.cues,
            );
            published.extend(events);
        }
        published
    }

    /// Reacts to level transitions and flushes cues to the log.
    fn settle(&mut self, events: Vec<Event>) {
        for event in events {
            match event {
                Event::LevelCleared { level } => {
                    self.levels_cleared += 1;
                    info!("level {level} cleared");
                    let plan = self.generator.generate_seeded(self.global_seed, level + 1);
                    self.start(plan);
                }
                Event::PlayerDefeated => {
                    warn!("player defeated on level {}", query::level(&self.world));
                    self.defeated = true;
                }
                _ => {}
            }
        }

        for cue in self.cues.drain(..) {
            match cue {
                Cue::BerserkerEntered { enemy, level } => {
                    info!("enemy {} went berserk (x{})", enemy.get(), level.get());
                }
                Cue::FinalWarning { enemy } => info!("enemy {} is about to snap", enemy.get()),
                other => debug!("{other:?}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_rampage_system_level_generation::enemy_count;

    const FRAME: Duration = Duration::from_millis(16);

    fn started(seed: u64) -> (Session, LevelPlan) {
        let dimensions = WorldDimensions::default();
        let plan = LevelGenerator::new(dimensions).generate_seeded(seed, 1);
        let mut session = Session::new(dimensions, seed);
        session.start(plan.clone());
        (session, plan)
    }

    #[test]
    fn starting_a_level_spawns_its_enemies() {
        let (session, plan) = started(11);
        assert_eq!(
            query::enemy_bodies(&session.world).len(),
            plan.enemy_count as usize
        );
        assert_eq!(session.behavior.enemies().len(), plan.enemy_count as usize);
        assert!(query::player(&session.world).is_some_and(|player| player.active));
    }

    #[test]
    fn enemies_spawn_at_the_tuned_base_speed() {
        let dimensions = WorldDimensions::default();
        let plan = LevelGenerator::new(dimensions).generate_seeded(4, 2);
        let tuning = BehaviorTuning {
            base_speed: 55.0,
            ..BehaviorTuning::default()
        };
        let mut session = Session::with_tuning(dimensions, 4, tuning);
        session.start(plan);

        let bodies = query::enemy_bodies(&session.world);
        assert!(!bodies.is_empty());
        for body in bodies {
            assert!((body.velocity.length() - 55.0).abs() < 1e-3);
        }
        for enemy in session.behavior.enemies() {
            assert!((enemy.speed() - 55.0).abs() < 1e-6);
        }
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let (mut first, _) = started(99);
        let (mut second, _) = started(99);
        assert_eq!(first.run(240, FRAME), second.run(240, FRAME));
        assert_eq!(
            query::enemy_bodies(&first.world),
            query::enemy_bodies(&second.world)
        );
        assert_eq!(query::player(&first.world), query::player(&second.world));
    }

    #[test]
    fn clearing_a_level_starts_the_next_one() {
        let (mut session, _) = started(3);
        let despawns = query::enemy_bodies(&session.world)
            .iter()
            .map(|body| Command::DespawnEnemy { enemy: body.id })
            .collect();
        let events = session.pump(despawns);
        session.settle(events);

        let summary = session.summary();
        assert_eq!(summary.level, 2);
        assert_eq!(summary.levels_cleared, 1);
        assert_eq!(summary.enemies_remaining, enemy_count(2) as usize);
        assert!(!summary.defeated);
    }

    #[test]
    fn summary_reads_naturally() {
        let summary = Summary {
            level: 3,
            levels_cleared: 2,
            frames: 600,
            player_health: None,
            enemies_remaining: 4,
            defeated: true,
        };
        assert_eq!(
            summary.to_string(),
            "level 3 after 600 frames: 2 cleared, 4 enemies left, player health - (defeated)"
        );
    }
}
