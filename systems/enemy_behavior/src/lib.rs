#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy state machine driving Maze Rampage opponents.
//!
//! Each enemy wanders until the player comes within attack range, chases
//! while accumulating frustration whenever obstacles block it, enrages and
//! tears down walls once frustration peaks, and may dodge an incoming
//! projectile. A successful dodge escalates into a short triple-speed
//! berserker burst. The system reacts to world events and answers with
//! commands; presentation-only signals are emitted as cues.

mod enemy;
mod tuning;

use std::time::Duration;

use log::debug;
use maze_rampage_core::{ArenaView, Command, Cue, EnemyId, Event, ProjectileId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use enemy::{
    Appearance, BehaviorState, Enemy, HitOutcome, Steering, TickContext, Tickable,
};
pub use tuning::BehaviorTuning;

/// Configuration parameters required to construct the enemy behaviour system.
#[derive(Clone, Debug)]
pub struct Config {
    rng_seed: u64,
    tuning: BehaviorTuning,
}

impl Config {
    /// Creates a configuration with default tuning and the provided seed.
    #[must_use]
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            tuning: BehaviorTuning::default(),
        }
    }

    /// Replaces the tuning knobs.
    #[must_use]
    pub fn with_tuning(mut self, tuning: BehaviorTuning) -> Self {
        self.tuning = tuning;
        self
    }
}

/// Pure system owning the behaviour state of every live enemy.
#[derive(Debug)]
pub struct EnemyBehavior {
    tuning: BehaviorTuning,
    rng: ChaCha8Rng,
    enemies: Vec<Enemy>,
}

impl EnemyBehavior {
    /// Creates the system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tuning: config.tuning,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            enemies: Vec::new(),
        }
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn tuning(&self) -> &BehaviorTuning {
        &self.tuning
    }

    /// Behaviour record of the provided enemy, if it is alive.
    #[must_use]
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id() == id)
    }

    /// Behaviour records of every live enemy in spawn order.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Consumes world events and the arena view to emit commands and cues.
    pub fn handle(
        &mut self,
        events: &[Event],
        view: &ArenaView<'_>,
        out: &mut Vec<Command>,
        cues: &mut Vec<Cue>,
    ) {
        let mut spent: Vec<ProjectileId> = Vec::new();

        for event in events {
            match event {
                Event::LevelStarted { .. } => self.enemies.clear(),
                Event::EnemySpawned { enemy, .. } => {
                    if self.enemy(*enemy).is_none() {
                        self.enemies.push(Enemy::new(*enemy, &self.tuning));
                    }
                }
                Event::EnemyDied { enemy } => self.forget(*enemy),
                Event::ProjectileOverlap { projectile, enemy } => {
                    if spent.contains(projectile) {
                        continue;
                    }
                    if self.resolve_hit(*projectile, *enemy, view, out, cues) {
                        spent.push(*projectile);
                    }
                }
                Event::TimeAdvanced { dt, now } => self.advance(*dt, *now, view, out, cues),
                _ => {}
            }
        }
    }

    fn forget(&mut self, enemy: EnemyId) {
        self.enemies.retain(|candidate| candidate.id() != enemy);
    }

    /// Applies a projectile hit. Returns whether the projectile was consumed.
    fn resolve_hit(
        &mut self,
        projectile: ProjectileId,
        enemy: EnemyId,
        view: &ArenaView<'_>,
        out: &mut Vec<Command>,
        cues: &mut Vec<Cue>,
    ) -> bool {
        let Some(index) = self.enemies.iter().position(|record| record.id() == enemy) else {
            return false;
        };

        match self.enemies[index].take_hit(view.clock, &self.tuning) {
            HitOutcome::Ignored => false,
            HitOutcome::Damaged { health } => {
                out.push(Command::ConsumeProjectile { projectile });
                cues.push(Cue::EnemyHit { enemy });
                debug!("enemy {} hit, {health} health left", enemy.get());

                if let (Some(body), Some(player)) = (view.body(enemy), view.player) {
                    let away = (body.position - player.position).normalize_or_zero();
                    out.push(Command::SteerEnemy {
                        enemy,
                        position: body.position,
                        velocity: away * self.tuning.knockback_speed,
                    });
                }
                true
            }
            HitOutcome::Killed => {
                out.push(Command::ConsumeProjectile { projectile });
                out.push(Command::DespawnEnemy { enemy });
                cues.push(Cue::EnemyHit { enemy });
                let _ = self.enemies.remove(index);
                debug!("enemy {} killed", enemy.get());
                true
            }
        }
    }

    fn advance(
        &mut self,
        dt: Duration,
        now: Duration,
        view: &ArenaView<'_>,
        out: &mut Vec<Command>,
        cues: &mut Vec<Cue>,
    ) {
        let Self {
            tuning,
            rng,
            enemies,
        } = self;

        for enemy in enemies.iter_mut() {
            let Some(body) = view.body(enemy.id()).copied() else {
                continue;
            };

            let mut ctx = TickContext {
                tuning: &*tuning,
                level: view.level,
                now,
                bounds: view.bounds,
                body,
                player: view.player,
                projectiles: view.projectiles,
                rng: &mut *rng,
                commands: &mut *out,
                cues: &mut *cues,
            };

            if let Some(steering) = enemy.update(dt, &mut ctx) {
                out.push(Command::SteerEnemy {
                    enemy: enemy.id(),
                    position: steering.position,
                    velocity: steering.velocity,
                });
            }
        }
    }
}
