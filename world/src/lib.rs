#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Rampage.
//!
//! The world owns the maze geometry, the player, enemy bodies, projectiles,
//! and the global time scale. It never decides how enemies behave: systems
//! read its views and answer with commands that [`apply`] executes.

mod physics;

use std::time::Duration;

use log::{debug, trace};
use maze_rampage_core::{
    BlockedSides, Bounds, CellCoord, Command, EnemyBody, EnemyId, Event, LevelPlan,
    PlayerSnapshot, PortalPair, Projectile, ProjectileId, SpawnLayout, Tile, TileGrid,
    TimeScale, Vec2, WorldDimensions,
};

use crate::physics::{box_hits_wall, boxes_overlap, step};

const PLAYER_MAX_HEALTH: i32 = 100;
const PLAYER_HALF_EXTENT: f32 = 12.0;
const ENEMY_HALF_EXTENT: f32 = 12.0;
const PROJECTILE_HALF_EXTENT: f32 = 4.0;

const CONTACT_DAMAGE: i32 = 10;

const FIRE_COOLDOWN: Duration = Duration::from_millis(300);
const PROJECTILE_LIFETIME: Duration = Duration::from_millis(1_500);
const PROJECTILE_LAUNCH_OFFSET: f32 = 20.0;
const PROJECTILE_SPEED: f32 = 600.0;

const PORTAL_RADIUS: f32 = 20.0;
const PORTAL_COOLDOWN: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
struct Player {
    position: Vec2,
    velocity: Vec2,
    health: i32,
    active: bool,
    fire_ready_at: Duration,
    portal_ready_at: Duration,
}

impl Player {
    fn spawn(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            health: PLAYER_MAX_HEALTH,
            active: true,
            fire_ready_at: Duration::ZERO,
            portal_ready_at: Duration::ZERO,
        }
    }

    fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            velocity: self.velocity,
            health: self.health,
            active: self.active,
        }
    }
}

/// Represents the authoritative Maze Rampage world state.
#[derive(Debug)]
pub struct World {
    bounds: Bounds,
    level: u32,
    grid: TileGrid,
    portals: Vec<PortalPair>,
    clock: Duration,
    player: Option<Player>,
    enemies: Vec<EnemyBody>,
    projectiles: Vec<Projectile>,
    projectile_expiry: Vec<Duration>,
    next_enemy_id: u32,
    next_projectile_id: u32,
    slow_motion_owner: Option<EnemyId>,
}

impl World {
    /// Creates an empty arena sized for the provided playfield.
    #[must_use]
    pub fn new(dimensions: WorldDimensions) -> Self {
        Self {
            bounds: dimensions.bounds(),
            level: 0,
            grid: TileGrid::bordered(
                dimensions.columns(),
                dimensions.rows(),
                dimensions.tile_length(),
            ),
            portals: Vec::new(),
            clock: Duration::ZERO,
            player: None,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            projectile_expiry: Vec::new(),
            next_enemy_id: 0,
            next_projectile_id: 0,
            slow_motion_owner: None,
        }
    }

    fn time_scale(&self) -> TimeScale {
        if self.slow_motion_owner.is_some() {
            TimeScale::Slowed
        } else {
            TimeScale::Normal
        }
    }

    fn start_level(&mut self, plan: LevelPlan, out_events: &mut Vec<Event>) {
        let LevelPlan {
            grid,
            portals,
            enemy_count,
            level,
            ..
        } = plan;

        let level = level.max(1);
        let tile = grid.tile_length();
        self.bounds = Bounds::new(
            Vec2::ZERO,
            Vec2::new(grid.columns() as f32 * tile, grid.rows() as f32 * tile),
        );
        let spawn = SpawnLayout::for_grid(grid.columns(), grid.rows())
            .player()
            .map_or_else(
                || (self.bounds.min() + self.bounds.max()) * 0.5,
                |cell| grid.cell_center(cell),
            );

        self.grid = grid;
        self.portals = portals;
        self.level = level;
        self.clock = Duration::ZERO;
        self.player = Some(Player::spawn(spawn));
        self.enemies.clear();
        self.projectiles.clear();
        self.projectile_expiry.clear();
        self.slow_motion_owner = None;

        debug!("level {level} started with {enemy_count} enemies");
        out_events.push(Event::LevelStarted { level, enemy_count });
    }

    fn spawn_enemy(&mut self, position: Vec2, velocity: Vec2, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        let position = self.bounds.clamp(position, ENEMY_HALF_EXTENT);
        self.enemies.push(EnemyBody {
            id,
            position,
            velocity,
            blocked: BlockedSides::NONE,
        });
        out_events.push(Event::EnemySpawned {
            enemy: id,
            position,
        });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced {
            dt,
            now: self.clock,
        });

        let seconds = dt.as_secs_f32() / self.time_scale().divisor();
        self.move_player(seconds, out_events);
        self.move_enemies(seconds);
        self.move_projectiles(seconds);
        self.detect_projectile_overlaps(out_events);
        self.resolve_contact_damage(out_events);
    }

    fn move_player(&mut self, seconds: f32, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut().filter(|player| player.active) else {
            return;
        };

        let motion = step(
            &self.grid,
            self.bounds,
            player.position,
            player.velocity,
            PLAYER_HALF_EXTENT,
            seconds,
        );
        player.position = motion.position;

        if self.clock < player.portal_ready_at {
            return;
        }
        let exit = self
            .portals
            .iter()
            .find_map(|portal| portal.exit_for(player.position, PORTAL_RADIUS));
        if let Some(to) = exit {
            let from = player.position;
            player.position = to;
            player.portal_ready_at = self.clock.saturating_add(PORTAL_COOLDOWN);
            debug!("player teleported from {from} to {to}");
            out_events.push(Event::PlayerTeleported { from, to });
        }
    }

    fn move_enemies(&mut self, seconds: f32) {
        for body in &mut self.enemies {
            let motion = step(
                &self.grid,
                self.bounds,
                body.position,
                body.velocity,
                ENEMY_HALF_EXTENT,
                seconds,
            );
            body.position = motion.position;
            body.blocked = motion.blocked;
        }
    }

    fn move_projectiles(&mut self, seconds: f32) {
        let mut index = 0;
        while index < self.projectiles.len() {
            let projectile = &mut self.projectiles[index];
            projectile.position += projectile.velocity * seconds;

            let expired = self.clock >= self.projectile_expiry[index];
            let escaped = !self.bounds.contains(projectile.position);
            let struck = box_hits_wall(&self.grid, projectile.position, PROJECTILE_HALF_EXTENT);
            if expired || escaped || struck {
                trace!("projectile {} removed", projectile.id.get());
                self.remove_projectile(index);
            } else {
                index += 1;
            }
        }
    }

    fn detect_projectile_overlaps(&self, out_events: &mut Vec<Event>) {
        for projectile in self.projectiles.iter().filter(|projectile| projectile.active) {
            for body in &self.enemies {
                if boxes_overlap(
                    projectile.position,
                    PROJECTILE_HALF_EXTENT,
                    body.position,
                    ENEMY_HALF_EXTENT,
                ) {
                    out_events.push(Event::ProjectileOverlap {
                        projectile: projectile.id,
                        enemy: body.id,
                    });
                }
            }
        }
    }

    fn resolve_contact_damage(&mut self, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut().filter(|player| player.active) else {
            return;
        };

        let touched = self.enemies.iter().any(|body| {
            boxes_overlap(
                body.position,
                ENEMY_HALF_EXTENT,
                player.position,
                PLAYER_HALF_EXTENT,
            )
        });
        if !touched {
            return;
        }

        player.health = player.health.saturating_sub(CONTACT_DAMAGE);
        out_events.push(Event::PlayerHit {
            health: player.health,
        });
        if player.health <= 0 {
            player.active = false;
            player.velocity = Vec2::ZERO;
            debug!("player defeated on level {}", self.level);
            out_events.push(Event::PlayerDefeated);
        }
    }

    fn fire_projectile(&mut self, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut().filter(|player| player.active) else {
            debug!("ignoring fire request without an active player");
            return;
        };
        if self.clock < player.fire_ready_at {
            return;
        }
        player.fire_ready_at = self.clock.saturating_add(FIRE_COOLDOWN);

        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        let position = player.position - Vec2::new(0.0, PROJECTILE_LAUNCH_OFFSET);
        self.projectiles.push(Projectile {
            id,
            position,
            velocity: Vec2::new(0.0, -PROJECTILE_SPEED),
            active: true,
        });
        self.projectile_expiry
            .push(self.clock.saturating_add(PROJECTILE_LIFETIME));
        out_events.push(Event::ProjectileFired {
            projectile: id,
            position,
        });
    }

    fn remove_projectile(&mut self, index: usize) {
        let _ = self.projectiles.remove(index);
        let _ = self.projectile_expiry.remove(index);
    }

    fn destroy_walls(
        &mut self,
        enemy: EnemyId,
        center: Vec2,
        radius: f32,
        out_events: &mut Vec<Event>,
    ) {
        if !self.enemies.iter().any(|body| body.id == enemy) {
            debug!("ignoring wall destruction by unknown enemy {}", enemy.get());
            return;
        }

        let cells: Vec<CellCoord> = self
            .grid
            .cells()
            .filter(|(cell, tile)| {
                *tile == Tile::Wall
                    && !self.grid.is_border(*cell)
                    && self.grid.cell_center(*cell).distance(center) < radius
            })
            .map(|(cell, _)| cell)
            .collect();
        if cells.is_empty() {
            return;
        }

        for &cell in &cells {
            self.grid.set(cell, Tile::Empty);
        }
        debug!("enemy {} destroyed {} walls", enemy.get(), cells.len());
        out_events.push(Event::WallsDestroyed { enemy, cells });
    }

    fn despawn_enemy(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(index) = self.enemies.iter().position(|body| body.id == enemy) else {
            debug!("ignoring despawn of unknown enemy {}", enemy.get());
            return;
        };
        let _ = self.enemies.remove(index);
        out_events.push(Event::EnemyDied { enemy });

        if self.slow_motion_owner == Some(enemy) {
            self.release_slow_motion(out_events);
        }

        if self.enemies.is_empty() {
            debug!("level {} cleared", self.level);
            out_events.push(Event::LevelCleared { level: self.level });
        }
    }

    fn begin_slow_motion(&mut self, owner: EnemyId, out_events: &mut Vec<Event>) {
        if let Some(current) = self.slow_motion_owner {
            debug!(
                "enemy {} asked for slow motion held by enemy {}",
                owner.get(),
                current.get()
            );
            return;
        }
        if !self.enemies.iter().any(|body| body.id == owner) {
            return;
        }

        self.slow_motion_owner = Some(owner);
        out_events.push(Event::TimeScaleChanged {
            scale: TimeScale::Slowed,
            owner: Some(owner),
        });
    }

    fn release_slow_motion(&mut self, out_events: &mut Vec<Event>) {
        self.slow_motion_owner = None;
        out_events.push(Event::TimeScaleChanged {
            scale: TimeScale::Normal,
            owner: None,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldDimensions::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartLevel { plan } => world.start_level(plan, out_events),
        Command::SpawnEnemy { position, velocity } => {
            world.spawn_enemy(position, velocity, out_events);
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SetPlayerVelocity { velocity } => {
            if let Some(player) = world.player.as_mut().filter(|player| player.active) {
                player.velocity = velocity;
            }
        }
        Command::FireProjectile => world.fire_projectile(out_events),
        Command::SteerEnemy {
            enemy,
            position,
            velocity,
        } => {
            if let Some(body) = world.enemies.iter_mut().find(|body| body.id == enemy) {
                body.position = position;
                body.velocity = velocity;
            } else {
                debug!("ignoring steering of unknown enemy {}", enemy.get());
            }
        }
        Command::DestroyWalls {
            enemy,
            center,
            radius,
        } => world.destroy_walls(enemy, center, radius, out_events),
        Command::ConsumeProjectile { projectile } => {
            if let Some(index) = world
                .projectiles
                .iter()
                .position(|candidate| candidate.id == projectile)
            {
                world.remove_projectile(index);
            }
        }
        Command::DespawnEnemy { enemy } => world.despawn_enemy(enemy, out_events),
        Command::BeginSlowMotion { owner } => world.begin_slow_motion(owner, out_events),
        Command::EndSlowMotion { owner } => {
            if world.slow_motion_owner == Some(owner) {
                world.release_slow_motion(out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use maze_rampage_core::{
        ArenaView, Bounds, EnemyBody, EnemyId, PlayerSnapshot, PortalPair, Projectile,
        TileGrid, TimeScale,
    };

    /// Captures the read-only arena view systems consume each frame.
    #[must_use]
    pub fn arena_view(world: &World) -> ArenaView<'_> {
        ArenaView {
            level: world.level,
            clock: world.clock,
            bounds: world.bounds,
            player: player(world),
            bodies: &world.enemies,
            projectiles: &world.projectiles,
        }
    }

    /// Provides read-only access to the maze geometry.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.grid
    }

    /// Portal pairs of the running level.
    #[must_use]
    pub fn portals(world: &World) -> &[PortalPair] {
        &world.portals
    }

    /// Snapshot of the player, if one has been placed.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        world.player.as_ref().map(super::Player::snapshot)
    }

    /// Enemy bodies in spawn order.
    #[must_use]
    pub fn enemy_bodies(world: &World) -> &[EnemyBody] {
        &world.enemies
    }

    /// Live projectiles in launch order.
    #[must_use]
    pub fn projectiles(world: &World) -> &[Projectile] {
        &world.projectiles
    }

    /// Physics rate currently in effect.
    #[must_use]
    pub fn time_scale(world: &World) -> TimeScale {
        world.time_scale()
    }

    /// Enemy holding the slow motion token, if any.
    #[must_use]
    pub fn slow_motion_owner(world: &World) -> Option<EnemyId> {
        world.slow_motion_owner
    }

    /// One-based index of the running level, or zero before the first level.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Simulation clock measured from the start of the level.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Playable rectangle.
    #[must_use]
    pub fn bounds(world: &World) -> Bounds {
        world.bounds
    }
}
