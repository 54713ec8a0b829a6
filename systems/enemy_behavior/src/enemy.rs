use std::{
    f32::consts::{FRAC_PI_2, PI, TAU},
    time::Duration,
};

use log::{debug, trace};
use maze_rampage_core::{
    BerserkerLevel, BlockedSides, Bounds, Command, Cue, EnemyBody, EnemyId, PlayerSnapshot,
    Projectile, Vec2, BOUNDS_MARGIN,
};
use rand::{Rng, RngCore};

use crate::BehaviorTuning;

const BASE_SCALE: f32 = 0.05;
const ENRAGED_SCALE: f32 = 0.07;
const TRIPLE_SCALE: f32 = 0.09;
const CROUCH_SCALE: Vec2 = Vec2::new(0.05, 0.025);

const ENRAGED_TINT: u32 = 0xff_66_66;
const TRIPLE_TINT: u32 = 0xff_00_00;
const DODGE_TINT: u32 = 0xff_ff_33;
const HIT_TINT: u32 = 0xff_ff_ff;

/// Everything an enemy may read or emit while it is updated.
///
/// Replaces any scene-global state: level, geometry bounds, clock, the
/// enemy's own body, shared player/projectile views, a randomness source,
/// and sinks for world commands and presentation cues.
pub struct TickContext<'a> {
    /// Tuning knobs shared by every enemy.
    pub tuning: &'a BehaviorTuning,
    /// One-based level index.
    pub level: u32,
    /// Simulation clock after the tick.
    pub now: Duration,
    /// Playable rectangle.
    pub bounds: Bounds,
    /// Physics state of the updated enemy.
    pub body: EnemyBody,
    /// The player, if one exists.
    pub player: Option<PlayerSnapshot>,
    /// Projectiles considered for dodging.
    pub projectiles: &'a [Projectile],
    /// Source of every random decision.
    pub rng: &'a mut dyn RngCore,
    /// Sink for world mutations such as wall destruction and slow motion.
    pub commands: &'a mut Vec<Command>,
    /// Sink for presentation cues.
    pub cues: &'a mut Vec<Cue>,
}

/// Position and velocity an enemy wants applied after a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Steering {
    /// Position clamped to the playable bounds.
    pub position: Vec2,
    /// Requested velocity.
    pub velocity: Vec2,
}

/// Entities advanced once per simulation tick.
pub trait Tickable {
    /// Advances the entity by `dt` of real time. Returns `None` when the tick was a no-op.
    fn update(&mut self, dt: Duration, ctx: &mut TickContext<'_>) -> Option<Steering>;
}

/// Coarse behaviour state, derived from the enemy's flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BehaviorState {
    /// Roaming with random headings.
    Wandering,
    /// Pursuing the player.
    Chasing,
    /// Pursuing the player while frustrated by obstacles.
    ChasingStuck,
    /// Raging after a long time blocked.
    Enraged,
    /// Crouching under a projectile.
    Dodging,
    /// Raging at triple speed after a successful dodge.
    BerserkerX3,
}

/// Result of a projectile striking an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// The enemy was dodging; nothing happened.
    Ignored,
    /// The enemy survived with the remaining health.
    Damaged {
        /// Health after the hit.
        health: i32,
    },
    /// The enemy ran out of health.
    Killed,
}

/// Presentation projection of an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    /// Packed `0xRRGGBB` tint, if any.
    pub tint: Option<u32>,
    /// Horizontal and vertical sprite scale.
    pub scale: Vec2,
}

#[derive(Clone, Copy, Debug, Default)]
struct DodgeState {
    until: Option<Duration>,
    used: bool,
    cooldown: Duration,
}

/// Tracks displacement over a fixed sampling window.
#[derive(Clone, Copy, Debug, Default)]
struct MotionProbe {
    anchor: Option<Vec2>,
    elapsed: Duration,
}

impl MotionProbe {
    /// Returns the displacement since the last sample once more than `window` elapsed.
    fn sample(&mut self, position: Vec2, dt: Duration, window: Duration) -> Option<Vec2> {
        let anchor = *self.anchor.get_or_insert(position);
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed <= window {
            return None;
        }
        self.anchor = Some(position);
        self.elapsed = Duration::ZERO;
        Some(position - anchor)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Per-enemy behaviour record.
#[derive(Clone, Debug)]
pub struct Enemy {
    id: EnemyId,
    health: i32,
    base_speed: f32,
    speed: f32,
    chasing: bool,
    frustration: u32,
    enraged: bool,
    berserker_level: BerserkerLevel,
    berserker_expires_at: Option<Duration>,
    dodge: DodgeState,
    hit_flash_until: Option<Duration>,
    wander_clock: Duration,
    wander_probe: MotionProbe,
    chase_probe: MotionProbe,
}

impl Enemy {
    /// Creates a calm, wandering enemy.
    #[must_use]
    pub fn new(id: EnemyId, tuning: &BehaviorTuning) -> Self {
        Self {
            id,
            health: tuning.max_health,
            base_speed: tuning.base_speed,
            speed: tuning.base_speed,
            chasing: false,
            frustration: 0,
            enraged: false,
            berserker_level: BerserkerLevel::Normal,
            berserker_expires_at: None,
            dodge: DodgeState::default(),
            hit_flash_until: None,
            wander_clock: Duration::ZERO,
            wander_probe: MotionProbe::default(),
            chase_probe: MotionProbe::default(),
        }
    }

    /// Identifier of the enemy.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Speed the enemy moves with before situational multipliers.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Speed outside of any escalation.
    #[must_use]
    pub const fn base_speed(&self) -> f32 {
        self.base_speed
    }

    /// Whether the player is within attack range.
    #[must_use]
    pub const fn is_chasing(&self) -> bool {
        self.chasing
    }

    /// Accumulated frustration in millisecond-equivalents.
    #[must_use]
    pub const fn frustration(&self) -> u32 {
        self.frustration
    }

    /// Whether any berserker tier is active.
    #[must_use]
    pub const fn is_enraged(&self) -> bool {
        self.enraged
    }

    /// Active berserker tier.
    #[must_use]
    pub const fn berserker_level(&self) -> BerserkerLevel {
        self.berserker_level
    }

    /// Whether a dodge window is open.
    #[must_use]
    pub const fn is_dodging(&self) -> bool {
        self.dodge.until.is_some()
    }

    /// Whether the single dodge of this enemy's lifetime was spent.
    #[must_use]
    pub const fn has_used_dodge(&self) -> bool {
        self.dodge.used
    }

    /// Time left before another dodge may start.
    #[must_use]
    pub const fn dodge_cooldown(&self) -> Duration {
        self.dodge.cooldown
    }

    /// Coarse state for logging and presentation.
    #[must_use]
    pub fn state(&self) -> BehaviorState {
        if self.is_dodging() {
            BehaviorState::Dodging
        } else if self.enraged && self.berserker_level == BerserkerLevel::Triple {
            BehaviorState::BerserkerX3
        } else if self.enraged {
            BehaviorState::Enraged
        } else if self.chasing && self.frustration > 0 {
            BehaviorState::ChasingStuck
        } else if self.chasing {
            BehaviorState::Chasing
        } else {
            BehaviorState::Wandering
        }
    }

    /// Tint and scale the presentation layer should draw at `now`.
    #[must_use]
    pub fn appearance(&self, now: Duration) -> Appearance {
        let flashing = self.hit_flash_until.map_or(false, |until| now < until);
        match self.state() {
            BehaviorState::Dodging => Appearance {
                tint: Some(DODGE_TINT),
                scale: CROUCH_SCALE,
            },
            BehaviorState::BerserkerX3 => Appearance {
                tint: Some(TRIPLE_TINT),
                scale: Vec2::splat(TRIPLE_SCALE),
            },
            BehaviorState::Enraged => Appearance {
                tint: Some(ENRAGED_TINT),
                scale: Vec2::splat(ENRAGED_SCALE),
            },
            _ => Appearance {
                tint: flashing.then_some(HIT_TINT),
                scale: Vec2::splat(BASE_SCALE),
            },
        }
    }

    /// Applies a projectile hit at `now`. Dodging enemies are untouchable.
    pub fn take_hit(&mut self, now: Duration, tuning: &BehaviorTuning) -> HitOutcome {
        if self.is_dodging() {
            return HitOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(tuning.projectile_damage);
        if !self.enraged {
            self.hit_flash_until = Some(now.saturating_add(tuning.hit_flash));
        }

        if self.health <= 0 {
            HitOutcome::Killed
        } else {
            HitOutcome::Damaged {
                health: self.health,
            }
        }
    }

    fn expire_timers(&mut self, ctx: &mut TickContext<'_>) {
        if self.dodge.until.map_or(false, |until| ctx.now >= until) {
            self.finish_dodge(ctx);
        }
        if self.berserker_expires_at.map_or(false, |at| ctx.now >= at) {
            self.calm_down(ctx.cues);
        }
        if self.hit_flash_until.map_or(false, |until| ctx.now >= until) {
            self.hit_flash_until = None;
        }
    }

    fn try_dodge(&mut self, position: Vec2, ctx: &mut TickContext<'_>) {
        if self.is_dodging() || !self.dodge.cooldown.is_zero() || self.dodge.used {
            return;
        }

        let radius = ctx.tuning.dodge_detection_radius;
        let threatened = ctx
            .projectiles
            .iter()
            .any(|projectile| projectile.active && projectile.position.distance(position) < radius);
        if !threatened {
            return;
        }

        if ctx.rng.gen::<f32>() >= ctx.tuning.dodge_chance(ctx.level) {
            return;
        }

        self.dodge = DodgeState {
            until: Some(ctx.now.saturating_add(ctx.tuning.dodge_duration)),
            used: true,
            cooldown: ctx.tuning.dodge_cooldown,
        };
        ctx.commands.push(Command::BeginSlowMotion { owner: self.id });
        ctx.cues.push(Cue::DodgeStarted { enemy: self.id });
        debug!("enemy {} dodging at {:?}", self.id.get(), ctx.now);
    }

    fn finish_dodge(&mut self, ctx: &mut TickContext<'_>) {
        self.dodge.until = None;
        ctx.commands.push(Command::EndSlowMotion { owner: self.id });

        let success = ctx.rng.gen::<f32>() < ctx.tuning.dodge_success_chance;
        ctx.cues.push(Cue::DodgeEnded {
            enemy: self.id,
            success,
        });
        debug!(
            "enemy {} finished dodging (success: {success})",
            self.id.get()
        );

        if success {
            self.enraged = true;
            self.berserker_level = BerserkerLevel::Triple;
            self.speed = self.base_speed * ctx.tuning.triple_speed_factor;
            self.berserker_expires_at =
                Some(ctx.now.saturating_add(ctx.tuning.triple_berserker_duration));
            ctx.cues.push(Cue::BerserkerEntered {
                enemy: self.id,
                level: BerserkerLevel::Triple,
            });
        }
    }

    fn enrage(&mut self, cues: &mut Vec<Cue>) {
        if self.enraged {
            return;
        }
        self.enraged = true;
        self.berserker_level = BerserkerLevel::Normal;
        cues.push(Cue::BerserkerEntered {
            enemy: self.id,
            level: BerserkerLevel::Normal,
        });
        debug!(
            "enemy {} enraged at frustration {}",
            self.id.get(),
            self.frustration
        );
    }

    fn calm_down(&mut self, cues: &mut Vec<Cue>) {
        if !self.enraged && self.berserker_expires_at.is_none() {
            return;
        }
        self.enraged = false;
        self.berserker_level = BerserkerLevel::Normal;
        self.berserker_expires_at = None;
        self.speed = self.base_speed;
        cues.push(Cue::BerserkerExited { enemy: self.id });
        debug!("enemy {} calmed down", self.id.get());
    }

    fn raise_frustration(&mut self, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let before = self.frustration;
        let ceiling = tuning.enrage_threshold.saturating_add(tuning.frustration_step);
        self.frustration = before.saturating_add(tuning.frustration_step).min(ceiling);

        let crossed = |mark: u32| before < mark && self.frustration >= mark;
        if crossed(tuning.first_warning) {
            ctx.cues.push(Cue::FrustrationWarning { enemy: self.id });
        }
        if crossed(tuning.final_warning) {
            ctx.cues.push(Cue::FinalWarning { enemy: self.id });
        }
        if self.frustration > tuning.enrage_threshold {
            self.enrage(ctx.cues);
        }
    }

    fn chase(
        &mut self,
        dt: Duration,
        position: Vec2,
        velocity: Vec2,
        target: Vec2,
        ctx: &mut TickContext<'_>,
    ) -> Vec2 {
        let tuning = ctx.tuning;
        let velocity = match self.chase_probe.sample(position, dt, tuning.chase_window) {
            None => toward(position, target, self.pursuit_speed(tuning)),
            Some(_) if ctx.body.blocked.any() => {
                self.raise_frustration(ctx);
                if self.enraged {
                    ctx.commands.push(Command::DestroyWalls {
                        enemy: self.id,
                        center: position,
                        radius: tuning.wall_break_radius(ctx.level),
                    });
                    toward(
                        position,
                        target,
                        self.speed * tuning.enraged_speed_factor,
                    )
                } else {
                    let jitter = (ctx.rng.gen::<f32>() - 0.5) * 2.0 * tuning.escape_jitter;
                    let heading = escape_angle(ctx.body.blocked) + jitter;
                    Vec2::from_angle(heading) * self.speed * tuning.escape_speed_factor
                }
            }
            Some(displacement) if displacement.abs().max_element() >= tuning.chase_moved_threshold => {
                self.frustration = self.frustration.saturating_sub(tuning.frustration_decay);
                toward(position, target, self.pursuit_speed(tuning))
            }
            Some(_) => velocity,
        };

        let cap = if self.enraged {
            tuning.enraged_max_speed_factor
        } else {
            tuning.max_speed_factor
        };
        velocity.clamp_length_max(self.speed * cap)
    }

    fn wander(
        &mut self,
        dt: Duration,
        position: Vec2,
        velocity: Vec2,
        ctx: &mut TickContext<'_>,
    ) -> Vec2 {
        let tuning = ctx.tuning;
        self.frustration = 0;
        self.calm_down(ctx.cues);

        let mut velocity = velocity;
        if let Some(displacement) =
            self.wander_probe
                .sample(position, dt, tuning.wander_stuck_window)
        {
            if displacement.abs().max_element() < tuning.wander_moved_threshold {
                velocity = self.random_heading(ctx.rng);
            }
        }

        self.wander_clock = self.wander_clock.saturating_add(dt);
        if self.wander_clock > tuning.wander_interval {
            velocity = self.random_heading(ctx.rng);
            self.wander_clock = Duration::ZERO;
        }
        velocity
    }

    fn pursuit_speed(&self, tuning: &BehaviorTuning) -> f32 {
        if self.enraged {
            self.speed * tuning.enraged_speed_factor
        } else {
            self.speed
        }
    }

    fn random_heading(&self, rng: &mut dyn RngCore) -> Vec2 {
        Vec2::from_angle(rng.gen::<f32>() * TAU) * self.speed
    }
}

impl Tickable for Enemy {
    fn update(&mut self, dt: Duration, ctx: &mut TickContext<'_>) -> Option<Steering> {
        self.expire_timers(ctx);

        let player = ctx.player.filter(|player| player.active)?;
        let position = ctx.bounds.clamp(ctx.body.position, BOUNDS_MARGIN);

        self.try_dodge(position, ctx);
        self.dodge.cooldown = self.dodge.cooldown.saturating_sub(dt);

        if self.is_dodging() {
            return Some(Steering {
                position,
                velocity: Vec2::ZERO,
            });
        }

        let should_chase = position.distance(player.position) < ctx.tuning.attack_range;
        if should_chase != self.chasing {
            self.chasing = should_chase;
            self.chase_probe.reset();
            self.wander_probe.reset();
            self.wander_clock = Duration::ZERO;
            trace!(
                "enemy {} {}",
                self.id.get(),
                if should_chase { "starts chasing" } else { "lost the player" }
            );
        }

        let velocity = if should_chase {
            self.chase(dt, position, ctx.body.velocity, player.position, ctx)
        } else {
            self.wander(dt, position, ctx.body.velocity, ctx)
        };

        Some(Steering { position, velocity })
    }
}

fn toward(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    (to - from).normalize_or_zero() * speed
}

/// Heading away from the first blocked side, checked left, right, up, down.
fn escape_angle(blocked: BlockedSides) -> f32 {
    if blocked.left {
        0.0
    } else if blocked.right {
        PI
    } else if blocked.up {
        FRAC_PI_2
    } else if blocked.down {
        -FRAC_PI_2
    } else {
        0.0
    }
}
