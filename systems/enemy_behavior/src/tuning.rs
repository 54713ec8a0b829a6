use std::time::Duration;

/// Every adjustable knob of the enemy state machine.
#[derive(Clone, Debug)]
pub struct BehaviorTuning {
    /// Health of a freshly spawned enemy.
    pub max_health: i32,
    /// Movement speed outside of any escalation.
    pub base_speed: f32,
    /// Distance under which an enemy starts chasing the player.
    pub attack_range: f32,
    /// Damage dealt by a single projectile.
    pub projectile_damage: i32,
    /// Speed an enemy is pushed away from the player with when hit.
    pub knockback_speed: f32,
    /// How long a non-enraged enemy flashes after a hit.
    pub hit_flash: Duration,

    /// Length of the chase sampling window.
    pub chase_window: Duration,
    /// Displacement per window that counts as moving freely while chasing.
    pub chase_moved_threshold: f32,
    /// Frustration added for every window spent blocked.
    pub frustration_step: u32,
    /// Frustration removed for every window spent moving freely.
    pub frustration_decay: u32,
    /// Frustration at which the first warning is emitted.
    pub first_warning: u32,
    /// Frustration at which the final warning is emitted.
    pub final_warning: u32,
    /// Frustration above which the enemy becomes enraged.
    pub enrage_threshold: u32,
    /// Speed multiplier used while escaping an obstacle.
    pub escape_speed_factor: f32,
    /// Maximum angular jitter, in radians, added to the escape heading.
    pub escape_jitter: f32,
    /// Pursuit speed multiplier while enraged.
    pub enraged_speed_factor: f32,
    /// Velocity cap, relative to the current speed, while calm.
    pub max_speed_factor: f32,
    /// Velocity cap, relative to the current speed, while enraged.
    pub enraged_max_speed_factor: f32,
    /// Wall destruction radius on level zero.
    pub wall_break_base_radius: f32,
    /// Growth of the wall destruction radius per level.
    pub wall_break_radius_per_level: f32,
    /// Upper bound of the wall destruction radius.
    pub wall_break_max_radius: f32,

    /// Interval after which a wandering enemy picks a new heading.
    pub wander_interval: Duration,
    /// Length of the wandering stuck-check window.
    pub wander_stuck_window: Duration,
    /// Displacement per stuck-check window below which the enemy counts as stuck.
    pub wander_moved_threshold: f32,

    /// Distance under which a projectile can trigger a dodge.
    pub dodge_detection_radius: f32,
    /// Dodge probability on level zero.
    pub dodge_base_chance: f32,
    /// Growth of the dodge probability per level.
    pub dodge_chance_per_level: f32,
    /// Upper bound of the dodge probability.
    pub dodge_max_chance: f32,
    /// Length of the dodge window.
    pub dodge_duration: Duration,
    /// Cooldown started when a dodge begins.
    pub dodge_cooldown: Duration,
    /// Probability that a finished dodge escalates into a triple berserker.
    pub dodge_success_chance: f32,
    /// Length of the triple berserker window.
    pub triple_berserker_duration: Duration,
    /// Speed multiplier of a triple berserker.
    pub triple_speed_factor: f32,
}

impl BehaviorTuning {
    /// Probability that a nearby projectile makes an enemy dodge on `level`.
    ///
    /// Level `0` is treated as level `1`, here and in [`Self::wall_break_radius`].
    #[must_use]
    pub fn dodge_chance(&self, level: u32) -> f32 {
        (self.dodge_base_chance + level.max(1) as f32 * self.dodge_chance_per_level)
            .min(self.dodge_max_chance)
    }

    /// Radius of wall destruction around an enraged enemy on `level`.
    #[must_use]
    pub fn wall_break_radius(&self, level: u32) -> f32 {
        (self.wall_break_base_radius + level.max(1) as f32 * self.wall_break_radius_per_level)
            .min(self.wall_break_max_radius)
    }
}

impl Default for BehaviorTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            base_speed: 80.0,
            attack_range: 200.0,
            projectile_damage: 50,
            knockback_speed: 200.0,
            hit_flash: Duration::from_millis(100),

            chase_window: Duration::from_millis(300),
            chase_moved_threshold: 10.0,
            frustration_step: 300,
            frustration_decay: 150,
            first_warning: 1_500,
            final_warning: 3_000,
            enrage_threshold: 4_000,
            escape_speed_factor: 1.5,
            escape_jitter: 0.25,
            enraged_speed_factor: 2.0,
            max_speed_factor: 1.2,
            enraged_max_speed_factor: 2.5,
            wall_break_base_radius: 35.0,
            wall_break_radius_per_level: 2.5,
            wall_break_max_radius: 60.0,

            wander_interval: Duration::from_millis(2_000),
            wander_stuck_window: Duration::from_millis(500),
            wander_moved_threshold: 5.0,

            dodge_detection_radius: 100.0,
            dodge_base_chance: 0.2,
            dodge_chance_per_level: 0.05,
            dodge_max_chance: 0.5,
            dodge_duration: Duration::from_millis(3_000),
            dodge_cooldown: Duration::from_millis(3_000),
            dodge_success_chance: 0.6,
            triple_berserker_duration: Duration::from_millis(5_000),
            triple_speed_factor: 3.0,
        }
    }
}
