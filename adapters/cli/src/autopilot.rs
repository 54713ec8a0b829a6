//! Headless stand-in for player input.

use maze_rampage_core::{ArenaView, Command, Vec2};

const STRAFE_SPEED: f32 = 160.0;
const STRAFE_DEADZONE: f32 = 4.0;

/// Strafes underneath the horizontally closest enemy and keeps firing.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Autopilot {
    speed: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            speed: STRAFE_SPEED,
        }
    }
}

impl Autopilot {
    /// Player commands for the upcoming frame.
    pub(crate) fn steer(&self, view: &ArenaView<'_>) -> Vec<Command> {
        let Some(player) = view.player.filter(|player| player.active) else {
            return Vec::new();
        };

        let offset = |x: f32| (x - player.position.x).abs();
        let target = view
            .bodies
            .iter()
            .min_by(|a, b| offset(a.position.x).total_cmp(&offset(b.position.x)));

        let Some(target) = target else {
            return vec![Command::SetPlayerVelocity {
                velocity: Vec2::ZERO,
            }];
        };

        let dx = target.position.x - player.position.x;
        let velocity = if dx.abs() < STRAFE_DEADZONE {
            Vec2::ZERO
        } else {
            Vec2::new(dx.signum() * self.speed, 0.0)
        };
        vec![
            Command::SetPlayerVelocity { velocity },
            Command::FireProjectile,
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use maze_rampage_core::{BlockedSides, Bounds, EnemyBody, EnemyId, PlayerSnapshot};

    fn view<'a>(bodies: &'a [EnemyBody], player: Option<PlayerSnapshot>) -> ArenaView<'a> {
        ArenaView {
            level: 1,
            clock: Duration::ZERO,
            bounds: Bounds::new(Vec2::ZERO, Vec2::new(800.0, 600.0)),
            player,
            bodies,
            projectiles: &[],
        }
    }

    fn player(x: f32, active: bool) -> Option<PlayerSnapshot> {
        Some(PlayerSnapshot {
            position: Vec2::new(x, 500.0),
            velocity: Vec2::ZERO,
            health: 100,
            active,
        })
    }

    fn enemy(id: u32, x: f32) -> EnemyBody {
        EnemyBody {
            id: EnemyId::new(id),
            position: Vec2::new(x, 100.0),
            velocity: Vec2::ZERO,
            blocked: BlockedSides::NONE,
        }
    }

    #[test]
    fn strafes_toward_the_horizontally_closest_enemy_and_fires() {
        let bodies = [enemy(0, 100.0), enemy(1, 460.0), enemy(2, 700.0)];
        let commands = Autopilot::default().steer(&view(&bodies, player(400.0, true)));
        assert_eq!(
            commands,
            vec![
                Command::SetPlayerVelocity {
                    velocity: Vec2::new(160.0, 0.0)
                },
                Command::FireProjectile,
            ]
        );
    }

    #[test]
    fn holds_still_when_lined_up() {
        let bodies = [enemy(0, 402.0)];
        let commands = Autopilot::default().steer(&view(&bodies, player(400.0, true)));
        assert_eq!(
            commands[0],
            Command::SetPlayerVelocity {
                velocity: Vec2::ZERO
            }
        );
    }

    #[test]
    fn idles_without_targets_or_player() {
        let autopilot = Autopilot::default();
        assert_eq!(
            autopilot.steer(&view(&[], player(400.0, true))),
            vec![Command::SetPlayerVelocity {
                velocity: Vec2::ZERO
            }]
        );
        assert!(autopilot
            .steer(&view(&[enemy(0, 10.0)], player(400.0, false)))
            .is_empty());
        assert!(autopilot.steer(&view(&[enemy(0, 10.0)], None)).is_empty());
    }
}
