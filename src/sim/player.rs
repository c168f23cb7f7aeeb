//! Kinematic player body
//!
//! Axis-aligned kinematics only: walk/sprint on the ground plane, a single
//! edge-triggered jump, constant gravity, clamped side walls.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::clamp_planar_speed;
use super::tick::TickInput;
use crate::consts::*;
use crate::{horizontal, kmh_to_units, units_to_kmh};

/// Sprint multiplier after holding the sprint control for `held` seconds.
///
/// Doubles every [`SPRINT_RAMP_SECONDS`], starting at 2x. Unbounded; the
/// overall speed cap is what keeps the player on screen.
#[inline]
pub fn sprint_ramp(held: f32) -> f32 {
    2f32.powf(1.0 + held / SPRINT_RAMP_SECONDS)
}

/// The player's body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Seconds the sprint control has been held without interruption
    pub sprint_time: f32,
    /// Sprint control held during the last update
    pub sprinting: bool,
    /// Fell out of the world; frozen until the respawn timer runs out
    pub dead: bool,
    /// Seconds left until the automatic respawn
    pub respawn_timer: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            sprint_time: 0.0,
            sprinting: false,
            dead: false,
            respawn_timer: 0.0,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current sprint multiplier (1 when not sprinting)
    pub fn sprint_multiplier(&self) -> f32 {
        if self.sprinting {
            sprint_ramp(self.sprint_time)
        } else {
            1.0
        }
    }

    /// Standing on the floor
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.pos.y <= GROUND_EPSILON
    }

    /// Horizontal speed in sim units per second
    pub fn planar_speed(&self) -> f32 {
        horizontal(self.vel).length()
    }

    /// Horizontal speed in km/h (HUD and rocket mode)
    pub fn speed_kmh(&self) -> f32 {
        units_to_kmh(self.planar_speed())
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32, input: &TickInput) {
        if self.dead {
            self.respawn_timer -= dt;
            if self.respawn_timer <= 0.0 {
                self.respawn();
            }
            return;
        }

        self.sprinting = input.sprint;
        self.sprint_time = if input.sprint { self.sprint_time + dt } else { 0.0 };

        // The ramp overflows to infinity after ~10 minutes of holding
        let target_speed = (WALK_SPEED * self.sprint_multiplier()).min(f32::MAX);
        let planar = input.move_direction() * target_speed;
        self.vel = clamp_planar_speed(
            Vec3::new(planar.x, self.vel.y, planar.z),
            kmh_to_units(MAX_SPEED_KMH),
        );

        if self.is_grounded() && input.jump {
            self.vel.y = JUMP_SPEED;
        }
        self.vel.y -= GRAVITY * dt;

        let mut p = self.pos + self.vel * dt;

        if p.x.abs() > LANE_HALF_WIDTH {
            p.x = p.x.clamp(-LANE_HALF_WIDTH, LANE_HALF_WIDTH);
            self.sprint_time = 0.0;
        }

        if p.y < DEATH_Y {
            self.pos = p;
            self.die();
            return;
        }

        // Landing
        if p.y <= 0.0 {
            p.y = 0.0;
            self.vel.y = 0.0;
        }
        self.pos = p;
    }

    fn die(&mut self) {
        log::info!("Player fell at z={:.1}", self.pos.z);
        self.dead = true;
        self.respawn_timer = RESPAWN_DELAY;
        self.sprint_time = 0.0;
        self.sprinting = false;
    }

    /// Back to the origin, standing still
    pub fn respawn(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn forward() -> TickInput {
        TickInput {
            forward: true,
            ..Default::default()
        }
    }

    fn sprint_forward() -> TickInput {
        TickInput {
            forward: true,
            sprint: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_walk_forward_moves_negative_z() {
        let mut player = Player::new();
        player.update(SIM_DT, &forward());
        assert!(player.pos.z < 0.0);
        assert!((player.planar_speed() - WALK_SPEED).abs() < 1e-4);
        assert_eq!(player.pos.y, 0.0);
    }

    #[test]
    fn test_diagonal_input_is_normalized() {
        let mut player = Player::new();
        let input = TickInput {
            forward: true,
            right: true,
            ..Default::default()
        };
        player.update(SIM_DT, &input);
        assert!((player.planar_speed() - WALK_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_opposing_keys_cancel_without_nan() {
        let mut player = Player::new();
        let input = TickInput {
            forward: true,
            back: true,
            left: true,
            right: true,
            sprint: true,
            ..Default::default()
        };
        player.update(SIM_DT, &input);
        assert!(player.pos.is_finite());
        assert_eq!(player.planar_speed(), 0.0);
    }

    #[test]
    fn test_sprint_release_resets_multiplier_next_frame() {
        let mut player = Player::new();
        for _ in 0..120 {
            player.update(SIM_DT, &sprint_forward());
        }
        assert!(player.sprint_multiplier() > 2.0);
        player.update(SIM_DT, &forward());
        assert_eq!(player.sprint_multiplier(), 1.0);
        assert_eq!(player.sprint_time, 0.0);
        assert!((player.planar_speed() - WALK_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_side_wall_clamps_and_resets_sprint() {
        let mut player = Player::new();
        player.pos.x = LANE_HALF_WIDTH - 0.01;
        player.sprint_time = 4.0;
        let input = TickInput {
            right: true,
            sprint: true,
            ..Default::default()
        };
        player.update(SIM_DT, &input);
        assert_eq!(player.pos.x, LANE_HALF_WIDTH);
        assert_eq!(player.sprint_time, 0.0);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut player = Player::new();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        player.update(SIM_DT, &jump);
        assert!(player.pos.y > 0.0);
        let vy = player.vel.y;

        // Pressing again mid-air does nothing
        player.update(SIM_DT, &jump);
        assert!(player.vel.y < vy);
    }

    #[test]
    fn test_jump_lands_exactly_on_floor() {
        let mut player = Player::new();
        player.update(
            SIM_DT,
            &TickInput {
                jump: true,
                ..Default::default()
            },
        );
        let mut peak = 0.0f32;
        for _ in 0..120 {
            player.update(SIM_DT, &TickInput::default());
            peak = peak.max(player.pos.y);
        }
        // v^2 / 2g = 1.6
        assert!(peak > 1.4 && peak <= 1.6 + 1e-3);
        assert_eq!(player.pos.y, 0.0);
        assert_eq!(player.vel.y, 0.0);
    }

    #[test]
    fn test_fall_death_and_respawn() {
        let mut player = Player::new();
        player.pos = Vec3::new(3.0, DEATH_Y - 1.0, -40.0);
        player.update(SIM_DT, &forward());
        assert!(player.dead);
        let frozen = player.pos;

        // Dead: no movement, only the timer runs
        player.update(1.0, &forward());
        assert!(player.dead);
        assert_eq!(player.pos, frozen);

        player.update(1.0, &forward());
        assert!(!player.dead);
        assert_eq!(player.pos, Vec3::ZERO);
        assert_eq!(player.vel, Vec3::ZERO);
        assert_eq!(player.sprint_time, 0.0);
    }

    #[test]
    fn test_speed_cap_after_long_sprint() {
        let mut player = Player::new();
        player.sprint_time = 60.0;
        player.update(SIM_DT, &sprint_forward());
        assert!((player.speed_kmh() - MAX_SPEED_KMH).abs() < 0.01);
    }

    proptest! {
        #[test]
        fn prop_sprint_ramp_monotonic(t1 in 0.0f32..60.0, dt in 0.0f32..60.0) {
            prop_assert!(sprint_ramp(t1) <= sprint_ramp(t1 + dt));
        }

        #[test]
        fn prop_speed_never_exceeds_cap(
            held in 0.0f32..500.0,
            dir in 0u8..16,
            frames in 1usize..10,
        ) {
            let mut player = Player::new();
            player.sprint_time = held;
            let input = TickInput {
                forward: dir & 1 != 0,
                back: dir & 2 != 0,
                left: dir & 4 != 0,
                right: dir & 8 != 0,
                sprint: true,
                ..Default::default()
            };
            for _ in 0..frames {
                player.update(SIM_DT, &input);
                prop_assert!(player.speed_kmh() <= MAX_SPEED_KMH * (1.0 + 1e-4));
                prop_assert!(player.vel.is_finite());
            }
        }

        #[test]
        fn prop_ground_invariant(inputs in proptest::collection::vec((any::<bool>(), 0u8..16, any::<bool>()), 1..200)) {
            let mut player = Player::new();
            for (jump, dir, sprint) in inputs {
                let input = TickInput {
                    forward: dir & 1 != 0,
                    back: dir & 2 != 0,
                    left: dir & 4 != 0,
                    right: dir & 8 != 0,
                    sprint,
                    jump,
                    ..Default::default()
                };
                player.update(SIM_DT, &input);
                prop_assert!(player.pos.y >= 0.0);
                if player.pos.y <= 0.0 {
                    prop_assert_eq!(player.pos.y, 0.0);
                    prop_assert_eq!(player.vel.y, 0.0);
                }
                prop_assert!(player.pos.x.abs() <= LANE_HALF_WIDTH);
            }
        }
    }
}
