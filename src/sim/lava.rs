//! The lava front
//!
//! A lethal plane that chases the player down the lane (toward -Z) and never
//! stops accelerating.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tuning::LavaTuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LavaFront {
    /// Z of the leading edge
    pub front_z: f32,
    /// Current pursuit speed (units/s)
    pub speed: f32,
    start_speed: f32,
    acceleration: f32,
}

impl LavaFront {
    pub fn new(tuning: &LavaTuning) -> Self {
        Self {
            front_z: tuning.start_offset,
            speed: tuning.start_speed,
            start_speed: tuning.start_speed,
            acceleration: tuning.acceleration.max(0.0),
        }
    }

    /// Put the front back at `start_z` with its initial speed
    pub fn reset(&mut self, start_z: f32) {
        self.front_z = start_z;
        self.speed = self.start_speed;
    }

    pub fn update(&mut self, dt: f32) {
        self.front_z -= self.speed * dt;
        self.speed += self.acceleration * dt;
    }

    /// Has the lava reached the player?
    #[inline]
    pub fn hits(&self, player: Vec3) -> bool {
        player.z >= self.front_z
    }

    /// Distance between the player and the front (negative once caught)
    pub fn gap_to(&self, player: Vec3) -> f32 {
        self.front_z - player.z
    }
}
