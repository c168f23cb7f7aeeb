//! Soda pickups
//!
//! A small pool of spinning cans is kept topped up somewhere in a window
//! ahead of the player. Running through one collects it.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::collision::within_radius;
use crate::consts::*;
use crate::tuning::SodaTuning;
use crate::wrap_phase;

/// A collectible can
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Soda {
    pub pos: Vec3,
    /// Spin phase in [0, 2π), cosmetic only
    pub spin: f32,
}

impl Soda {
    pub fn new(x: f32, z: f32, spin: f32) -> Self {
        Self {
            pos: Vec3::new(x, SODA_HEIGHT, z),
            spin: wrap_phase(spin),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SodaStream {
    cans: Vec<Soda>,
    /// Player position seen by the last update
    player_pos: Vec3,
    tuning: SodaTuning,
    rng: Pcg32,
}

impl SodaStream {
    pub fn new(tuning: SodaTuning, rng: Pcg32) -> Self {
        Self {
            cans: Vec::with_capacity(tuning.pool_size),
            player_pos: Vec3::ZERO,
            tuning,
            rng,
        }
    }

    pub fn cans(&self) -> &[Soda] {
        &self.cans
    }

    pub fn len(&self) -> usize {
        self.cans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cans.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tuning.pool_size
    }

    /// Place a can directly (scripted layouts). Ignored when the pool is full.
    pub fn insert(&mut self, soda: Soda) -> bool {
        if self.cans.len() >= self.tuning.pool_size {
            return false;
        }
        self.cans.push(soda);
        true
    }

    /// Spin, drop cans left behind, then top the pool back up
    pub fn update(&mut self, dt: f32, player_pos: Vec3) {
        self.player_pos = player_pos;

        let margin = self.tuning.despawn_margin;
        self.cans.retain_mut(|can| {
            can.spin = wrap_phase(can.spin + SODA_SPIN_RATE * dt);
            can.pos.z <= player_pos.z + margin
        });

        while self.cans.len() < self.tuning.pool_size {
            let near = player_pos.z - SEGMENT_LENGTH * self.tuning.window_near;
            let far = player_pos.z - SEGMENT_LENGTH * self.tuning.window_far;
            let z = near + (far - near) * self.rng.random::<f32>();
            let x = (self.rng.random::<f32>() * 2.0 - 1.0) * SODA_X_RANGE;
            let spin = self.rng.random::<f32>() * TAU;
            self.cans.push(Soda::new(x, z, spin));
        }
    }

    /// Collect the first can touching the player seen by the last update
    pub fn check_collect(&mut self) -> Option<Vec3> {
        self.collect_at(self.player_pos)
    }

    /// Collect the first can within pickup radius of `pos`
    pub fn collect_at(&mut self, pos: Vec3) -> Option<Vec3> {
        let idx = self
            .cans
            .iter()
            .position(|can| within_radius(pos, can.pos, SODA_PICKUP_RADIUS))?;
        Some(self.cans.remove(idx).pos)
    }

    pub fn reset(&mut self) {
        self.cans.clear();
    }
}
