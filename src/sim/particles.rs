//! Point particle integrator
//!
//! Short-lived, gravity-affected sparks for explosions, pickups and rocket
//! exhaust. Visual only; nothing in the gameplay reads particle state.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::consts::*;

/// Fire palette used when a spawn request does not name a colour
pub const FIRE_PALETTE: [Vec3; 4] = [
    Vec3::new(1.0, 0.9, 0.0),
    Vec3::new(1.0, 0.6, 0.0),
    Vec3::new(1.0, 0.2, 0.0),
    Vec3::new(0.1, 0.1, 0.1),
];

/// A particle for visual effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// 1 at spawn, removed once it reaches 0
    pub life: f32,
    pub color: Vec3,
}

/// Per-particle GPU instance: position, colour, alpha
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub alpha: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

impl From<&Particle> for ParticleInstance {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.pos.to_array(),
            alpha: p.life.clamp(0.0, 1.0),
            color: p.color.to_array(),
            _pad: 0.0,
        }
    }
}

/// Bounded, unordered particle pool
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    capacity: usize,
    rng: Pcg32,
}

impl ParticlePool {
    pub fn new(capacity: usize, rng: Pcg32) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Emit up to `count` particles at `origin` (clamped per call and by the
    /// free room in the pool). Returns how many were actually added.
    pub fn spawn(&mut self, origin: Vec3, count: usize, color: Option<Vec3>) -> usize {
        let room = self.capacity.saturating_sub(self.particles.len());
        let count = count.min(MAX_PARTICLES_PER_SPAWN).min(room);

        for _ in 0..count {
            let dir = self.random_direction();
            let speed = self.rng.random_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
            let color = match color {
                Some(c) => c,
                None => self.random_color(),
            };
            self.particles.push(Particle {
                pos: origin,
                vel: dir * speed,
                life: 1.0,
                color,
            });
        }
        count
    }

    /// Integrate and expire
    pub fn update(&mut self, dt: f32) {
        let gravity = Vec3::new(0.0, -PARTICLE_GRAVITY, 0.0);
        self.particles.retain_mut(|p| {
            p.pos += p.vel * dt;
            p.vel += gravity * dt;
            p.life -= dt;
            p.life > 0.0
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Instance list ready for upload
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.particles.iter().map(ParticleInstance::from).collect()
    }

    /// Uniform over the unit sphere
    fn random_direction(&mut self) -> Vec3 {
        let z: f32 = self.rng.random_range(-1.0..=1.0);
        let a: f32 = self.rng.random::<f32>() * TAU;
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * a.cos(), z, r * a.sin())
    }

    fn random_color(&mut self) -> Vec3 {
        FIRE_PALETTE[self.rng.random_range(0..FIRE_PALETTE.len())]
    }
}
