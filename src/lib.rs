//! Lava Runner - an endless lane runner chased by rising lava
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player kinematics, hazard streams, particles, session)
//! - `tuning`: Data-driven game balance
//! - `settings`: Effect quality preferences

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Reference frame step (60 Hz) used by the headless runner and tests
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta the session will integrate in one tick
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player movement
    pub const WALK_SPEED: f32 = 5.0;
    pub const JUMP_SPEED: f32 = 8.0;
    pub const GRAVITY: f32 = 20.0;
    /// Falling below this height kills the player body
    pub const DEATH_Y: f32 = -20.0;
    /// Anything at or below this height counts as standing on the floor
    pub const GROUND_EPSILON: f32 = 0.001;
    /// Side walls sit at +/- this X
    pub const LANE_HALF_WIDTH: f32 = 24.0;
    /// Seconds between a fall death and the automatic respawn
    pub const RESPAWN_DELAY: f32 = 2.0;
    /// Sprint multiplier doubles every this many seconds of holding
    pub const SPRINT_RAMP_SECONDS: f32 = 5.0;

    /// One sim unit per second expressed in km/h
    pub const KMH_PER_UNIT: f32 = 3.6;
    /// Absolute cap on horizontal speed
    pub const MAX_SPEED_KMH: f32 = 500.0;

    /// Obstacle hit box half extents (centre to edge)
    pub const OBSTACLE_HIT_HALF_X: f32 = 5.0;
    pub const OBSTACLE_HIT_HALF_Z: f32 = 2.0;
    /// Visual heights
    pub const LOW_OBSTACLE_HEIGHT: f32 = 1.0;
    pub const FULL_OBSTACLE_HEIGHT: f32 = 6.0;
    /// Extra height above a low barrier before a jump clears it
    pub const LOW_OBSTACLE_CLEARANCE: f32 = 0.2;
    /// Obstacles this far behind the player (beyond the hit box) are culled
    pub const OBSTACLE_CULL_MARGIN: f32 = OBSTACLE_HIT_HALF_Z + 2.0;
    /// Squared distance under which two obstacle positions are the same
    pub const OBSTACLE_MATCH_EPSILON_SQ: f32 = 0.1;

    /// Length of one floor segment; soda windows are measured in these
    pub const SEGMENT_LENGTH: f32 = 50.0;
    pub const SODA_HEIGHT: f32 = 0.6;
    pub const SODA_X_RANGE: f32 = 7.5;
    pub const SODA_PICKUP_RADIUS: f32 = 1.4;
    /// Radians per second
    pub const SODA_SPIN_RATE: f32 = 8.5;

    /// Particle integrator
    pub const PARTICLE_GRAVITY: f32 = 9.8;
    pub const PARTICLE_MIN_SPEED: f32 = 10.0;
    pub const PARTICLE_MAX_SPEED: f32 = 25.0;
    /// Per-call clamp on spawn requests
    pub const MAX_PARTICLES_PER_SPAWN: usize = 100;

    /// Rocket exhaust emission
    pub const EXHAUST_RATE: f32 = 30.0;
    pub const EXHAUST_PUFF: usize = 6;
    pub const EXHAUST_BACK_OFFSET: f32 = 1.5;
    pub const EXHAUST_LIFT: f32 = 1.0;
}

/// Drop the vertical component
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Sim units per second to km/h
#[inline]
pub fn units_to_kmh(speed: f32) -> f32 {
    speed * consts::KMH_PER_UNIT
}

/// km/h to sim units per second
#[inline]
pub fn kmh_to_units(kmh: f32) -> f32 {
    kmh / consts::KMH_PER_UNIT
}

/// Wrap a phase angle into [0, 2π)
#[inline]
pub fn wrap_phase(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}
