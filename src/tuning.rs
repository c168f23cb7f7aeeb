//! Data-driven game balance
//!
//! Difficulty curve, scoring and hazard knobs. Defaults reproduce the shipped
//! game; a JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};

/// Largest soda pool a tuning file may ask for
pub const MAX_SODA_POOL: usize = 32;
/// Smallest spawn gap accepted (keeps the spawn loop finite)
pub const MIN_OBSTACLE_GAP: f32 = 1.0;

/// Obstacle stream balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    /// Lane X positions obstacles snap to
    pub lanes: Vec<f32>,
    /// Probability a spawned obstacle is a low (jumpable) barrier
    pub low_chance: f32,
    /// Z of the first obstacle after a reset
    pub first_z: f32,
    /// Spawn while the next slot is within this distance ahead of the player
    pub lookahead: f32,
    /// Gap to the next slot at the start line
    pub base_gap: f32,
    /// Gap change per unit of player Z (player Z is negative when advancing)
    pub gap_per_unit: f32,
    /// Gap never shrinks below this
    pub min_gap: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            lanes: vec![-20.0, -10.0, 0.0, 10.0, 20.0],
            low_chance: 0.4,
            first_z: -60.0,
            lookahead: 100.0,
            base_gap: 45.0,
            gap_per_unit: 0.025,
            min_gap: 20.0,
        }
    }
}

/// Lava front balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LavaTuning {
    pub start_speed: f32,
    /// Speed gained per second
    pub acceleration: f32,
    /// Front starts this far behind (+Z) the respawn point
    pub start_offset: f32,
}

impl Default for LavaTuning {
    fn default() -> Self {
        Self {
            start_speed: 6.0,
            acceleration: 0.8,
            start_offset: 40.0,
        }
    }
}

/// Soda pickup stream balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SodaTuning {
    /// Concurrent cans kept ahead of the player
    pub pool_size: usize,
    /// Spawn window, in segments ahead of the player
    pub window_near: f32,
    pub window_far: f32,
    /// Cans this far behind the player are dropped
    pub despawn_margin: f32,
}

impl Default for SodaTuning {
    fn default() -> Self {
        Self {
            pool_size: 3,
            window_near: 1.0,
            window_far: 4.0,
            despawn_margin: 10.0,
        }
    }
}

/// Session rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    pub max_lives: u8,
    /// Points per unit of forward distance
    pub score_per_unit: f32,
    pub soda_bonus: u64,
    /// Horizontal speed at which rocket mode engages
    pub rocket_kmh: f32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            max_lives: 3,
            score_per_unit: 20.0,
            soda_bonus: 250,
            rocket_kmh: 100.0,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub obstacles: ObstacleTuning,
    pub lava: LavaTuning,
    pub soda: SodaTuning,
    pub session: SessionTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning file
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        let o = &mut self.obstacles;
        if !(0.0..=1.0).contains(&o.low_chance) {
            log::warn!("obstacles.low_chance {} out of range, clamping", o.low_chance);
            o.low_chance = if o.low_chance.is_nan() {
                ObstacleTuning::default().low_chance
            } else {
                o.low_chance.clamp(0.0, 1.0)
            };
        }
        if o.min_gap.is_nan() || o.min_gap < MIN_OBSTACLE_GAP {
            log::warn!("obstacles.min_gap {} too small, using {}", o.min_gap, MIN_OBSTACLE_GAP);
            o.min_gap = MIN_OBSTACLE_GAP;
        }
        if o.lanes.is_empty() {
            log::warn!("obstacles.lanes empty, using centre lane only");
            o.lanes.push(0.0);
        }

        let s = &mut self.soda;
        if s.pool_size > MAX_SODA_POOL {
            log::warn!("soda.pool_size {} capped at {}", s.pool_size, MAX_SODA_POOL);
            s.pool_size = MAX_SODA_POOL;
        }
        if s.window_far < s.window_near {
            std::mem::swap(&mut s.window_near, &mut s.window_far);
        }

        let l = &mut self.lava;
        if l.acceleration < 0.0 {
            log::warn!("lava.acceleration {} negative, lava never slows down", l.acceleration);
            l.acceleration = 0.0;
        }

        if self.session.max_lives == 0 {
            log::warn!("session.max_lives is 0, using 1");
            self.session.max_lives = 1;
        }
        self
    }
}
