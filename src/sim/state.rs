//! Game state and core simulation types
//!
//! One `GameState` owns every piece of a run: the player body, both hazard
//! streams, the soda pool and the particle pool. A respawn reinitializes them
//! in place.

use glam::Vec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lava::LavaFront;
use super::obstacles::ObstacleStream;
use super::particles::{ParticleInstance, ParticlePool};
use super::player::Player;
use super::soda::SodaStream;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Running
    Alive,
    /// Run over, waiting for respawn input
    Dead,
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Last life lost on a barrier
    Obstacle,
    /// Caught by the lava front
    Lava,
}

/// Things that happened during the last tick (for audio/HUD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ObstacleHit { pos: Vec3, lives_left: u8 },
    SodaCollected { pos: Vec3 },
    RocketMode { engaged: bool },
    /// Player body fell out of the world (auto-respawns)
    PlayerFell,
    Died { cause: DeathCause },
    Respawned,
}

/// Seed plus stream id for one of the run's RNGs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub const OBSTACLES: u64 = 1;
    pub const SODA: u64 = 2;
    pub const PARTICLES: u64 = 3;
    pub const SESSION: u64 = 4;

    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// Read-only HUD values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u8,
    pub speed_kmh: u32,
    pub rocket: bool,
    pub phase: GamePhase,
    /// Distance to the lava front
    pub lava_gap: f32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub settings: Settings,
    pub phase: GamePhase,
    pub lives: u8,
    pub score: u64,
    /// Visual-only high speed mode
    pub rocket: bool,
    /// Seconds spent alive this run
    pub time: f32,
    pub player: Player,
    pub lava: LavaFront,
    pub obstacles: ObstacleStream,
    pub sodas: SodaStream,
    pub particles: ParticlePool,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// Player Z at the end of the previous tick
    pub(crate) last_z: f32,
    /// Fractional distance points not yet credited
    pub(crate) score_carry: f32,
    /// Time budget for exhaust puffs
    pub(crate) exhaust_timer: f32,
    /// Burst sizes
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// New run with default balance and effects
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Settings::default())
    }

    pub fn with_config(seed: u64, tuning: Tuning, settings: Settings) -> Self {
        let tuning = tuning.sanitized();
        let player = Player::new();
        let mut lava = LavaFront::new(&tuning.lava);
        lava.reset(player.pos.z + tuning.lava.start_offset);

        Self {
            seed,
            phase: GamePhase::Alive,
            lives: tuning.session.max_lives,
            score: 0,
            rocket: false,
            time: 0.0,
            lava,
            obstacles: ObstacleStream::new(
                tuning.obstacles.clone(),
                RngState::new(seed, RngState::OBSTACLES).to_rng(),
            ),
            sodas: SodaStream::new(
                tuning.soda.clone(),
                RngState::new(seed, RngState::SODA).to_rng(),
            ),
            particles: ParticlePool::new(
                settings.max_particles(),
                RngState::new(seed, RngState::PARTICLES).to_rng(),
            ),
            events: Vec::new(),
            last_z: player.pos.z,
            score_carry: 0.0,
            exhaust_timer: 0.0,
            rng: RngState::new(seed, RngState::SESSION).to_rng(),
            player,
            tuning,
            settings,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.phase == GamePhase::Alive
    }

    /// Start a fresh run in place
    pub fn reset_run(&mut self) {
        self.phase = GamePhase::Alive;
        self.lives = self.tuning.session.max_lives;
        self.score = 0;
        self.score_carry = 0.0;
        self.rocket = false;
        self.exhaust_timer = 0.0;
        self.time = 0.0;
        self.player.respawn();
        self.last_z = self.player.pos.z;
        self.lava.reset(self.player.pos.z + self.tuning.lava.start_offset);
        self.obstacles.reset();
        self.sodas.reset();
        self.particles.clear();
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            lives: self.lives,
            speed_kmh: self.player.speed_kmh().max(0.0) as u32,
            rocket: self.rocket,
            phase: self.phase,
            lava_gap: self.lava.gap_to(self.player.pos),
        }
    }

    /// Particle instances for the renderer
    pub fn particle_instances(&self) -> Vec<ParticleInstance> {
        self.particles.instances()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Alive);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.pos, Vec3::ZERO);
        assert_eq!(state.lava.front_z, 40.0);
        assert_eq!(state.particles.capacity(), 2048);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_reset_run_restores_everything() {
        let mut state = GameState::new(7);
        state.phase = GamePhase::Dead;
        state.lives = 0;
        state.score = 1234;
        state.rocket = true;
        state.player.pos = Vec3::new(4.0, 0.0, -300.0);
        state.lava.update(10.0);
        state.obstacles.update(0.1, -300.0);
        state.sodas.update(0.1, state.player.pos);
        state.particles.spawn(Vec3::ZERO, 10, None);

        state.reset_run();
        assert!(state.is_alive());
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert!(!state.rocket);
        assert_eq!(state.player.pos, Vec3::ZERO);
        assert_eq!(state.lava.front_z, 40.0);
        assert_eq!(state.lava.speed, 6.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.obstacles.next_spawn_z(), -60.0);
        assert!(state.sodas.is_empty());
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_rng_streams_differ() {
        use rand::Rng;
        let mut a = RngState::new(5, RngState::OBSTACLES).to_rng();
        let mut b = RngState::new(5, RngState::SODA).to_rng();
        let xs: Vec<u32> = (0..4).map(|_| a.random()).collect();
        let ys: Vec<u32> = (0..4).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_hud_snapshot_serializes() {
        let state = GameState::new(1);
        let hud = state.hud();
        assert_eq!(hud.speed_kmh, 0);
        assert_eq!(hud.lava_gap, 40.0);
        let json = serde_json::to_string(&hud).unwrap();
        assert!(json.contains("\"phase\":\"Alive\""));
    }
}
