//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame delta only, clamped on entry
//! - Seeded RNG only, one stream per subsystem
//! - No rendering or platform dependencies

pub mod collision;
pub mod lava;
pub mod obstacles;
pub mod particles;
pub mod player;
pub mod soda;
pub mod state;
pub mod tick;

pub use lava::LavaFront;
pub use obstacles::{Obstacle, ObstacleKind, ObstacleStream};
pub use particles::{FIRE_PALETTE, Particle, ParticleInstance, ParticlePool};
pub use player::{Player, sprint_ramp};
pub use soda::{Soda, SodaStream};
pub use state::{DeathCause, GameEvent, GamePhase, GameState, Hud, RngState};
pub use tick::{TickInput, tick};
