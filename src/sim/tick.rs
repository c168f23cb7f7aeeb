//! Per-frame session step
//!
//! Fixed order every frame: player, hazards and pickups, collision
//! resolution, effects, particles.

use glam::Vec3;
use rand::Rng;

use super::state::{DeathCause, GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::horizontal;

const HIT_BURST: usize = 60;
const DEATH_BURST: usize = 100;
const SODA_BURST: usize = 40;
const SODA_COLOR: Vec3 = Vec3::new(1.0, 0.2, 1.0);
const DEATH_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Below this horizontal speed the rocket exhaust stays off
const EXHAUST_MIN_SPEED: f32 = 0.1;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Sprint held
    pub sprint: bool,
    /// Jump pressed this frame (edge)
    pub jump: bool,
    /// Respawn pressed this frame (edge, only read while dead)
    pub respawn: bool,
}

impl TickInput {
    /// Unit ground-plane direction from the held keys, zero when they cancel out
    pub fn move_direction(&self) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if self.forward {
            dir.z -= 1.0;
        }
        if self.back {
            dir.z += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Particle colour for an obstacle hit, by lives remaining
fn severity_color(lives_left: u8) -> Vec3 {
    match lives_left {
        0 => Vec3::new(1.0, 0.0, 0.0),
        1 => Vec3::new(1.0, 0.5, 0.0),
        _ => Vec3::new(1.0, 0.9, 0.0),
    }
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    let dt = if dt.is_nan() { 0.0 } else { dt.clamp(0.0, MAX_FRAME_DT) };

    match state.phase {
        GamePhase::Dead => {
            if input.respawn {
                state.reset_run();
                state.events.push(GameEvent::Respawned);
                log::info!("Run restarted (seed {})", state.seed);
            }
        }
        GamePhase::Alive => step_alive(state, input, dt),
    }

    state.particles.update(dt);
}

fn step_alive(state: &mut GameState, input: &TickInput, dt: f32) {
    let was_fallen = state.player.dead;
    state.player.update(dt, input);

    if state.player.dead {
        if !was_fallen {
            state.events.push(GameEvent::PlayerFell);
        }
        return;
    }
    if was_fallen {
        // Body came back at the origin: rebuild the world around it
        state.last_z = state.player.pos.z;
        state.lava.reset(state.player.pos.z + state.tuning.lava.start_offset);
        state.obstacles.reset();
        state.sodas.reset();
        state.exhaust_timer = 0.0;
    }

    let pos = state.player.pos;
    state.lava.update(dt);
    state.obstacles.update(dt, pos.z);
    state.sodas.update(dt, pos);

    credit_distance(state, pos.z);

    if let Some(hit) = state.obstacles.check_collision(pos) {
        state.obstacles.remove(hit);
        state.lives = state.lives.saturating_sub(1);
        state.particles.spawn(pos, HIT_BURST, Some(severity_color(state.lives)));
        state.events.push(GameEvent::ObstacleHit {
            pos: hit,
            lives_left: state.lives,
        });
        log::debug!("Obstacle hit at {hit:?}, {} lives left", state.lives);
        if state.lives == 0 {
            kill(state, DeathCause::Obstacle);
            return;
        }
    }

    if state.lava.hits(pos) {
        kill(state, DeathCause::Lava);
        return;
    }

    if let Some(can) = state.sodas.check_collect() {
        state.score = state.score.saturating_add(state.tuning.session.soda_bonus);
        state.particles.spawn(can, SODA_BURST, Some(SODA_COLOR));
        state.events.push(GameEvent::SodaCollected { pos: can });
    }

    update_rocket(state, dt);
    state.time += dt;
}

/// Score forward (decreasing Z) progress since the last frame
fn credit_distance(state: &mut GameState, z: f32) {
    let advanced = state.last_z - z;
    state.last_z = z;
    if advanced <= 0.0 || !advanced.is_finite() {
        return;
    }
    state.score_carry += advanced * state.tuning.session.score_per_unit;
    let whole = state.score_carry.floor();
    state.score = state.score.saturating_add(whole as u64);
    state.score_carry -= whole;
}

fn kill(state: &mut GameState, cause: DeathCause) {
    state.phase = GamePhase::Dead;
    state.rocket = false;
    state.particles.spawn(state.player.pos, DEATH_BURST, Some(DEATH_COLOR));
    state.events.push(GameEvent::Died { cause });
    log::info!(
        "Run over ({cause:?}): score {} after {:.1}s",
        state.score,
        state.time
    );
}

/// Rocket mode toggle plus its exhaust trail
fn update_rocket(state: &mut GameState, dt: f32) {
    let engaged = state.player.speed_kmh() > state.tuning.session.rocket_kmh;
    if engaged != state.rocket {
        state.rocket = engaged;
        let burst = state.rng.random_range(80..120);
        state.particles.spawn(state.player.pos, burst, None);
        state.events.push(GameEvent::RocketMode { engaged });
        log::debug!("Rocket mode {}", if engaged { "on" } else { "off" });
    }

    let planar = horizontal(state.player.vel);
    if !state.rocket || !state.settings.exhaust || planar.length() < EXHAUST_MIN_SPEED {
        state.exhaust_timer = 0.0;
        return;
    }

    let interval = 1.0 / EXHAUST_RATE;
    let origin = state.player.pos - planar.normalize_or_zero() * EXHAUST_BACK_OFFSET
        + Vec3::Y * EXHAUST_LIFT;
    state.exhaust_timer += dt;
    while state.exhaust_timer >= interval {
        state.exhaust_timer -= interval;
        state.particles.spawn(origin, EXHAUST_PUFF, None);
    }
}
