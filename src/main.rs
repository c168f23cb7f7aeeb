//! Lava Runner headless driver
//!
//! Runs the simulation without a window: an autopilot stands in for the
//! platform input layer and the final HUD is printed as JSON.
//!
//! ```text
//! lava-runner [--seed N] [--seconds S] [--quality low|medium|high] [--tuning FILE]
//! ```

use std::error::Error;

use lava_runner::consts::*;
use lava_runner::sim::{GameEvent, GameState, ObstacleKind, TickInput, tick};
use lava_runner::{QualityPreset, Settings, Tuning};

/// Full barriers closer than this get dodged
const DODGE_DISTANCE: f32 = 25.0;
/// Low barriers closer than this get jumped
const JUMP_DISTANCE: f32 = 3.0;
/// Lateral overlap that counts as "in my way"
const DODGE_WIDTH: f32 = 6.0;

struct Args {
    seed: u64,
    seconds: f32,
    quality: QualityPreset,
    tuning: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: 12345,
            seconds: 60.0,
            quality: QualityPreset::default(),
            tuning: None,
        }
    }
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--seed" => args.seed = value()?.parse()?,
            "--seconds" => args.seconds = value()?.parse()?,
            "--quality" => args.quality = value()?.parse()?,
            "--tuning" => args.tuning = Some(value()?),
            other => return Err(format!("unknown argument '{other}'").into()),
        }
    }
    Ok(args)
}

/// Sprint forward, step around walls, hop barriers, restart when dead
fn autopilot(state: &GameState) -> TickInput {
    if !state.is_alive() {
        return TickInput {
            respawn: true,
            ..Default::default()
        };
    }

    let p = state.player.pos;
    let mut input = TickInput {
        forward: true,
        sprint: true,
        ..Default::default()
    };

    for obstacle in state.obstacles.obstacles() {
        let ahead = p.z - obstacle.pos.z;
        if ahead < -OBSTACLE_HIT_HALF_Z {
            continue;
        }
        let dx = p.x - obstacle.pos.x;
        match obstacle.kind {
            ObstacleKind::Full if ahead < DODGE_DISTANCE && dx.abs() < DODGE_WIDTH => {
                // Step toward the centre when pinned at a wall
                let go_right = if p.x.abs() > LANE_HALF_WIDTH - DODGE_WIDTH {
                    p.x < 0.0
                } else {
                    dx >= 0.0
                };
                input.right = go_right;
                input.left = !go_right;
            }
            ObstacleKind::Low if ahead < JUMP_DISTANCE && dx.abs() < OBSTACLE_HIT_HALF_X => {
                input.jump = state.player.is_grounded();
            }
            _ => {}
        }
    }
    input
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = parse_args()?;
    let tuning = match &args.tuning {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };
    let settings = Settings::from_preset(args.quality);

    log::info!(
        "Lava Runner (headless) seed={} seconds={} quality={}",
        args.seed,
        args.seconds,
        args.quality.as_str()
    );

    let mut state = GameState::with_config(args.seed, tuning, settings);
    let frames = (args.seconds.max(0.0) / SIM_DT).round() as u64;
    let mut best = 0;
    let mut deaths = 0;

    for frame in 0..frames {
        let input = autopilot(&state);
        tick(&mut state, &input, SIM_DT);
        best = best.max(state.score);

        for event in &state.events {
            match event {
                GameEvent::Died { cause } => {
                    deaths += 1;
                    log::info!("frame {frame}: died ({cause:?}), score {}", state.score);
                }
                GameEvent::RocketMode { engaged } => {
                    log::info!("frame {frame}: rocket mode {}", if *engaged { "on" } else { "off" });
                }
                other => log::debug!("frame {frame}: {other:?}"),
            }
        }
    }

    log::info!("Finished: best score {best}, {deaths} deaths");
    println!("{}", serde_json::to_string_pretty(&state.hud())?);
    Ok(())
}
