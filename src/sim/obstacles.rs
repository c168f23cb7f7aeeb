//! Procedural obstacle stream
//!
//! Barriers are streamed in ahead of the player on fixed lanes and culled
//! once they fall behind. Spacing tightens with distance travelled down to a
//! floor, which is the whole difficulty curve of the game.

use glam::Vec3;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{overlaps_xz, same_position};
use crate::consts::*;
use crate::tuning::{MIN_OBSTACLE_GAP, ObstacleTuning};

/// Barrier types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Knee-high barrier, can be jumped
    Low,
    /// Full-height wall, must be avoided
    Full,
}

impl ObstacleKind {
    /// Visual height
    pub fn height(self) -> f32 {
        match self {
            ObstacleKind::Low => LOW_OBSTACLE_HEIGHT,
            ObstacleKind::Full => FULL_OBSTACLE_HEIGHT,
        }
    }

    /// Visual half width (the hit box is slightly narrower for `Full`)
    pub fn visual_half_width(self) -> f32 {
        match self {
            ObstacleKind::Low => 4.5,
            ObstacleKind::Full => 5.5,
        }
    }

    /// Player height above which the barrier no longer collides
    pub fn clearance(self) -> Option<f32> {
        match self {
            ObstacleKind::Low => Some(LOW_OBSTACLE_HEIGHT + LOW_OBSTACLE_CLEARANCE),
            ObstacleKind::Full => None,
        }
    }
}

/// A barrier in the lane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Lane X, ground Y, streaming Z
    pub pos: Vec3,
    /// Seconds since spawn
    pub age: f32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, z: f32) -> Self {
        Self {
            kind,
            pos: Vec3::new(x, 0.0, z),
            age: 0.0,
        }
    }

    /// Does a player standing at `player` collide with this barrier?
    pub fn blocks(&self, player: Vec3) -> bool {
        if !overlaps_xz(player, self.pos, OBSTACLE_HIT_HALF_X, OBSTACLE_HIT_HALF_Z) {
            return false;
        }
        match self.kind.clearance() {
            Some(clearance) => player.y <= clearance,
            None => true,
        }
    }
}

/// Obstacles currently in play plus the spawn cursor
#[derive(Debug, Clone)]
pub struct ObstacleStream {
    obstacles: Vec<Obstacle>,
    /// Z of the next spawn slot
    next_z: f32,
    tuning: ObstacleTuning,
    rng: Pcg32,
}

impl ObstacleStream {
    pub fn new(tuning: ObstacleTuning, rng: Pcg32) -> Self {
        Self {
            obstacles: Vec::new(),
            next_z: tuning.first_z,
            tuning,
            rng,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Z where the next obstacle will be placed
    pub fn next_spawn_z(&self) -> f32 {
        self.next_z
    }

    /// Place an obstacle directly (scripted layouts)
    pub fn insert(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Gap from one spawn slot to the next at the given player Z
    pub fn gap_at(&self, player_z: f32) -> f32 {
        let floor = self.tuning.min_gap.max(MIN_OBSTACLE_GAP);
        let gap = self.tuning.base_gap + player_z * self.tuning.gap_per_unit;
        // NaN-safe: max() ignores a NaN operand
        gap.max(floor)
    }

    /// Age, spawn ahead of and cull behind the player
    pub fn update(&mut self, dt: f32, player_z: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.age += dt;
        }

        while player_z - self.next_z <= self.tuning.lookahead {
            let kind = if self.rng.random_bool(self.tuning.low_chance.clamp(0.0, 1.0) as f64) {
                ObstacleKind::Low
            } else {
                ObstacleKind::Full
            };
            let x = self.tuning.lanes.choose(&mut self.rng).copied().unwrap_or(0.0);
            self.obstacles.push(Obstacle::new(kind, x, self.next_z));
            self.next_z -= self.gap_at(player_z);
        }

        self.obstacles.retain(|o| o.pos.z - player_z <= OBSTACLE_CULL_MARGIN);
    }

    /// First obstacle the player is touching
    pub fn check_collision(&self, player: Vec3) -> Option<Vec3> {
        self.obstacles
            .iter()
            .find(|o| o.blocks(player))
            .map(|o| o.pos)
    }

    /// Remove the obstacle at `pos` (within tolerance). Returns false if none matched.
    pub fn remove(&mut self, pos: Vec3) -> bool {
        match self
            .obstacles
            .iter()
            .position(|o| same_position(o.pos, pos, OBSTACLE_MATCH_EPSILON_SQ))
        {
            Some(idx) => {
                self.obstacles.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Clear everything and rewind the spawn cursor
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.next_z = self.tuning.first_z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn stream(seed: u64) -> ObstacleStream {
        ObstacleStream::new(ObstacleTuning::default(), Pcg32::seed_from_u64(seed))
    }

    #[test]
    fn test_first_update_spawns_ahead() {
        let mut s = stream(1);
        s.update(SIM_DT, 0.0);
        assert!(!s.is_empty());
        let lanes = ObstacleTuning::default().lanes;
        for o in s.obstacles() {
            assert!(o.pos.z <= -60.0 && o.pos.z >= -100.0);
            assert!(lanes.contains(&o.pos.x));
            assert_eq!(o.pos.y, 0.0);
        }
        assert!(s.next_spawn_z() < -100.0);
    }

    #[test]
    fn test_gap_shrinks_to_floor() {
        let s = stream(1);
        assert_eq!(s.gap_at(0.0), 45.0);
        assert!((s.gap_at(-400.0) - 35.0).abs() < 1e-4);
        assert_eq!(s.gap_at(-100_000.0), 20.0);
    }

    #[test]
    fn test_culls_obstacles_behind_player() {
        let mut s = stream(2);
        s.update(SIM_DT, 0.0);
        let first_z = s.obstacles()[0].pos.z;
        s.update(SIM_DT, first_z - OBSTACLE_CULL_MARGIN - 0.5);
        assert!(s.obstacles().iter().all(|o| o.pos.z != first_z));
    }

    #[test]
    fn test_obstacles_age() {
        let mut s = stream(3);
        s.update(0.0, 0.0);
        s.update(0.5, 0.0);
        assert!(s.obstacles().iter().all(|o| (o.age - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_low_obstacle_can_be_jumped() {
        let low = Obstacle::new(ObstacleKind::Low, 0.0, -10.0);
        let full = Obstacle::new(ObstacleKind::Full, 0.0, -10.0);
        let airborne = Vec3::new(1.0, 1.5, -10.5);
        assert!(!low.blocks(airborne));
        assert!(full.blocks(airborne));

        let grounded = Vec3::new(1.0, 0.0, -10.5);
        assert!(low.blocks(grounded));
        assert!(low.blocks(Vec3::new(1.0, 1.19, -10.5)));
    }

    #[test]
    fn test_check_collision_and_remove() {
        let mut s = stream(4);
        s.insert(Obstacle::new(ObstacleKind::Full, 10.0, -5.0));
        s.insert(Obstacle::new(ObstacleKind::Full, 10.0, -5.0));
        let hit = s.check_collision(Vec3::new(12.0, 0.0, -4.0)).unwrap();
        assert!(s.remove(hit + Vec3::new(0.1, 0.0, 0.1)));
        // Exactly one of the duplicates goes
        assert_eq!(s.len(), 1);
        assert!(s.check_collision(Vec3::new(30.0, 0.0, -4.0)).is_none());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut s = stream(5);
        s.insert(Obstacle::new(ObstacleKind::Low, 0.0, -60.0));
        assert!(!s.remove(Vec3::new(0.0, 0.0, -61.0)));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_reset_rewinds_cursor() {
        let mut s = stream(6);
        s.update(SIM_DT, -500.0);
        s.reset();
        assert!(s.is_empty());
        assert_eq!(s.next_spawn_z(), -60.0);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = stream(99);
        let mut b = stream(99);
        for step in 0..200 {
            let z = -(step as f32) * 3.0;
            a.update(SIM_DT, z);
            b.update(SIM_DT, z);
        }
        assert_eq!(a.obstacles(), b.obstacles());
    }

    #[test]
    fn test_kind_mix_near_forty_percent_low() {
        let mut s = stream(7);
        let mut seen: BTreeMap<u32, ObstacleKind> = BTreeMap::new();
        for step in 0..20_000 {
            s.update(SIM_DT, -(step as f32) * 5.0);
            for o in s.obstacles() {
                seen.insert(o.pos.z.to_bits(), o.kind);
            }
        }
        let low = seen.values().filter(|k| **k == ObstacleKind::Low).count();
        let ratio = low as f32 / seen.len() as f32;
        assert!(seen.len() > 1000);
        assert!((ratio - 0.4).abs() < 0.05, "low ratio {ratio}");
    }
}
