//! Collision primitives for the runner
//!
//! Everything in the lane is resolved with axis-aligned boxes on the ground
//! plane or plain radius checks; there is no general physics engine.

use glam::Vec3;

/// Axis-aligned overlap on the ground plane (X/Z), inclusive at the edges
#[inline]
pub fn overlaps_xz(point: Vec3, center: Vec3, half_x: f32, half_z: f32) -> bool {
    (point.x - center.x).abs() <= half_x && (point.z - center.z).abs() <= half_z
}

/// Point inside (or on) a sphere
#[inline]
pub fn within_radius(point: Vec3, center: Vec3, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// Two positions are the same entity if closer than the squared tolerance
#[inline]
pub fn same_position(a: Vec3, b: Vec3, epsilon_sq: f32) -> bool {
    a.distance_squared(b) < epsilon_sq
}

/// Scale the horizontal part of `velocity` down so its magnitude is at most
/// `max_speed`. Direction is preserved; vertical velocity is untouched.
pub fn clamp_planar_speed(velocity: Vec3, max_speed: f32) -> Vec3 {
    let planar = crate::horizontal(velocity);
    let speed = planar.length();
    if speed <= max_speed || speed == 0.0 {
        return velocity;
    }
    let dir = if speed.is_finite() {
        planar / speed
    } else {
        // length() overflowed; rescale before normalizing
        (planar / planar.abs().max_element()).normalize_or_zero()
    };
    let scaled = dir * max_speed;
    Vec3::new(scaled.x, velocity.y, scaled.z)
}
