//! Orbit Dodge - an orbital avoidance game on a figure-eight track
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track geometry, motion, spawning, collisions)
//!
//! The binary (`main.rs`) wires the simulation to its boundaries: a
//! `requestAnimationFrame` loop plus canvas/DOM sinks on wasm32, and a
//! headless scripted run on native.

pub mod sim;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Centerline radius of each track lobe (world units)
    pub const TRACK_RADIUS: f32 = 225.0;
    /// Half-width of the track band; player rides the outer edge,
    /// spawned bodies the inner edge
    pub const TRACK_WIDTH: f32 = 45.0;
    /// X offset of each figure-eight lobe center from the origin
    pub const LOBE_OFFSET: f32 = 250.0;

    /// Player base angular speed (radians per millisecond)
    pub const PLAYER_BASE_SPEED: f32 = 0.0017;
    /// Speed multiplier while the accelerate intent is held
    pub const ACCELERATE_FACTOR: f32 = 2.0;
    /// Speed multiplier while the brake intent is held
    pub const BRAKE_FACTOR: f32 = 0.5;

    /// Center-to-center distance below which the player collides with a body.
    /// One shared threshold for all pairs; strict `<` comparison.
    pub const COLLISION_DISTANCE: f32 = 40.0;

    /// Base geometric radius of a spawned body
    pub const BODY_BASE_RADIUS: f32 = 25.0;
    /// Uniform additive jitter on a spawned body's radius
    pub const BODY_RADIUS_JITTER: f32 = 1.0;
    /// Minimum angular speed of a spawned body (radians per millisecond)
    pub const BODY_MIN_SPEED: f32 = 0.001;
    /// Uniform additive jitter on a spawned body's angular speed
    pub const BODY_SPEED_JITTER: f32 = 0.001;

    /// Spawn a batch every this many completed laps
    pub const SPAWN_LAP_CADENCE: u32 = 2;
    /// Number of bodies spawned per trigger
    pub const SPAWN_BATCH: usize = 2;

    /// Geometric radius of the player's body (rendering only)
    pub const PLAYER_RADIUS: f32 = 25.0;
}

/// Wrap an angle into [0, 2π)
///
/// Angle accumulators are never wrapped during integration; this is applied
/// on read where branch selection needs a principal value.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
