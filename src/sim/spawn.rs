//! Spawn policy: randomized parameters for new bodies
//!
//! Every parameter is drawn independently and uniformly from a fixed band.
//! All randomness flows through the session's seeded RNG, so a run's spawn
//! sequence is reproducible from its seed alone.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::BodyColor;
use super::track::Track;
use crate::consts::*;

/// Parameters for one newly spawned body
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BodySpec {
    /// Geometric radius: base plus a small jitter
    pub radius: f32,
    pub color: BodyColor,
    /// Angular speed magnitude (radians per millisecond)
    pub speed: f32,
    pub clockwise: bool,
    /// Initial angle, uniform over the full lap range of the track
    pub angle: f32,
}

impl BodySpec {
    pub fn generate(rng: &mut Pcg32, track: &Track) -> Self {
        let radius = BODY_BASE_RADIUS + rng.random_range(0.0..BODY_RADIUS_JITTER);
        let color = BodyColor::PALETTE[rng.random_range(0..BodyColor::PALETTE.len())];
        let speed = BODY_MIN_SPEED + rng.random_range(0.0..BODY_SPEED_JITTER);
        let clockwise = rng.random_bool(0.5);
        let angle = rng.random_range(0.0..track.lap_unit());
        Self {
            radius,
            color,
            speed,
            clockwise,
            angle,
        }
    }
}
