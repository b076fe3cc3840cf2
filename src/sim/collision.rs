//! Proximity detection between the player and other bodies
//!
//! One fixed center-to-center threshold shared by every pair, regardless of a
//! body's geometric radius. The scan is O(n) over the registry and
//! short-circuits on the first hit; only whether a collision occurred
//! matters, not which body caused it.

use glam::Vec2;

use super::state::OtherBody;
use crate::consts::COLLISION_DISTANCE;

/// True if any body is strictly closer to the player than the threshold
///
/// A pair at exactly the threshold does not collide.
pub fn any_collision(player_pos: Vec2, others: &[OtherBody]) -> bool {
    others
        .iter()
        .any(|body| player_pos.distance(body.pos) < COLLISION_DISTANCE)
}
