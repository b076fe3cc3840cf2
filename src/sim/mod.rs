//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestamp-driven integration, one tick per display frame
//! - Seeded RNG only
//! - Stable iteration order (bodies by spawn id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::any_collision;
pub use spawn::BodySpec;
pub use state::{
    BodyColor, BodyRegistry, GameEvent, GamePhase, GameSession, InputIntent, OtherBody, PlayerBody,
};
pub use tick::tick;
pub use track::{Track, TrackError, TrackShape};
