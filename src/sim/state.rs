//! Game state and core simulation types
//!
//! The session aggregate owns every piece of mutable state; all mutation is
//! routed through `tick` and `reset`. Input handlers only ever update an
//! `InputIntent` value sampled at the top of each tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::BodySpec;
use super::track::Track;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first tick has established a clock baseline
    Idle,
    /// Active play
    Running,
    /// Run ended by collision; terminal until an explicit reset
    GameOver,
}

/// Sampled movement intent, decoupled from key codes
///
/// Updated asynchronously by the input boundary, read once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputIntent {
    Accelerate,
    Decelerate,
    #[default]
    Coast,
}

/// Fixed palette for spawned bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyColor {
    Violet,
    Green,
    Cyan,
    Orange,
}

impl BodyColor {
    pub const PALETTE: [BodyColor; 4] = [
        BodyColor::Violet,
        BodyColor::Green,
        BodyColor::Cyan,
        BodyColor::Orange,
    ];

    /// CSS color for the canvas render sink
    pub fn as_css(&self) -> &'static str {
        match self {
            BodyColor::Violet => "#8000ff",
            BodyColor::Green => "#0ff800",
            BodyColor::Cyan => "#33fbff",
            BodyColor::Orange => "#ff5a33",
        }
    }
}

/// The player's body
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Unbounded angle accumulator (decreases during play by convention)
    pub angle: f32,
    /// World position, recomputed from the angle each tick
    pub pos: Vec2,
}

/// A non-player moving body the player must avoid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherBody {
    pub id: u32,
    /// Unbounded angle accumulator
    pub angle: f32,
    /// Angular speed magnitude (radians per millisecond, non-negative)
    pub speed: f32,
    /// Travel direction along the track
    pub clockwise: bool,
    /// Geometric radius (rendering only; collisions use the shared threshold)
    pub radius: f32,
    pub color: BodyColor,
    pub pos: Vec2,
}

/// Owns the player and the ordered collection of other bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyRegistry {
    pub player: PlayerBody,
    others: Vec<OtherBody>,
    next_id: u32,
}

impl BodyRegistry {
    pub fn new(player_pos: Vec2) -> Self {
        Self {
            player: PlayerBody {
                angle: 0.0,
                pos: player_pos,
            },
            others: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a body from a spawn spec; ids are monotonically increasing so
    /// iteration order is stable for the session's lifetime
    pub fn add(&mut self, spec: BodySpec, pos: Vec2) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.others.push(OtherBody {
            id,
            angle: spec.angle,
            speed: spec.speed,
            clockwise: spec.clockwise,
            radius: spec.radius,
            color: spec.color,
            pos,
        });
        id
    }

    pub fn others(&self) -> &[OtherBody] {
        &self.others
    }

    pub fn others_mut(&mut self) -> &mut [OtherBody] {
        &mut self.others
    }

    pub fn clear_others(&mut self) {
        self.others.clear();
    }

    pub fn body_count(&self) -> usize {
        self.others.len()
    }
}

/// Observable outcomes of a tick, drained by the display boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LapCompleted { lap: u32 },
    BodySpawned { id: u32 },
    Collision { score: u64, laps: u32 },
}

fn fresh_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state (deterministic for a given seed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn RNG; everything random flows through this
    #[serde(skip, default = "fresh_rng")]
    rng: Pcg32,
    /// Immutable track geometry, shared by every body
    pub track: Track,
    pub phase: GamePhase,
    /// Non-decreasing within a run; one point per completed lap
    pub score: u64,
    /// Non-decreasing within a run
    pub laps_completed: u32,
    /// Timestamp of the previous frame (ms); None until a frame has been seen
    pub last_timestamp: Option<f64>,
    pub bodies: BodyRegistry,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a session in `Idle`; no bodies exist until the first tick
    /// transitions to `Running`
    pub fn new(track: Track, seed: u64) -> Self {
        let player_pos = track.position(0.0, track.outer_radius());
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            track,
            phase: GamePhase::Idle,
            score: 0,
            laps_completed: 0,
            last_timestamp: None,
            bodies: BodyRegistry::new(player_pos),
            events: Vec::new(),
        }
    }

    /// Zero the counters, tear down all other bodies, reseed exactly one,
    /// and enter `Running`
    pub(crate) fn begin_run(&mut self) {
        self.score = 0;
        self.laps_completed = 0;
        self.bodies.player.angle = 0.0;
        self.bodies.player.pos = self.track.position(0.0, self.track.outer_radius());
        self.bodies.clear_others();
        self.spawn_body();
        self.phase = GamePhase::Running;
        log::info!("run started (seed {})", self.seed);
    }

    /// Explicit reset command from the boundary
    ///
    /// A no-op in `Idle` (there is nothing to reset before the first tick).
    /// Clears the clock baseline so the next tick only re-establishes it and
    /// integrates no motion.
    pub fn reset(&mut self) {
        if self.phase == GamePhase::Idle {
            return;
        }
        self.begin_run();
        self.last_timestamp = None;
        log::info!("session reset");
    }

    /// Generate one body from the spawn policy and register it
    ///
    /// The body is live immediately: it is positioned on the inner track now
    /// and participates in the current tick's motion and collision passes.
    pub(crate) fn spawn_body(&mut self) -> u32 {
        let spec = BodySpec::generate(&mut self.rng, &self.track);
        let pos = self.track.position(spec.angle, self.track.inner_radius());
        let id = self.bodies.add(spec, pos);
        self.events.push(GameEvent::BodySpawned { id });
        log::debug!("spawned body {id}");
        id
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain pending events for the score/display boundary
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
