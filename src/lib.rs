//! Lane Racer - A multi-lane arcade traffic racer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, spawning, collisions, particles)
//! - `config`: Externally supplied road/vehicle/mode constants
//! - `highscores`: In-memory leaderboard carried across runs

pub mod config;
pub mod highscores;
pub mod sim;

pub use config::{ConfigError, GameMode, RoadConfig};
pub use highscores::HighScores;

/// Default game tuning constants
///
/// Speeds and accelerations are in canvas units per reference frame,
/// positions in canvas units with y growing downward.
pub mod consts {
    /// Reference frame time the per-frame constants are tuned for (~60 Hz)
    pub const REFERENCE_FRAME_MS: f32 = 16.67;

    /// Playfield dimensions
    pub const CANVAS_WIDTH: f32 = 600.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;
    pub const LANE_COUNT: u32 = 4;
    /// Grass strip on each side of the road
    pub const SIDE_MARGIN: f32 = 10.0;

    /// Vehicle dimensions
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 100.0;
    pub const CAR_WIDTH: f32 = 60.0;
    pub const CAR_HEIGHT: f32 = 100.0;
    /// Player starts in the second lane
    pub const PLAYER_START_LANE: u32 = 1;
    /// Gap between the player's rear bumper and the canvas bottom
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;

    /// Player handling
    pub const MAX_SPEED: f32 = 25.0;
    pub const ACCELERATION: f32 = 0.2;
    pub const BRAKING: f32 = 0.4;
    pub const TURN_SPEED: f32 = 8.0;
    /// Multiplicative coast drag per frame
    pub const DRAG: f32 = 0.98;
    /// Speed multiplier when scraping the side of the road
    pub const WALL_FRICTION: f32 = 0.9;
    /// Below this speed the wheels don't steer
    pub const MIN_STEER_SPEED: f32 = 0.5;

    /// Spawn pacing (frames between spawns = max(MIN, BASE - speed * FACTOR))
    pub const SPAWN_BASE_THRESHOLD: f32 = 100.0;
    pub const SPAWN_SPEED_FACTOR: f32 = 2.0;
    pub const SPAWN_MIN_THRESHOLD: f32 = 20.0;
    /// A lane with an opponent above this y is blocked for spawning
    pub const SPAWN_LANE_BUFFER: f32 = CAR_HEIGHT * 1.5;
    /// Extra random height above the canvas top for new opponents
    pub const SPAWN_JITTER: f32 = 200.0;
    /// Opponents further than this past the visible area are dropped
    pub const DESPAWN_MARGIN: f32 = 200.0;

    /// Opponent speed ranges
    pub const AGGRESSIVE_SPEED_MIN: f32 = 10.0;
    pub const AGGRESSIVE_SPEED_MAX: f32 = 15.0;
    pub const SLOW_SPEED_MIN: f32 = 5.0;
    pub const SLOW_SPEED_MAX: f32 = 10.0;
    /// Opponent speed weight in relative motion
    pub const OPPONENT_SPEED_DAMPING: f32 = 0.6;

    /// Road scroll (pixels per unit speed per frame) and dash period
    pub const SCROLL_FACTOR: f32 = 2.0;
    pub const ROAD_MARKER_PERIOD: f32 = 100.0;
    /// Distance gained per unit speed per frame
    pub const DISTANCE_FACTOR: f32 = 0.1;

    /// Particles
    pub const EXPLOSION_PARTICLES: usize = 30;
    pub const PARTICLE_DECAY: f32 = 0.02;
    pub const PARTICLE_SPEED_MIN: f32 = 4.0;
    pub const PARTICLE_SPEED_MAX: f32 = 12.0;
    pub const PARTICLE_SIZE_MIN: f32 = 3.0;
    pub const PARTICLE_SIZE_MAX: f32 = 9.0;

    /// Time trial length in seconds
    pub const TIME_TRIAL_SECONDS: f32 = 60.0;
}

/// Clamp a frame delta to a usable value (negative or non-finite -> 0)
#[inline]
pub fn sanitize_delta_ms(delta_ms: f32) -> f32 {
    if delta_ms.is_finite() && delta_ms > 0.0 {
        delta_ms
    } else {
        0.0
    }
}

/// Wrap an accumulator into [0, period)
#[inline]
pub fn wrap_offset(value: f32, period: f32) -> f32 {
    let wrapped = value.rem_euclid(period);
    // rem_euclid can round up to exactly `period` for tiny negatives
    if wrapped >= period { 0.0 } else { wrapped }
}
