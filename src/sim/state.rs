//! World state and core simulation types
//!
//! Everything the per-frame update mutates lives in [`World`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::particles;
use super::snapshot::WorldSnapshot;
use crate::config::{ConfigError, GameMode, RoadConfig};

/// Simulation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Active driving
    Running,
    /// Frozen by the player, resumable
    Paused,
    /// Run ended by a crash or the clock
    Terminated,
}

/// What kind of vehicle this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleRole {
    Player,
    /// Fast traffic that tends to pull away from the player
    Aggressive,
    /// Slow traffic the player catches up with
    Slow,
}

/// 0xRRGGBB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    /// blue-500
    pub const PLAYER: Color = Color(0x3b82f6);
    /// red-500, orange-500, emerald-500
    pub const AGGRESSIVE_PALETTE: [Color; 3] =
        [Color(0xef4444), Color(0xf97316), Color(0x10b981)];
    /// slate-400
    pub const SLOW: Color = Color(0x94a3b8);
}

/// A car on the road (player or traffic)
///
/// `pos` is the top-left corner of the car's bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Absolute road speed
    pub speed: f32,
    pub lane: u32,
    pub role: VehicleRole,
    pub color: Color,
}

impl Vehicle {
    /// Bounding box for collision tests
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Per-run statistics shown by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub score: u64,
    pub distance: f32,
    pub speed: f32,
    /// Seconds left on the clock (timed modes only)
    pub time_left: Option<f32>,
    pub high_score: u64,
}

impl RunStatistics {
    pub fn new(mode: GameMode, config: &RoadConfig, high_score: u64) -> Self {
        Self {
            score: 0,
            distance: 0.0,
            speed: 0.0,
            time_left: mode.is_timed().then_some(config.time_trial_seconds),
            high_score,
        }
    }
}

/// Complete world state for one run
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) config: RoadConfig,
    pub(crate) mode: GameMode,
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) phase: SimPhase,
    pub(crate) player: Vehicle,
    /// Traffic, order carries no meaning
    pub(crate) opponents: Vec<Vehicle>,
    /// Visual particles (not gameplay-affecting)
    pub(crate) particles: Vec<Particle>,
    /// Lane-marker dash phase in [0, road_marker_period)
    pub(crate) road_offset: f32,
    /// Frames since the last spawn
    pub(crate) spawn_timer: f32,
    pub(crate) stats: RunStatistics,
    /// Next entity ID
    next_id: u32,
}

impl World {
    /// Start a fresh run
    ///
    /// `high_score` is the best score from earlier runs; it is raised when
    /// this run terminates with a better score.
    pub fn new(
        config: RoadConfig,
        mode: GameMode,
        seed: u64,
        high_score: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let lane = config.player_start_lane;
        let player = Vehicle {
            id: 0,
            pos: Vec2::new(
                config.lane_x(lane, config.player_width),
                config.canvas_height - config.player_height - config.player_bottom_margin,
            ),
            size: Vec2::new(config.player_width, config.player_height),
            speed: 0.0,
            lane,
            role: VehicleRole::Player,
            color: Color::PLAYER,
        };
        let stats = RunStatistics::new(mode, &config, high_score);

        log::info!("Starting {} run (seed {})", mode.as_str(), seed);

        Ok(Self {
            config,
            mode,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SimPhase::Running,
            player,
            opponents: Vec::new(),
            particles: Vec::new(),
            road_offset: 0.0,
            spawn_timer: 0.0,
            stats,
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Flip Running <-> Paused; a terminated run stays terminated
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            SimPhase::Running => SimPhase::Paused,
            SimPhase::Paused => SimPhase::Running,
            SimPhase::Terminated => SimPhase::Terminated,
        };
        log::debug!("Pause toggled, now {:?}", self.phase);
    }

    /// Let particles play out without advancing anything else
    ///
    /// Runs in every phase except Paused, so a crash explosion keeps
    /// animating on the game-over screen.
    pub fn settle_particles(&mut self, delta_ms: f32) {
        if self.phase == SimPhase::Paused {
            return;
        }
        let dt = crate::sanitize_delta_ms(delta_ms) / self.config.reference_frame_ms;
        let drift = self.player.speed * self.config.scroll_factor * dt;
        particles::integrate(&mut self.particles, dt, drift, self.config.particle_decay);
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &RoadConfig {
        &self.config
    }

    /// Copy of the current run statistics
    pub fn stats(&self) -> RunStatistics {
        self.stats
    }

    pub fn road_offset(&self) -> f32 {
        self.road_offset
    }

    pub fn opponent_count(&self) -> usize {
        self.opponents.len()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Read-only copy of everything the presentation layer draws
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            phase: self.phase,
            mode: self.mode,
            stats: self.stats,
            road_offset: self.road_offset,
            player: self.player.clone(),
            opponents: self.opponents.clone(),
            particles: self.particles.clone(),
        }
    }
}
