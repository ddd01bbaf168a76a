//! Road, vehicle and mode configuration
//!
//! Supplied by the host before a run starts and copied into the world;
//! the simulation never mutates it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Game mode selected from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Endless survival, the run ends on the first crash
    #[default]
    Traffic,
    /// Distance attack against the clock
    TimeTrial,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Traffic => "Traffic",
            GameMode::TimeTrial => "Time Trial",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "traffic" | "endless" => Some(GameMode::Traffic),
            "time_trial" | "time-trial" | "timetrial" | "time trial" => Some(GameMode::TimeTrial),
            _ => None,
        }
    }

    /// Whether the run is limited by a countdown
    pub fn is_timed(&self) -> bool {
        matches!(self, GameMode::TimeTrial)
    }
}

/// Configuration problems detected before a run starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{name} must be positive and finite (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be zero or more (got {value})")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be a multiplier in (0, 1] (got {value})")]
    NotAFraction { name: &'static str, value: f32 },
    #[error("Lane count must be at least 1")]
    NoLanes,
    #[error("Lane width {lane_width} is narrower than a car ({car_width})")]
    LaneTooNarrow { lane_width: f32, car_width: f32 },
    #[error("Road leaves no room for the player between the side margins")]
    RoadTooNarrow,
    #[error("{name} speed range is empty ({min}..{max})")]
    EmptySpeedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("Start lane {lane} is outside the road ({lane_count} lanes)")]
    StartLaneOutOfRange { lane: u32, lane_count: u32 },
}

/// All externally supplied simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadConfig {
    // === Playfield ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub lane_count: u32,
    pub side_margin: f32,

    // === Vehicles ===
    pub player_width: f32,
    pub player_height: f32,
    pub car_width: f32,
    pub car_height: f32,
    pub player_start_lane: u32,
    pub player_bottom_margin: f32,

    // === Handling ===
    pub max_speed: f32,
    pub acceleration: f32,
    pub braking: f32,
    pub turn_speed: f32,
    pub drag: f32,
    pub wall_friction: f32,
    pub min_steer_speed: f32,

    // === Traffic ===
    pub spawn_base_threshold: f32,
    pub spawn_speed_factor: f32,
    pub spawn_min_threshold: f32,
    pub spawn_lane_buffer: f32,
    pub spawn_jitter: f32,
    pub despawn_margin: f32,
    pub aggressive_speed_min: f32,
    pub aggressive_speed_max: f32,
    pub slow_speed_min: f32,
    pub slow_speed_max: f32,
    pub opponent_speed_damping: f32,

    // === Road and scoring ===
    pub scroll_factor: f32,
    pub road_marker_period: f32,
    pub distance_factor: f32,

    // === Effects ===
    pub explosion_particles: usize,
    pub particle_decay: f32,

    // === Modes ===
    pub time_trial_seconds: f32,
    pub reference_frame_ms: f32,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            lane_count: LANE_COUNT,
            side_margin: SIDE_MARGIN,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            car_width: CAR_WIDTH,
            car_height: CAR_HEIGHT,
            player_start_lane: PLAYER_START_LANE,
            player_bottom_margin: PLAYER_BOTTOM_MARGIN,

            max_speed: MAX_SPEED,
            acceleration: ACCELERATION,
            braking: BRAKING,
            turn_speed: TURN_SPEED,
            drag: DRAG,
            wall_friction: WALL_FRICTION,
            min_steer_speed: MIN_STEER_SPEED,

            spawn_base_threshold: SPAWN_BASE_THRESHOLD,
            spawn_speed_factor: SPAWN_SPEED_FACTOR,
            spawn_min_threshold: SPAWN_MIN_THRESHOLD,
            spawn_lane_buffer: SPAWN_LANE_BUFFER,
            spawn_jitter: SPAWN_JITTER,
            despawn_margin: DESPAWN_MARGIN,
            aggressive_speed_min: AGGRESSIVE_SPEED_MIN,
            aggressive_speed_max: AGGRESSIVE_SPEED_MAX,
            slow_speed_min: SLOW_SPEED_MIN,
            slow_speed_max: SLOW_SPEED_MAX,
            opponent_speed_damping: OPPONENT_SPEED_DAMPING,

            scroll_factor: SCROLL_FACTOR,
            road_marker_period: ROAD_MARKER_PERIOD,
            distance_factor: DISTANCE_FACTOR,

            explosion_particles: EXPLOSION_PARTICLES,
            particle_decay: PARTICLE_DECAY,

            time_trial_seconds: TIME_TRIAL_SECONDS,
            reference_frame_ms: REFERENCE_FRAME_MS,
        }
    }
}

impl RoadConfig {
    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RoadConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the simulation can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("car_width", self.car_width),
            ("car_height", self.car_height),
            ("max_speed", self.max_speed),
            ("road_marker_period", self.road_marker_period),
            ("spawn_min_threshold", self.spawn_min_threshold),
            ("reference_frame_ms", self.reference_frame_ms),
            ("time_trial_seconds", self.time_trial_seconds),
            ("particle_decay", self.particle_decay),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        let non_negative = [
            ("acceleration", self.acceleration),
            ("braking", self.braking),
            ("spawn_lane_buffer", self.spawn_lane_buffer),
            ("despawn_margin", self.despawn_margin),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }

        // Speed multipliers must never flip the sign or grow the speed
        let fractions = [("drag", self.drag), ("wall_friction", self.wall_friction)];
        for (name, value) in fractions {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::NotAFraction { name, value });
            }
        }

        if self.lane_count == 0 {
            return Err(ConfigError::NoLanes);
        }
        if self.lane_width() < self.car_width {
            return Err(ConfigError::LaneTooNarrow {
                lane_width: self.lane_width(),
                car_width: self.car_width,
            });
        }
        if self.max_player_x() < self.min_player_x() {
            return Err(ConfigError::RoadTooNarrow);
        }

        let ranges = [
            ("Aggressive", self.aggressive_speed_min, self.aggressive_speed_max),
            ("Slow", self.slow_speed_min, self.slow_speed_max),
        ];
        for (name, min, max) in ranges {
            if !(min.is_finite() && max.is_finite() && min < max) {
                return Err(ConfigError::EmptySpeedRange { name, min, max });
            }
        }

        if self.player_start_lane >= self.lane_count {
            return Err(ConfigError::StartLaneOutOfRange {
                lane: self.player_start_lane,
                lane_count: self.lane_count,
            });
        }

        Ok(())
    }

    /// Width of a single lane
    pub fn lane_width(&self) -> f32 {
        self.canvas_width / self.lane_count as f32
    }

    /// Left x that centres a vehicle of `width` in `lane`
    pub fn lane_x(&self, lane: u32, width: f32) -> f32 {
        lane as f32 * self.lane_width() + (self.lane_width() - width) / 2.0
    }

    /// Lane containing the horizontal coordinate `x`
    pub fn lane_at(&self, x: f32) -> u32 {
        let lane = (x / self.lane_width()).floor();
        (lane.max(0.0) as u32).min(self.lane_count - 1)
    }

    /// Leftmost x the player may occupy
    pub fn min_player_x(&self) -> f32 {
        self.side_margin
    }

    /// Rightmost x the player may occupy
    pub fn max_player_x(&self) -> f32 {
        self.canvas_width - self.player_width - self.side_margin
    }

    /// Frames between spawns at the given player speed
    pub fn spawn_threshold(&self, player_speed: f32) -> f32 {
        (self.spawn_base_threshold - player_speed * self.spawn_speed_factor)
            .max(self.spawn_min_threshold)
    }

    /// Opponents below this y have left the visible area
    pub fn despawn_below(&self) -> f32 {
        self.canvas_height + self.despawn_margin
    }

    /// Opponents above this y have receded out of reach
    pub fn despawn_above(&self) -> f32 {
        -(self.car_height + self.spawn_jitter + self.despawn_margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RoadConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lane_width(), 150.0);
        assert_eq!(config.lane_x(1, 60.0), 195.0);
    }

    #[test]
    fn test_lane_at() {
        let config = RoadConfig::default();
        assert_eq!(config.lane_at(0.0), 0);
        assert_eq!(config.lane_at(225.0), 1);
        assert_eq!(config.lane_at(599.0), 3);
        assert_eq!(config.lane_at(-20.0), 0);
        assert_eq!(config.lane_at(10_000.0), 3);
    }

    #[test]
    fn test_spawn_threshold_floors() {
        let config = RoadConfig::default();
        assert_eq!(config.spawn_threshold(0.0), 100.0);
        assert_eq!(config.spawn_threshold(25.0), 50.0);
        assert_eq!(config.spawn_threshold(1000.0), 20.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RoadConfig::from_json(r#"{ "lane_count": 3, "canvas_width": 450 }"#)
            .expect("valid config");
        assert_eq!(config.lane_count, 3);
        assert_eq!(config.max_speed, MAX_SPEED);
    }

    #[test]
    fn test_rejects_bad_configs() {
        assert!(matches!(
            RoadConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));

        let config = RoadConfig {
            lane_count: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoLanes)));

        let config = RoadConfig {
            lane_count: 20,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LaneTooNarrow { .. })
        ));

        let config = RoadConfig {
            slow_speed_min: 9.0,
            slow_speed_max: 9.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptySpeedRange { name: "Slow", .. })
        ));

        let config = RoadConfig {
            reference_frame_ms: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "reference_frame_ms", .. })
        ));

        for json in [r#"{ "drag": -0.5 }"#, r#"{ "drag": 1.5 }"#, r#"{ "wall_friction": 0 }"#] {
            assert!(matches!(
                RoadConfig::from_json(json),
                Err(ConfigError::NotAFraction { .. })
            ));
        }

        assert!(matches!(
            RoadConfig::from_json(r#"{ "particle_decay": -0.02 }"#),
            Err(ConfigError::NonPositive { name: "particle_decay", .. })
        ));

        for (json, field) in [
            (r#"{ "acceleration": -0.2 }"#, "acceleration"),
            (r#"{ "braking": -1 }"#, "braking"),
            (r#"{ "spawn_lane_buffer": -150 }"#, "spawn_lane_buffer"),
            (r#"{ "despawn_margin": -1 }"#, "despawn_margin"),
        ] {
            match RoadConfig::from_json(json) {
                Err(ConfigError::Negative { name, .. }) => assert_eq!(name, field),
                other => panic!("{} accepted: {:?}", field, other.map(|_| ())),
            }
        }

        let config = RoadConfig {
            player_start_lane: 4,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartLaneOutOfRange { .. })
        ));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(GameMode::from_str("TIME_TRIAL"), Some(GameMode::TimeTrial));
        assert_eq!(GameMode::from_str("traffic"), Some(GameMode::Traffic));
        assert_eq!(GameMode::from_str("drift"), None);
        assert!(GameMode::TimeTrial.is_timed());
        assert!(!GameMode::Traffic.is_timed());
    }
}
