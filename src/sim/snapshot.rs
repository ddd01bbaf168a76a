//! Read-only world copies for the presentation layer

use serde::Serialize;

use super::state::{Particle, RunStatistics, SimPhase, Vehicle};
use crate::config::GameMode;

/// Everything needed to draw one frame and the HUD
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub phase: SimPhase,
    pub mode: GameMode,
    pub stats: RunStatistics,
    pub road_offset: f32,
    pub player: Vehicle,
    pub opponents: Vec<Vehicle>,
    pub particles: Vec<Particle>,
}

impl WorldSnapshot {
    /// Player first, then traffic
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        std::iter::once(&self.player).chain(self.opponents.iter())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
