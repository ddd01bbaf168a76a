//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `advance` call per display frame, never re-entered
//! - Seeded RNG only
//! - No rendering or platform dependencies
//! - The presentation layer only ever sees copies (`WorldSnapshot`, `RunStatistics`)

pub mod collision;
pub mod particles;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use snapshot::WorldSnapshot;
pub use state::{Color, Particle, RunStatistics, SimPhase, Vehicle, VehicleRole, World};
pub use tick::{TerminalEvent, TerminalReason, TickInput, advance};

impl World {
    /// Advance one frame; see [`tick::advance`]
    pub fn advance(&mut self, input: &TickInput, delta_ms: f32) -> Option<TerminalEvent> {
        tick::advance(self, input, delta_ms)
    }
}
