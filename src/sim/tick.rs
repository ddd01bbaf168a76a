//! Per-frame simulation step
//!
//! Core game loop that advances the world by one variable-length frame.
//! Step order matters: later steps read what earlier ones wrote.

use serde::{Deserialize, Serialize};

use super::collision::first_overlap;
use super::particles;
use super::spawn::spawn_opponent;
use super::state::{RunStatistics, SimPhase, World};
use crate::config::GameMode;
use crate::{sanitize_delta_ms, wrap_offset};

/// Control intents held during this frame (already debounced by the host)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// One-shot pause toggle
    pub pause: bool,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalReason {
    Collision,
    Timeout,
}

/// Emitted exactly once, on the frame a run ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalEvent {
    pub reason: TerminalReason,
    pub mode: GameMode,
    /// Final statistics, high score already updated
    pub stats: RunStatistics,
}

/// Advance the world by `delta_ms` of wall-clock time
///
/// Returns the terminal event on the frame the run ends. Paused and
/// terminated worlds are left untouched (apart from the pause toggle).
pub fn advance(world: &mut World, input: &TickInput, delta_ms: f32) -> Option<TerminalEvent> {
    if input.pause {
        world.toggle_pause();
    }
    if world.phase != SimPhase::Running {
        return None;
    }

    if !(delta_ms >= 0.0 && delta_ms.is_finite()) {
        log::debug!("Clamping invalid frame delta {} to 0", delta_ms);
    }
    let delta_ms = sanitize_delta_ms(delta_ms);
    // Frame-rate independent step (1.0 at the reference frame rate)
    let dt = delta_ms / world.config.reference_frame_ms;

    drive_player(world, input, dt);
    scroll_road(world, dt);

    world.spawn_timer += dt;
    if world.spawn_timer > world.config.spawn_threshold(world.player.speed) {
        spawn_opponent(world);
        world.spawn_timer = 0.0;
    }

    move_traffic(world, dt);

    if first_overlap(&world.player, &world.opponents).is_some() {
        let burst = particles::explosion(
            &mut world.rng,
            world.player.center(),
            world.player.color,
            world.config.explosion_particles,
        );
        world.particles.extend(burst);
        return Some(terminate(world, TerminalReason::Collision));
    }

    let drift = world.player.speed * world.config.scroll_factor * dt;
    particles::integrate(&mut world.particles, dt, drift, world.config.particle_decay);

    let stats = &mut world.stats;
    stats.distance += world.player.speed * world.config.distance_factor * dt;
    stats.speed = world.player.speed;
    stats.score = stats.distance.floor() as u64;

    let mut out_of_time = false;
    if let Some(time_left) = stats.time_left.as_mut() {
        *time_left -= delta_ms / 1000.0;
        if *time_left <= 0.0 {
            *time_left = 0.0;
            out_of_time = true;
        }
    }

    out_of_time.then(|| terminate(world, TerminalReason::Timeout))
}

/// Throttle, brake, drag and steering for the player car
fn drive_player(world: &mut World, input: &TickInput, dt: f32) {
    let config = &world.config;
    let player = &mut world.player;

    if input.accelerate {
        player.speed += config.acceleration * dt;
    } else if input.brake {
        player.speed -= config.braking * dt;
    } else {
        player.speed *= config.drag;
    }
    player.speed = player.speed.clamp(0.0, config.max_speed);

    // No steering while (nearly) stopped
    if player.speed > config.min_steer_speed {
        if input.steer_left {
            player.pos.x -= config.turn_speed * dt;
        }
        if input.steer_right {
            player.pos.x += config.turn_speed * dt;
        }
    }

    // Scraping the grass costs speed
    let (min_x, max_x) = (config.min_player_x(), config.max_player_x());
    if player.pos.x < min_x {
        player.pos.x = min_x;
        player.speed *= config.wall_friction;
    }
    if player.pos.x > max_x {
        player.pos.x = max_x;
        player.speed *= config.wall_friction;
    }

    player.lane = config.lane_at(player.center().x);
}

fn scroll_road(world: &mut World, dt: f32) {
    let scroll = world.player.speed * world.config.scroll_factor * dt;
    world.road_offset = wrap_offset(world.road_offset + scroll, world.config.road_marker_period);
}

/// Move traffic relative to the player and drop cars that left the road
fn move_traffic(world: &mut World, dt: f32) {
    let config = &world.config;
    let player_speed = world.player.speed;

    for opp in world.opponents.iter_mut() {
        // Slower cars come toward the player, faster ones pull away
        let relative = player_speed - opp.speed * config.opponent_speed_damping;
        opp.pos.y += relative * config.scroll_factor * dt;
    }

    let (above, below) = (config.despawn_above(), config.despawn_below());
    world
        .opponents
        .retain(|opp| opp.pos.y < below && opp.pos.y > above);
}

fn terminate(world: &mut World, reason: TerminalReason) -> TerminalEvent {
    world.phase = SimPhase::Terminated;
    world.stats.high_score = world.stats.high_score.max(world.stats.score);

    log::info!(
        "{} run over ({:?}): score {}, distance {:.1}",
        world.mode.as_str(),
        reason,
        world.stats.score,
        world.stats.distance
    );

    TerminalEvent {
        reason,
        mode: world.mode,
        stats: world.stats,
    }
}
