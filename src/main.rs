//! Lane Racer headless driver
//!
//! Runs one session per game mode with a simple autopilot at 60 Hz and
//! reports the results. Usage: `lane-racer [config.json]`

use std::time::{SystemTime, UNIX_EPOCH};

use lane_racer::consts::REFERENCE_FRAME_MS;
use lane_racer::sim::{TerminalEvent, TickInput, World, WorldSnapshot};
use lane_racer::{ConfigError, GameMode, HighScores, RoadConfig};

/// Give up on a session after five minutes of simulated driving
const MAX_FRAMES: u32 = 60 * 60 * 5;
/// Cap on post-crash frames spent letting the explosion fade
const MAX_SETTLE_FRAMES: u32 = 600;
/// How far up the road the autopilot looks for traffic
const LOOKAHEAD: f32 = 360.0;

fn main() {
    env_logger::init();
    log::info!("Lane Racer (headless) starting...");

    let config = load_config(std::env::args().nth(1));
    let mut scores = HighScores::new();

    for mode in [GameMode::Traffic, GameMode::TimeTrial] {
        let seed = run_seed();
        match run_session(&config, mode, seed, scores.best_for(mode)) {
            Ok(Some(event)) => {
                let rank = scores.record(&event);
                println!(
                    "{:<10} {:?}: score {} ({:.2}km), best {}{}",
                    mode.as_str(),
                    event.reason,
                    event.stats.score,
                    event.stats.distance / 100.0,
                    event.stats.high_score,
                    rank.map(|r| format!(", leaderboard #{}", r))
                        .unwrap_or_default()
                );
            }
            Ok(None) => println!(
                "{:<10} autopilot still driving after {} frames",
                mode.as_str(),
                MAX_FRAMES
            ),
            Err(e) => {
                log::error!("Can't start {} run: {}", mode.as_str(), e);
                return;
            }
        }
    }

    println!("Top score: {}", scores.top_score());
}

/// Load a JSON config, falling back to defaults when it can't be used
fn load_config(path: Option<String>) -> RoadConfig {
    let Some(path) = path else {
        log::info!("Using default config");
        return RoadConfig::default();
    };

    match std::fs::read_to_string(&path) {
        Ok(json) => match RoadConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path, e);
                RoadConfig::default()
            }
        },
        Err(e) => {
            log::warn!("Can't read config {}: {}", path, e);
            RoadConfig::default()
        }
    }
}

fn run_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x1a2e)
}

/// Drive one run to its end; None if the autopilot outlasted MAX_FRAMES
fn run_session(
    config: &RoadConfig,
    mode: GameMode,
    seed: u64,
    high_score: u64,
) -> Result<Option<TerminalEvent>, ConfigError> {
    let mut world = World::new(config.clone(), mode, seed, high_score)?;

    for _ in 0..MAX_FRAMES {
        let input = autopilot(&world.snapshot(), world.config());
        if let Some(event) = world.advance(&input, REFERENCE_FRAME_MS) {
            let mut frames = 0;
            while world.particle_count() > 0 && frames < MAX_SETTLE_FRAMES {
                world.settle_particles(REFERENCE_FRAME_MS);
                frames += 1;
            }
            log::debug!("Explosion faded after {} frames", frames);
            return Ok(Some(event));
        }
    }

    Ok(None)
}

/// Stay on the gas and dodge into the clearest neighbouring lane
fn autopilot(snap: &WorldSnapshot, config: &RoadConfig) -> TickInput {
    let player = &snap.player;

    // Closest car ahead in each lane (distance from its rear bumper to our nose)
    let gap_in = |lane: u32| -> f32 {
        snap.opponents
            .iter()
            .filter(|o| o.lane == lane)
            .map(|o| player.pos.y - (o.pos.y + o.size.y))
            .filter(|gap| *gap > -player.size.y)
            .fold(f32::INFINITY, f32::min)
    };

    let current = gap_in(player.lane);
    let target_lane = if current < LOOKAHEAD {
        neighbours(player.lane, config.lane_count)
            .into_iter()
            .flatten()
            .map(|lane| (lane, gap_in(lane)))
            .filter(|(_, gap)| *gap > current)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(lane, _)| lane)
            .unwrap_or(player.lane)
    } else {
        player.lane
    };

    let target_x = config.lane_x(target_lane, player.size.x);
    let dx = target_x - player.pos.x;
    let boxed_in = target_lane == player.lane && current < LOOKAHEAD / 2.0;

    TickInput {
        accelerate: !boxed_in,
        brake: boxed_in,
        steer_left: dx < -config.turn_speed / 2.0,
        steer_right: dx > config.turn_speed / 2.0,
        pause: false,
    }
}

fn neighbours(lane: u32, lane_count: u32) -> [Option<u32>; 2] {
    [
        lane.checked_sub(1),
        (lane + 1 < lane_count).then_some(lane + 1),
    ]
}
