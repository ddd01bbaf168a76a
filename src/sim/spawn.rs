//! Traffic spawning
//!
//! New opponents enter above the top of the canvas in a lane that has no
//! car near the spawn zone, so the player never faces an unavoidable stack.

use glam::Vec2;
use rand::Rng;

use super::state::{Color, Vehicle, VehicleRole, World};

/// Lanes with no opponent inside the spawn buffer
pub fn free_lanes(world: &World) -> Vec<u32> {
    let buffer = world.config.spawn_lane_buffer;
    (0..world.config.lane_count)
        .filter(|&lane| {
            !world
                .opponents
                .iter()
                .any(|opp| opp.lane == lane && opp.pos.y < buffer)
        })
        .collect()
}

/// Try to add one opponent; returns its id, or None when every lane is blocked
pub fn spawn_opponent(world: &mut World) -> Option<u32> {
    let lanes = free_lanes(world);
    if lanes.is_empty() {
        log::trace!("All lanes blocked, skipping spawn");
        return None;
    }

    let config = &world.config;
    let rng = &mut world.rng;

    let lane = lanes[rng.random_range(0..lanes.len())];
    let (role, speed, color) = if rng.random_bool(0.5) {
        let speed = rng.random_range(config.aggressive_speed_min..config.aggressive_speed_max);
        let palette = &Color::AGGRESSIVE_PALETTE;
        (VehicleRole::Aggressive, speed, palette[rng.random_range(0..palette.len())])
    } else {
        let speed = rng.random_range(config.slow_speed_min..config.slow_speed_max);
        (VehicleRole::Slow, speed, Color::SLOW)
    };

    // Random extra height keeps arrivals from looking metronomic
    let jitter = if config.spawn_jitter > 0.0 {
        rng.random_range(0.0..config.spawn_jitter)
    } else {
        0.0
    };
    let pos = Vec2::new(
        config.lane_x(lane, config.car_width),
        -config.car_height - jitter,
    );
    let size = Vec2::new(config.car_width, config.car_height);

    let id = world.next_entity_id();
    world.opponents.push(Vehicle {
        id,
        pos,
        size,
        speed,
        lane,
        role,
        color,
    });
    log::debug!("Spawned {:?} #{} in lane {} at speed {:.1}", role, id, lane, speed);

    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameMode, RoadConfig};

    fn world() -> World {
        World::new(RoadConfig::default(), GameMode::Traffic, 42, 0).expect("valid config")
    }

    fn park(world: &mut World, lane: u32, y: f32) {
        let id = world.next_entity_id();
        let config = &world.config;
        world.opponents.push(Vehicle {
            id,
            pos: Vec2::new(config.lane_x(lane, config.car_width), y),
            size: Vec2::new(config.car_width, config.car_height),
            speed: 7.0,
            lane,
            role: VehicleRole::Slow,
            color: Color::SLOW,
        });
    }

    #[test]
    fn test_spawn_centres_in_free_lane_above_canvas() {
        let mut world = world();
        let id = spawn_opponent(&mut world).expect("empty road has free lanes");
        let opp = world.opponents.iter().find(|o| o.id == id).expect("spawned");
        let config = &world.config;

        assert!(opp.lane < config.lane_count);
        assert_eq!(opp.pos.x, config.lane_x(opp.lane, config.car_width));
        assert!(opp.pos.y <= -config.car_height);
        assert!(opp.pos.y > -config.car_height - config.spawn_jitter);
        match opp.role {
            VehicleRole::Aggressive => {
                assert!((10.0..15.0).contains(&opp.speed));
                assert!(Color::AGGRESSIVE_PALETTE.contains(&opp.color));
            }
            VehicleRole::Slow => {
                assert!((5.0..10.0).contains(&opp.speed));
                assert_eq!(opp.color, Color::SLOW);
            }
            VehicleRole::Player => panic!("spawner never creates players"),
        }
    }

    #[test]
    fn test_blocked_lanes_are_skipped() {
        let mut world = world();
        park(&mut world, 0, -150.0);
        park(&mut world, 2, 100.0);
        // Far down the road, doesn't block
        park(&mut world, 3, 400.0);
        assert_eq!(free_lanes(&world), vec![1, 3]);

        for _ in 0..20 {
            let before = world.opponents.len();
            if let Some(id) = spawn_opponent(&mut world) {
                let lane = world.opponents.iter().find(|o| o.id == id).map(|o| o.lane);
                assert!(matches!(lane, Some(1) | Some(3)));
                world.opponents.truncate(before);
            }
        }
    }

    #[test]
    fn test_spawn_skipped_when_all_lanes_blocked() {
        let mut world = world();
        for lane in 0..4 {
            park(&mut world, lane, 0.0);
        }
        assert_eq!(spawn_opponent(&mut world), None);
        assert_eq!(world.opponents.len(), 4);
    }

    #[test]
    fn test_spawned_cars_never_overlap() {
        let mut world = world();
        // Keep spawning until every lane is blocked
        while spawn_opponent(&mut world).is_some() {}
        assert_eq!(world.opponents.len(), 4);

        for (i, a) in world.opponents.iter().enumerate() {
            for b in world.opponents.iter().skip(i + 1) {
                assert!(!a.rect().overlaps(&b.rect()));
            }
        }
    }

    #[test]
    fn test_new_spawn_clears_existing_traffic() {
        let mut world = world();
        for round in 0..200 {
            // Scatter traffic down the road, then spawn on top of it
            world.opponents.clear();
            for lane in 0..4 {
                if (round + lane) % 3 != 0 {
                    park(&mut world, lane, 150.0 + (round * 37 % 500) as f32);
                }
            }
            if let Some(id) = spawn_opponent(&mut world) {
                let new = world.opponents.iter().find(|o| o.id == id).expect("spawned");
                assert!(
                    world
                        .opponents
                        .iter()
                        .filter(|o| o.id != id)
                        .all(|o| !o.rect().overlaps(&new.rect()))
                );
            }
        }
    }
}
