//! Crash explosion particles

use glam::Vec2;
use rand::Rng;

use super::state::{Color, Particle};
use crate::consts::{PARTICLE_SIZE_MAX, PARTICLE_SIZE_MIN, PARTICLE_SPEED_MAX, PARTICLE_SPEED_MIN};

/// Burst of `count` particles flying out from `center`
pub fn explosion<R: Rng>(rng: &mut R, center: Vec2, color: Color, count: usize) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(PARTICLE_SPEED_MIN..PARTICLE_SPEED_MAX);
            Particle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life: 1.0,
                size: rng.random_range(PARTICLE_SIZE_MIN..PARTICLE_SIZE_MAX),
            }
        })
        .collect()
}

/// Move particles, sweep them down with the road and fade them out
///
/// `drift` is how far the road scrolled this step; dead particles are removed.
pub fn integrate(particles: &mut Vec<Particle>, dt: f32, drift: f32, decay: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.pos.y += drift;
        particle.life = (particle.life - decay * dt).max(0.0);
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_explosion_batch() {
        let mut rng = Pcg32::seed_from_u64(3);
        let center = Vec2::new(100.0, 200.0);
        let batch = explosion(&mut rng, center, Color::PLAYER, 30);
        assert_eq!(batch.len(), 30);
        for p in &batch {
            assert_eq!(p.pos, center);
            assert_eq!(p.life, 1.0);
            assert_eq!(p.color, Color::PLAYER);
            let speed = p.vel.length();
            assert!((PARTICLE_SPEED_MIN - 1e-3..PARTICLE_SPEED_MAX + 1e-3).contains(&speed));
            assert!((PARTICLE_SIZE_MIN..PARTICLE_SIZE_MAX).contains(&p.size));
        }
    }

    #[test]
    fn test_integrate_moves_and_decays() {
        let mut particles = vec![Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -2.0),
            color: Color::PLAYER,
            life: 1.0,
            size: 4.0,
        }];
        integrate(&mut particles, 1.0, 10.0, 0.02);
        assert_eq!(particles[0].pos, Vec2::new(1.0, 8.0));
        assert!((particles[0].life - 0.98).abs() < 1e-6);
    }

    #[test]
    fn test_dead_particles_removed() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut particles = explosion(&mut rng, Vec2::ZERO, Color::SLOW, 20);
        let mut last = particles.len();
        // 1.0 / 0.02 = 50 frames of life
        for _ in 0..60 {
            integrate(&mut particles, 1.0, 0.0, 0.02);
            assert!(particles.len() <= last);
            assert!(particles.iter().all(|p| p.life > 0.0));
            last = particles.len();
        }
        assert!(particles.is_empty());
    }
}
