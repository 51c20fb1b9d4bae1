//! Falling snow particles and the wind that pushes them around.
//!
//! Particles are transient: they free-fall, get nudged by drift and wind,
//! wrap around the screen horizontally, and respawn at the top after landing
//! or leaving the bottom edge. Speeds are calibrated in pixels per nominal
//! tick (see [`crate::NOMINAL_TICK_HZ`]).
use glam::Vec2;
use rand::rand_core::RngCore;

use crate::random::{rand01, rand_range};
use crate::NOMINAL_TICK_HZ;

/// Slack past the screen edges before wrap or respawn kicks in.
pub const EDGE_SLACK: f32 = 10.0;

/// One falling snowflake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Screen-space position, y-up.
    pub position: Vec2,
    /// Visual diameter; also scales the settled deposit.
    pub size: f32,
    /// Fall speed in pixels per nominal tick.
    pub speed: f32,
    /// Constant horizontal drift in pixels per nominal tick.
    pub drift: f32,
    /// Rendering opacity.
    pub opacity: f32,
    /// False once settled; such particles are skipped until respawned.
    pub falling: bool,
}

impl Particle {
    /// Spawn a particle somewhere on screen, or just above the top edge.
    pub fn spawn(extent: Vec2, at_top: bool, rng: &mut dyn RngCore) -> Self {
        let x = rand01(rng) * extent.x;
        let y = if at_top {
            extent.y
        } else {
            rand01(rng) * extent.y
        };
        let size = rand_range(rng, 2.0, 6.0);
        let speed = rand_range(rng, 1.0, 3.0) * (size / 6.0);
        let drift = rand_range(rng, -0.5, 0.5);
        let opacity = rand_range(rng, 0.6, 1.0);

        Self {
            position: Vec2::new(x, y),
            size,
            speed,
            drift,
            opacity,
            falling: true,
        }
    }

    /// One step of free flight under the given wind effect.
    pub fn integrate(&mut self, delta_time: f32, wind_effect: f32) {
        let frames = delta_time * NOMINAL_TICK_HZ;
        self.position.y -= self.speed * frames;
        self.position.x += (self.drift + wind_effect) * frames;
    }
}

/// Sinusoidal wind oscillation shared by all particles.
#[derive(Debug, Clone, Copy)]
pub struct Wind {
    pub enabled: bool,
    phase: f32,
}

impl Wind {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            phase: 0.0,
        }
    }

    /// Advance the oscillation and return the horizontal push for this tick,
    /// in pixels per nominal tick.
    pub fn advance(&mut self, delta_time: f32) -> f32 {
        self.phase += 0.02 * delta_time * NOMINAL_TICK_HZ;
        if self.enabled {
            self.phase.sin() * 0.5
        } else {
            0.0
        }
    }
}

/// The set of live particles over a screen extent.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    extent: Vec2,
}

impl ParticleField {
    /// Populate `count` particles scattered over the whole screen.
    pub fn new(extent: Vec2, count: usize, rng: &mut dyn RngCore) -> Self {
        let mut field = Self {
            particles: Vec::new(),
            extent,
        };
        field.resize(count, rng);
        field
    }

    /// Replace the population wholesale, as an intensity change does.
    pub fn resize(&mut self, count: usize, rng: &mut dyn RngCore) {
        self.particles.clear();
        for _ in 0..count {
            self.particles.push(Particle::spawn(self.extent, false, rng));
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Respawn the particle at `index` just above the top edge.
    pub(crate) fn respawn_at_top(&mut self, index: usize, rng: &mut dyn RngCore) {
        let extent = self.extent;
        self.particles[index] = Particle::spawn(extent, true, rng);
    }

    /// Wrap a particle that drifted past a vertical screen edge.
    pub(crate) fn wrap_horizontal(extent: Vec2, particle: &mut Particle) {
        if particle.position.x < -EDGE_SLACK {
            particle.position.x = extent.x + EDGE_SLACK;
        } else if particle.position.x > extent.x + EDGE_SLACK {
            particle.position.x = -EDGE_SLACK;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn spawn_ranges_match_the_presets() {
        let mut rng = StdRng::seed_from_u64(6);
        let extent = Vec2::new(1440.0, 900.0);
        for _ in 0..500 {
            let p = Particle::spawn(extent, false, &mut rng);
            assert!((0.0..extent.x).contains(&p.position.x));
            assert!((0.0..extent.y).contains(&p.position.y));
            assert!((2.0..6.0).contains(&p.size));
            assert!(p.speed >= 1.0 * (p.size / 6.0) && p.speed < 3.0 * (p.size / 6.0));
            assert!((-0.5..0.5).contains(&p.drift));
            assert!((0.6..1.0).contains(&p.opacity));
            assert!(p.falling);
        }
    }

    #[test]
    fn top_spawns_start_at_the_top_edge() {
        let mut rng = StdRng::seed_from_u64(6);
        let extent = Vec2::new(1440.0, 900.0);
        let p = Particle::spawn(extent, true, &mut rng);
        assert_eq!(p.position.y, extent.y);
    }

    #[test]
    fn integration_falls_and_drifts() {
        let mut p = Particle {
            position: Vec2::new(100.0, 500.0),
            size: 4.0,
            speed: 2.0,
            drift: 0.25,
            opacity: 1.0,
            falling: true,
        };
        // One nominal frame.
        p.integrate(1.0 / 60.0, 0.5);
        assert_eq!(p.position.y, 498.0);
        assert_eq!(p.position.x, 100.75);
    }

    #[test]
    fn disabled_wind_has_no_push() {
        let mut wind = Wind::new(false);
        for _ in 0..100 {
            assert_eq!(wind.advance(1.0 / 60.0), 0.0);
        }

        let mut wind = Wind::new(true);
        let mut saw_push = false;
        for _ in 0..100 {
            let effect = wind.advance(1.0 / 60.0);
            assert!(effect.abs() <= 0.5);
            saw_push |= effect.abs() > 0.01;
        }
        assert!(saw_push);
    }

    #[test]
    fn horizontal_wrap_swaps_edges() {
        let extent = Vec2::new(800.0, 600.0);
        let mut p = Particle::spawn(extent, false, &mut StdRng::seed_from_u64(1));

        p.position.x = -EDGE_SLACK - 1.0;
        ParticleField::wrap_horizontal(extent, &mut p);
        assert_eq!(p.position.x, extent.x + EDGE_SLACK);

        p.position.x = extent.x + EDGE_SLACK + 1.0;
        ParticleField::wrap_horizontal(extent, &mut p);
        assert_eq!(p.position.x, -EDGE_SLACK);
    }

    #[test]
    fn resize_replaces_the_population() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = ParticleField::new(Vec2::new(800.0, 600.0), 100, &mut rng);
        assert_eq!(field.len(), 100);
        field.resize(250, &mut rng);
        assert_eq!(field.len(), 250);
    }
}
