//! The decorative sleigh: an interval-scheduled flight across the screen.
//!
//! Purely cosmetic; the simulation core never depends on it. Flights launch
//! at a random interval, cross left to right in a random altitude band, and
//! cycle sprite frames at a fixed cadence.
use glam::Vec2;
use rand::rand_core::RngCore;

use crate::random::rand_range;
use crate::NOMINAL_TICK_HZ;

/// Horizontal margin the sleigh starts and ends beyond the screen edges.
const OFFSCREEN_MARGIN: f32 = 200.0;
/// Sprite frame advance cadence, in nominal ticks.
const FRAME_CADENCE_TICKS: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct Sleigh {
    /// Screen-space position of the sprite origin.
    pub position: Vec2,
    /// Horizontal speed in pixels per nominal tick.
    pub speed: f32,
    /// Whether a flight is currently crossing the screen.
    pub active: bool,
    screen_extent: Vec2,
    sprite_frame_count: usize,
    current_frame: usize,
    frame_clock: f32,
    next_flight_in: f32,
}

impl Sleigh {
    pub fn new(screen_extent: Vec2, sprite_frame_count: usize, rng: &mut dyn RngCore) -> Self {
        Self {
            position: Vec2::new(-OFFSCREEN_MARGIN, screen_extent.y * 0.7),
            speed: 3.0,
            active: false,
            screen_extent,
            sprite_frame_count,
            current_frame: 0,
            frame_clock: 0.0,
            next_flight_in: rand_range(rng, 30.0, 120.0),
        }
    }

    /// Index of the sprite frame to draw.
    pub fn frame(&self) -> usize {
        self.current_frame
    }

    /// Seconds until the next flight launches, while idle.
    pub fn next_flight_in(&self) -> f32 {
        self.next_flight_in
    }

    /// Launch a flight now: offscreen left, random altitude band, random
    /// speed.
    pub fn start_flight(&mut self, rng: &mut dyn RngCore) {
        self.position.x = -OFFSCREEN_MARGIN;
        self.position.y = rand_range(rng, self.screen_extent.y * 0.3, self.screen_extent.y * 0.7);
        self.speed = rand_range(rng, 2.5, 4.5);
        self.active = true;
    }

    /// Advance the flight or the launch countdown by `delta_time` seconds.
    pub fn update(&mut self, delta_time: f32, rng: &mut dyn RngCore) {
        if !self.active {
            self.next_flight_in -= delta_time;
            if self.next_flight_in <= 0.0 {
                self.start_flight(rng);
                self.next_flight_in = rand_range(rng, 30.0, 120.0);
            }
            return;
        }

        let frames = delta_time * NOMINAL_TICK_HZ;
        self.position.x += self.speed * frames;

        self.frame_clock += frames;
        while self.frame_clock >= FRAME_CADENCE_TICKS {
            self.frame_clock -= FRAME_CADENCE_TICKS;
            self.current_frame = (self.current_frame + 1) % self.sprite_frame_count.max(1);
        }

        if self.position.x > self.screen_extent.x + OFFSCREEN_MARGIN {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn launches_after_the_scheduled_interval() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut sleigh = Sleigh::new(Vec2::new(1440.0, 900.0), 4, &mut rng);
        assert!(!sleigh.active);
        let wait = sleigh.next_flight_in();
        assert!((30.0..120.0).contains(&wait));

        sleigh.update(wait + 0.01, &mut rng);
        assert!(sleigh.active);
        assert_eq!(sleigh.position.x, -200.0);
        assert!((2.5..4.5).contains(&sleigh.speed));
        let band = 900.0 * 0.3..900.0 * 0.7;
        assert!(band.contains(&sleigh.position.y));
    }

    #[test]
    fn flight_crosses_and_deactivates() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut sleigh = Sleigh::new(Vec2::new(400.0, 300.0), 4, &mut rng);
        sleigh.start_flight(&mut rng);

        let mut ticks = 0;
        while sleigh.active && ticks < 100_000 {
            sleigh.update(DT, &mut rng);
            ticks += 1;
        }
        assert!(!sleigh.active, "flight never finished");
        assert!(sleigh.position.x > 400.0 + 200.0);
    }

    #[test]
    fn sprite_frames_cycle_at_the_cadence() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut sleigh = Sleigh::new(Vec2::new(10_000.0, 300.0), 4, &mut rng);
        sleigh.start_flight(&mut rng);
        assert_eq!(sleigh.frame(), 0);

        // Eight nominal ticks per frame advance.
        for _ in 0..8 {
            sleigh.update(DT, &mut rng);
        }
        assert_eq!(sleigh.frame(), 1);
        for _ in 0..16 {
            sleigh.update(DT, &mut rng);
        }
        assert_eq!(sleigh.frame(), 3);
        for _ in 0..8 {
            sleigh.update(DT, &mut rng);
        }
        assert_eq!(sleigh.frame(), 0);
    }

    #[test]
    fn idle_countdown_reschedules_after_a_flight() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut sleigh = Sleigh::new(Vec2::new(100.0, 100.0), 4, &mut rng);
        sleigh.update(sleigh.next_flight_in() + 0.01, &mut rng);
        assert!(sleigh.active);
        assert!((30.0..120.0).contains(&sleigh.next_flight_in()));
    }
}
