//! Landing detection for falling particles.
//!
//! A particle lands on the frontmost window under it once it reaches the
//! current snow surface. The test band extends downward by two frames of
//! vertical travel so a fast particle cannot step over the surface between
//! ticks, and the candidate search band spans the whole possible pile height
//! so a grown pile keeps collecting instead of being tunneled through.
use glam::Vec2;

use crate::field::{FieldParams, PileStore};
use crate::geom::Rect;
use crate::particle::Particle;
use crate::window::{frontmost_window_at, is_point_occluded, WindowId, WindowSnapshot};

/// Vertical slack around the landing surface, in screen units.
pub const COLLISION_TOLERANCE: f32 = 5.0;

/// A decided landing. The particle is consumed (respawned at the top) on
/// every landing, whether or not snow was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Landing {
    /// Window the particle came to rest on.
    pub window_id: WindowId,
    /// That window's frame at landing time.
    pub frame: Rect,
    /// Deposit point on the snow surface.
    pub point: Vec2,
    /// A frontward window covers the landing point; the particle vanishes
    /// out of view and no snow is recorded.
    pub occluded: bool,
}

/// Test one falling particle against the window stack.
///
/// Returns `None` while the particle is still in free flight.
pub fn find_landing(
    particle: &Particle,
    windows: &[WindowSnapshot],
    store: &PileStore,
    params: &FieldParams,
) -> Option<Landing> {
    if !particle.falling {
        return None;
    }

    let candidate = frontmost_window_at(
        particle.position,
        windows,
        COLLISION_TOLERANCE,
        params.max_height + COLLISION_TOLERANCE,
    )?;

    let snow_height = store.get(candidate.id).map_or(0.0, |p| p.max_height());
    let collision_y = candidate.frame.top() + snow_height;

    // Two frames of travel below the surface still count as a hit.
    if particle.position.y > collision_y
        || particle.position.y < collision_y - particle.speed * 2.0
    {
        return None;
    }

    let point = Vec2::new(particle.position.x, collision_y);
    let occluded = is_point_occluded(point, candidate.stack_rank, windows);
    Some(Landing {
        window_id: candidate.id,
        frame: candidate.frame,
        point,
        occluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Column;
    use crate::window::WindowSnapshot;

    fn flake(x: f32, y: f32, speed: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            size: 4.0,
            speed,
            drift: 0.0,
            opacity: 1.0,
            falling: true,
        }
    }

    fn snap(id: u64, rect: Rect, rank: u32) -> WindowSnapshot {
        WindowSnapshot::new(WindowId(id), rect, rank)
    }

    #[test]
    fn particle_on_a_bare_top_edge_lands() {
        let params = FieldParams::default();
        let store = PileStore::new();
        let windows = vec![snap(1, Rect::new(100.0, 0.0, 200.0, 100.0), 0)];

        // Exactly at top edge + pile height (zero).
        let landing = find_landing(&flake(150.0, 100.0, 2.0), &windows, &store, &params)
            .expect("expected a landing");
        assert_eq!(landing.window_id, WindowId(1));
        assert_eq!(landing.point, Vec2::new(150.0, 100.0));
        assert!(!landing.occluded);
    }

    #[test]
    fn free_flight_above_the_surface() {
        let params = FieldParams::default();
        let store = PileStore::new();
        let windows = vec![snap(1, Rect::new(100.0, 0.0, 200.0, 100.0), 0)];

        assert!(find_landing(&flake(150.0, 104.0, 1.5), &windows, &store, &params).is_none());
        assert!(find_landing(&flake(99.0, 100.0, 1.5), &windows, &store, &params).is_none());
    }

    #[test]
    fn fast_particles_are_not_skipped_past_the_surface() {
        let params = FieldParams::default();
        let store = PileStore::new();
        let windows = vec![snap(1, Rect::new(100.0, 0.0, 200.0, 100.0), 0)];

        // One tick below the surface, still inside the speed*2 band.
        assert!(find_landing(&flake(150.0, 97.0, 3.0), &windows, &store, &params).is_some());
        // Far below the band: missed.
        assert!(find_landing(&flake(150.0, 93.0, 3.0), &windows, &store, &params).is_none());
    }

    #[test]
    fn grown_piles_raise_the_collision_surface() {
        let params = FieldParams::default();
        let mut store = PileStore::new();
        let frame = Rect::new(100.0, 0.0, 200.0, 100.0);
        let pile = store.upsert(WindowId(1), frame);
        pile.columns.insert(
            10,
            Column {
                height: 40.0,
                age: 0.0,
            },
        );
        let windows = vec![snap(1, frame, 0)];

        let landing = find_landing(&flake(150.0, 140.0, 2.0), &windows, &store, &params)
            .expect("expected a landing on the pile surface");
        assert_eq!(landing.point.y, 140.0);

        // The bare top edge is now deep inside the pile: no landing there.
        assert!(find_landing(&flake(150.0, 100.0, 2.0), &windows, &store, &params).is_none());
    }

    #[test]
    fn frontmost_window_wins_the_landing() {
        let params = FieldParams::default();
        let store = PileStore::new();
        let frame = Rect::new(100.0, 0.0, 200.0, 100.0);
        let windows = vec![snap(1, frame, 1), snap(2, frame, 0)];

        let landing = find_landing(&flake(150.0, 100.0, 2.0), &windows, &store, &params)
            .expect("expected a landing");
        assert_eq!(landing.window_id, WindowId(2));
    }

    #[test]
    fn occluded_landings_are_reported_but_flagged() {
        let params = FieldParams::default();
        let store = PileStore::new();
        let windows = vec![
            snap(1, Rect::new(100.0, 0.0, 200.0, 100.0), 1),
            // A frontmost window covering the landing point on window 1.
            snap(2, Rect::new(140.0, 60.0, 40.0, 50.0), 0),
        ];

        let landing = find_landing(&flake(150.0, 100.0, 2.0), &windows, &store, &params)
            .expect("landing is still decided when covered");
        assert_eq!(landing.window_id, WindowId(1));
        assert!(landing.occluded);
    }

    #[test]
    fn settled_particles_are_ignored() {
        let params = FieldParams::default();
        let store = PileStore::new();
        let windows = vec![snap(1, Rect::new(100.0, 0.0, 200.0, 100.0), 0)];

        let mut p = flake(150.0, 100.0, 2.0);
        p.falling = false;
        assert!(find_landing(&p, &windows, &store, &params).is_none());
    }
}
