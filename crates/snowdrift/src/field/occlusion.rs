//! Occlusion: removing snow the window stack has covered.
//!
//! Each column's visible top surface is sampled at four fixed points; only a
//! column with every sample covered by a strictly-front window is dropped.
//! Single-point tests flicker columns in and out near partial overlaps; the
//! four-point probe is an approximation, not an exact intersection test.
use glam::Vec2;
use tracing::debug;

use crate::field::{FieldParams, PileStore};
use crate::window::{is_point_occluded, WindowSnapshot};

/// What one occlusion pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OcclusionSummary {
    pub removed_columns: usize,
    pub removed_piles: usize,
}

/// Drop piles whose window left the snapshot, refresh the cached frames of
/// those still present, and remove columns whose whole surface is covered by
/// frontward windows. Idempotent for a fixed snapshot.
pub fn filter_occluded(
    store: &mut PileStore,
    windows: &[WindowSnapshot],
    params: &FieldParams,
) -> OcclusionSummary {
    let mut summary = OcclusionSummary::default();

    store.retain(|id, pile| {
        let Some(snapshot) = windows.iter().find(|w| w.id == *id) else {
            debug!("Window {id:?} left the directory; dropping its pile.");
            summary.removed_piles += 1;
            return false;
        };
        pile.frame = snapshot.frame;

        let top = pile.frame.top();
        let left = pile.frame.min_x();
        let width = params.column_width;
        let rank = snapshot.stack_rank;

        let before = pile.columns.len();
        pile.columns.retain(|index, column| {
            let x0 = left + *index as f32 * width;
            let surface = top + column.height;
            let samples = [
                Vec2::new(x0, surface),
                Vec2::new(x0 + width, surface),
                Vec2::new(x0 + width * 0.5, surface),
                Vec2::new(x0 + width * 0.5, top + column.height * 0.5),
            ];
            !samples
                .iter()
                .all(|point| is_point_occluded(*point, rank, windows))
        });
        summary.removed_columns += before - pile.columns.len();

        if pile.is_empty() {
            summary.removed_piles += 1;
            false
        } else {
            true
        }
    });

    summary
}
