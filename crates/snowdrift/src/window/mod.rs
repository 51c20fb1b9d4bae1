//! Window-directory snapshots and stacking predicates.
//!
//! The platform query service (out of process, latency-bound) is abstracted
//! behind [`WindowSource`]; [`CachedWindowDirectory`] rate-limits it and
//! serves a possibly stale snapshot between refreshes. The predicates here
//! answer the two questions the simulation keeps asking the window stack:
//! which window is frontmost under a falling flake, and whether a surface
//! point is covered by a window stacked further in front.
use glam::Vec2;

use crate::geom::Rect;

pub mod directory;

pub use directory::{CachedWindowDirectory, DirectoryConfig, StaticWindows, WindowSource};

/// Opaque stable identifier for an on-screen window, supplied by the
/// windowing-system collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowId(pub u64);

/// One visible window in a directory snapshot.
///
/// `stack_rank` orders windows front to back: 0 is frontmost. A snapshot is
/// immutable for the tick it was taken in; the next refresh replaces it
/// wholesale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowSnapshot {
    pub id: WindowId,
    pub frame: Rect,
    pub stack_rank: u32,
}

impl WindowSnapshot {
    pub fn new(id: WindowId, frame: Rect, stack_rank: u32) -> Self {
        Self {
            id,
            frame,
            stack_rank,
        }
    }
}

/// Find the frontmost window whose horizontal extent contains `point.x` and
/// whose top edge lies within `[top - band_below, top + band_above]` of
/// `point.y`.
///
/// Ties on position are broken by stack rank; the lowest rank (most in front)
/// wins.
pub fn frontmost_window_at(
    point: Vec2,
    windows: &[WindowSnapshot],
    band_below: f32,
    band_above: f32,
) -> Option<&WindowSnapshot> {
    windows
        .iter()
        .filter(|w| {
            let top = w.frame.top();
            w.frame.contains_x(point.x)
                && point.y >= top - band_below
                && point.y <= top + band_above
        })
        .min_by_key(|w| w.stack_rank)
}

/// Whether `point` is covered by any window stacked strictly in front of the
/// owner rank.
pub fn is_point_occluded(point: Vec2, owner_rank: u32, windows: &[WindowSnapshot]) -> bool {
    windows
        .iter()
        .any(|w| w.stack_rank < owner_rank && w.frame.contains(point))
}
