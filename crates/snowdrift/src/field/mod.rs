//! Per-window snow height fields.
//!
//! Each window that has received snow owns a [`Pile`]: a sparse set of
//! fixed-width [`Column`]s keyed by an integer column index (offset divided
//! by column width), so key equality never depends on floating-point
//! identity. The engines operating on piles live in the
//! submodules: [`accretion`] adds mass, [`relax`] redistributes it along the
//! angle of repose, [`decay`] ages and melts it, and [`occlusion`] removes
//! what the window stack has covered.
use std::collections::hash_map;
use std::collections::{BTreeMap, HashMap};

use glam::Vec2;

use crate::error::{Error, Result};
use crate::geom::Rect;
use crate::window::WindowId;

pub mod accretion;
pub mod decay;
pub mod occlusion;
pub mod relax;

pub use accretion::DepositOutcome;
pub use decay::{DecayParams, DecaySummary};
pub use occlusion::OcclusionSummary;
pub use relax::{RelaxMode, SlopeProfile};

/// Geometry and lifetime parameters shared by every pile in a store.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldParams {
    /// Width of one snow column in screen units.
    pub column_width: f32,
    /// Upper bound for any column height.
    pub max_height: f32,
    /// Dead zone from either vertical window edge; keeps snow off rounded
    /// window corners.
    pub corner_margin: f32,
    /// Columns older than this are pruned regardless of height.
    pub max_age: f32,
    /// Columns at or below this height are pruned.
    pub min_column_height: f32,
    /// Fraction of a particle's size that becomes settled height.
    pub accretion_scale: f32,
    /// Pile age at which the rendering fade begins.
    pub fade_onset_age: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            column_width: 8.0,
            max_height: 80.0,
            corner_margin: 10.0,
            max_age: 300.0,
            min_column_height: 0.1,
            accretion_scale: 0.5,
            fade_onset_age: 240.0,
        }
    }
}

impl FieldParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the column width.
    pub fn with_column_width(mut self, column_width: f32) -> Self {
        self.column_width = column_width;
        self
    }

    /// Sets the maximum column height.
    pub fn with_max_height(mut self, max_height: f32) -> Self {
        self.max_height = max_height;
        self
    }

    /// Sets the corner dead-zone margin.
    pub fn with_corner_margin(mut self, corner_margin: f32) -> Self {
        self.corner_margin = corner_margin;
        self
    }

    /// Sets the maximum column age in seconds.
    pub fn with_max_age(mut self, max_age: f32) -> Self {
        self.max_age = max_age;
        self
    }

    /// Validates the parameters, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.column_width <= 0.0 {
            return Err(Error::InvalidConfig("column_width must be > 0".into()));
        }
        if self.max_height <= 0.0 {
            return Err(Error::InvalidConfig("max_height must be > 0".into()));
        }
        if self.corner_margin < 0.0 {
            return Err(Error::InvalidConfig("corner_margin must be >= 0".into()));
        }
        if self.max_age <= 0.0 {
            return Err(Error::InvalidConfig("max_age must be > 0".into()));
        }
        Ok(())
    }
}

/// Map a window-relative x offset to its column index.
///
/// A point exactly on a column boundary belongs to the column on its left,
/// so the depositable span `[margin, width - margin]` stays closed on both
/// ends without ever minting a column past it.
pub(crate) fn column_index(rel_x: f32, column_width: f32) -> i32 {
    let q = rel_x / column_width;
    let floor = q.floor();
    if q > 0.0 && q == floor {
        floor as i32 - 1
    } else {
        floor as i32
    }
}

/// Smallest horizontal unit of settled snow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    /// Snow height above the window's top edge, in `[0, max_height]`.
    pub height: f32,
    /// Seconds since this column last received a deposit.
    pub age: f32,
}

/// Accumulated snow on one window: a sparse, ordered set of columns.
#[derive(Debug, Clone)]
pub struct Pile {
    /// Identifier of the owning window.
    pub window_id: WindowId,
    /// Latest known frame of the owning window, refreshed every tick the
    /// window is visible.
    pub frame: Rect,
    /// Seconds since the pile was born.
    pub total_age: f32,
    pub(crate) columns: BTreeMap<i32, Column>,
}

impl Pile {
    pub fn new(window_id: WindowId, frame: Rect) -> Self {
        Self {
            window_id,
            frame,
            total_age: 0.0,
            columns: BTreeMap::new(),
        }
    }

    /// Columns in ascending offset order.
    pub fn columns(&self) -> impl Iterator<Item = (i32, &Column)> {
        self.columns.iter().map(|(idx, col)| (*idx, col))
    }

    pub fn column(&self, index: i32) -> Option<&Column> {
        self.columns.get(&index)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Screen-space x offset of a column's left edge from the window's
    /// left edge.
    pub fn offset_of(&self, index: i32, params: &FieldParams) -> f32 {
        index as f32 * params.column_width
    }

    /// Sum of all column heights. Conserved by relaxation.
    pub fn total_height(&self) -> f32 {
        self.columns.values().map(|c| c.height).sum()
    }

    /// Height of the tallest column, or 0 for an empty pile.
    pub fn max_height(&self) -> f32 {
        self.columns.values().map(|c| c.height).fold(0.0, f32::max)
    }

    /// Mean column age, or 0 for an empty pile.
    pub fn average_age(&self) -> f32 {
        if self.columns.is_empty() {
            return 0.0;
        }
        let total: f32 = self.columns.values().map(|c| c.age).sum();
        total / self.columns.len() as f32
    }

    /// Rendering opacity derived from the pile's average age: fully visible
    /// until the fade onset, then a linear fade floored at 0.3.
    pub fn fade_opacity(&self, params: &FieldParams) -> f32 {
        let avg = self.average_age();
        if avg < params.fade_onset_age {
            return 0.95;
        }
        let span = (params.max_age - params.fade_onset_age).max(f32::EPSILON);
        let progress = ((avg - params.fade_onset_age) / span).clamp(0.0, 1.0);
        (0.95 - progress * 0.65).max(0.3)
    }

    /// Visible surface polyline for the rendering consumer: one point per
    /// column at its center top, x clamped to the corner bounds.
    pub fn surface_points(&self, params: &FieldParams) -> Vec<Vec2> {
        let top = self.frame.top();
        let left_bound = self.frame.min_x() + params.corner_margin;
        let right_bound = self.frame.max_x() - params.corner_margin;
        self.columns
            .iter()
            .map(|(idx, col)| {
                let x = self.frame.min_x()
                    + self.offset_of(*idx, params)
                    + params.column_width * 0.5;
                Vec2::new(x.clamp(left_bound, right_bound), top + col.height)
            })
            .collect()
    }

    /// Whether a column index lies within the depositable span of the cached
    /// window frame. Relaxation never moves mass outside of it.
    pub(crate) fn index_in_span(&self, index: i32, params: &FieldParams) -> bool {
        let left = index as f32 * params.column_width;
        let right = left + params.column_width;
        right > params.corner_margin && left < self.frame.width() - params.corner_margin
    }
}

/// Owner of all simulation state: window id to pile.
///
/// Structural mutation is the only observable effect of any operation here;
/// there is no I/O and no failure mode.
#[derive(Debug, Default)]
pub struct PileStore {
    piles: HashMap<WindowId, Pile>,
}

impl PileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the pile for a window, refreshing its cached frame.
    pub fn upsert(&mut self, window_id: WindowId, frame: Rect) -> &mut Pile {
        let pile = self
            .piles
            .entry(window_id)
            .or_insert_with(|| Pile::new(window_id, frame));
        pile.frame = frame;
        pile
    }

    pub fn get(&self, window_id: WindowId) -> Option<&Pile> {
        self.piles.get(&window_id)
    }

    pub fn get_mut(&mut self, window_id: WindowId) -> Option<&mut Pile> {
        self.piles.get_mut(&window_id)
    }

    pub fn remove(&mut self, window_id: WindowId) -> Option<Pile> {
        self.piles.remove(&window_id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Pile> {
        self.piles.values()
    }

    pub fn len(&self) -> usize {
        self.piles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.piles.is_empty()
    }

    pub fn clear(&mut self) {
        self.piles.clear();
    }

    pub(crate) fn iter_mut(&mut self) -> hash_map::IterMut<'_, WindowId, Pile> {
        self.piles.iter_mut()
    }

    pub(crate) fn retain(&mut self, f: impl FnMut(&WindowId, &mut Pile) -> bool) {
        self.piles.retain(f);
    }
}
