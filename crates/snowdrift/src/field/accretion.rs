//! Accretion: turning a settled particle into column height.
use glam::Vec2;
use rand::rand_core::RngCore;
use tracing::warn;

use crate::field::relax::{relax, RelaxMode, SlopeProfile};
use crate::field::{column_index, Column, FieldParams, Pile, PileStore};
use crate::geom::Rect;
use crate::window::WindowId;

/// What a deposit attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositOutcome {
    /// Height was added to the column at this index.
    Accreted { index: i32 },
    /// The point fell inside a corner margin; nothing was recorded.
    OutsideCorners,
    /// The target column is already at maximum height; no-op.
    Saturated,
    /// The amount was non-finite or not positive; absorbed as a no-op.
    Rejected,
}

impl DepositOutcome {
    pub fn is_accreted(&self) -> bool {
        matches!(self, DepositOutcome::Accreted { .. })
    }
}

/// Deposit `amount` of particle size at `point` onto an existing pile.
///
/// The deposited height is `amount * accretion_scale`, capped so the column
/// never exceeds `max_height`. A successful deposit resets the column's age
/// and triggers one aggressive relaxation pass around the new mass.
pub fn deposit(
    pile: &mut Pile,
    point: Vec2,
    amount: f32,
    params: &FieldParams,
    profile: &SlopeProfile,
    rng: &mut dyn RngCore,
) -> DepositOutcome {
    // External-input boundary: particle sizes come from the animation
    // collaborator and must not be trusted to be finite.
    if !amount.is_finite() || amount <= 0.0 {
        warn!("Rejected snow deposit with degenerate amount {amount}.");
        return DepositOutcome::Rejected;
    }

    let rel_x = point.x - pile.frame.min_x();
    if rel_x < params.corner_margin || rel_x > pile.frame.width() - params.corner_margin {
        return DepositOutcome::OutsideCorners;
    }

    let index = column_index(rel_x, params.column_width);
    let scaled = amount * params.accretion_scale;

    match pile.columns.get_mut(&index) {
        Some(column) => {
            let headroom = params.max_height - column.height;
            if headroom <= 0.0 {
                return DepositOutcome::Saturated;
            }
            column.height += scaled.min(headroom);
            column.age = 0.0;
        }
        None => {
            pile.columns.insert(
                index,
                Column {
                    height: scaled.min(params.max_height),
                    age: 0.0,
                },
            );
        }
    }

    relax(pile, RelaxMode::Aggressive, profile, params, rng);
    DepositOutcome::Accreted { index }
}

impl PileStore {
    /// Deposit against a window, creating its pile on the first successful
    /// accretion and never leaving an empty pile behind on a rejected one.
    pub fn deposit(
        &mut self,
        window_id: WindowId,
        frame: Rect,
        point: Vec2,
        amount: f32,
        params: &FieldParams,
        profile: &SlopeProfile,
        rng: &mut dyn RngCore,
    ) -> DepositOutcome {
        let pile = self.upsert(window_id, frame);
        let outcome = deposit(pile, point, amount, params, profile, rng);
        if pile.is_empty() {
            self.remove(window_id);
        }
        outcome
    }
}
