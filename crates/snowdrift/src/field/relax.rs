//! Slope relaxation: the angle-of-repose avalanche pass.
//!
//! Adjacent columns may differ by at most a jittered slope threshold; any
//! excess drains into the shallower neighbor. The pass is mass-conserving by
//! construction (every subtraction has an equal addition) and runs under a
//! small iteration cap instead of solving to a fixed point, which bounds
//! per-tick cost at the price of exactness between passes.
use rand::rand_core::RngCore;

use crate::field::{Column, FieldParams, Pile};
use crate::random::{coin, jitter};

/// How hard a relaxation pass pushes mass downhill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxMode {
    /// Per-tick settling: narrow threshold jitter, low transfer rate, 2 passes.
    Gentle,
    /// Post-deposit avalanche: wider jitter, higher rate, 3 passes.
    Aggressive,
}

/// Slope threshold and transfer-rate parameters.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlopeProfile {
    /// Height difference between neighbors tolerated before mass moves.
    pub base_threshold: f32,
    /// Threshold jitter half-width in gentle mode.
    pub gentle_variation: f32,
    /// Threshold jitter half-width in aggressive mode.
    pub aggressive_variation: f32,
    /// Fraction of the excess transferred per step in gentle mode.
    pub gentle_rate: f32,
    /// Fraction of the excess transferred per step in aggressive mode.
    pub aggressive_rate: f32,
    /// Multiplicative jitter half-width applied to each transfer.
    pub rate_jitter: f32,
    /// Transfers below this are skipped; guarantees termination.
    pub min_transfer: f32,
}

impl Default for SlopeProfile {
    fn default() -> Self {
        Self {
            base_threshold: 6.0,
            gentle_variation: 0.4,
            aggressive_variation: 0.9,
            gentle_rate: 0.25,
            aggressive_rate: 0.5,
            rate_jitter: 0.1,
            min_transfer: 0.01,
        }
    }
}

impl SlopeProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// A profile with all randomness disabled, for deterministic tests.
    pub fn zero_jitter() -> Self {
        Self {
            gentle_variation: 0.0,
            aggressive_variation: 0.0,
            rate_jitter: 0.0,
            ..Self::default()
        }
    }

    /// Sets the base slope threshold.
    pub fn with_base_threshold(mut self, base_threshold: f32) -> Self {
        self.base_threshold = base_threshold;
        self
    }

    /// Sets the transfer rate used in both modes.
    pub fn with_rates(mut self, gentle_rate: f32, aggressive_rate: f32) -> Self {
        self.gentle_rate = gentle_rate;
        self.aggressive_rate = aggressive_rate;
        self
    }
}

/// Run one relaxation invocation over a pile, returning the number of
/// transfers made.
///
/// Columns are visited in ascending offset order; each examines its two
/// neighbor offsets in random order and drains `excess * rate * jitter`
/// toward any neighbor sitting more than the threshold below it. A missing
/// neighbor counts as height zero and is created on first transfer,
/// inheriting the source column's age. Mass never leaves the depositable
/// span of the window frame, and no column ever exceeds `max_height`.
pub fn relax(
    pile: &mut Pile,
    mode: RelaxMode,
    profile: &SlopeProfile,
    params: &FieldParams,
    rng: &mut dyn RngCore,
) -> usize {
    let (variation, rate, passes) = match mode {
        RelaxMode::Gentle => (profile.gentle_variation, profile.gentle_rate, 2),
        RelaxMode::Aggressive => (profile.aggressive_variation, profile.aggressive_rate, 3),
    };
    let threshold = (profile.base_threshold + jitter(rng, variation)).max(0.0);

    let mut transfers = 0;
    for _ in 0..passes {
        let indices: Vec<i32> = pile.columns.keys().copied().collect();
        let mut moved = false;

        for index in indices {
            let neighbors = if coin(rng) {
                [index - 1, index + 1]
            } else {
                [index + 1, index - 1]
            };

            for neighbor in neighbors {
                if !pile.index_in_span(neighbor, params) {
                    continue;
                }
                let source_height = match pile.columns.get(&index) {
                    Some(column) => column.height,
                    None => break,
                };
                let neighbor_height = pile.columns.get(&neighbor).map_or(0.0, |c| c.height);

                let excess = source_height - neighbor_height - threshold;
                if excess <= 0.0 {
                    continue;
                }

                let factor = 1.0 + jitter(rng, profile.rate_jitter);
                let headroom = params.max_height - neighbor_height;
                let amount = (excess * rate * factor).min(source_height).min(headroom);
                if amount < profile.min_transfer {
                    continue;
                }

                let source_age = {
                    let column = pile
                        .columns
                        .get_mut(&index)
                        .expect("source column present during pass");
                    column.height = (column.height - amount).max(0.0);
                    column.age
                };
                pile.columns
                    .entry(neighbor)
                    .and_modify(|c| c.height = (c.height + amount).min(params.max_height))
                    .or_insert(Column {
                        height: amount,
                        age: source_age,
                    });

                moved = true;
                transfers += 1;
            }
        }

        if !moved {
            break;
        }
    }
    transfers
}
