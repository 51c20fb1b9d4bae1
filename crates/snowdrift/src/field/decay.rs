//! Temporal decay: aging, melt, compaction, and pruning.
//!
//! Compaction and melt run on separate onsets: snow compacts under its own
//! weight soon after it stops being refreshed, while bulk melt only starts
//! once a column has sat idle much longer. A single decay curve would either
//! melt piles unrealistically fast or never show them settling.
use rand::rand_core::RngCore;
use tracing::debug;

use crate::field::relax::{relax, RelaxMode, SlopeProfile};
use crate::field::{FieldParams, PileStore};
use crate::NOMINAL_TICK_HZ;

/// Rates and onsets for the decay pass.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecayParams {
    /// Idle seconds before micro-compaction starts.
    pub settle_threshold: f32,
    /// Idle seconds before melt starts.
    pub idle_melt_threshold: f32,
    /// Height lost per nominal tick once melting.
    pub melt_rate: f32,
    /// Height lost per nominal tick while compacting.
    pub compaction_rate: f32,
    /// Compaction never reduces a column below this height; only melt and
    /// pruning remove it.
    pub compaction_floor: f32,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            settle_threshold: 5.0,
            idle_melt_threshold: 60.0,
            melt_rate: 0.005,
            compaction_rate: 0.0015,
            compaction_floor: 0.6,
        }
    }
}

impl DecayParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets both decay onsets.
    pub fn with_thresholds(mut self, settle: f32, idle_melt: f32) -> Self {
        self.settle_threshold = settle;
        self.idle_melt_threshold = idle_melt;
        self
    }

    /// Sets the per-nominal-tick melt rate.
    pub fn with_melt_rate(mut self, melt_rate: f32) -> Self {
        self.melt_rate = melt_rate;
        self
    }
}

/// What one decay pass did across the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecaySummary {
    pub pruned_columns: usize,
    pub removed_piles: usize,
}

/// Age every pile and column by `delta_time`, melt and compact past the
/// onsets, prune dead columns, and keep surviving piles relaxed.
pub fn tick(
    store: &mut PileStore,
    delta_time: f32,
    decay: &DecayParams,
    profile: &SlopeProfile,
    params: &FieldParams,
    rng: &mut dyn RngCore,
) -> DecaySummary {
    let mut summary = DecaySummary::default();
    let frames = delta_time * NOMINAL_TICK_HZ;

    for (_, pile) in store.iter_mut() {
        pile.total_age += delta_time;

        for column in pile.columns.values_mut() {
            column.age += delta_time;

            if column.age > decay.idle_melt_threshold {
                column.height = (column.height - decay.melt_rate * frames).max(0.0);
            }
            if column.age > decay.settle_threshold && column.height > decay.compaction_floor {
                column.height =
                    (column.height - decay.compaction_rate * frames).max(decay.compaction_floor);
            }
        }

        let before = pile.columns.len();
        let max_age = params.max_age;
        let min_height = params.min_column_height;
        pile.columns
            .retain(|_, column| column.height > min_height && column.age <= max_age);
        summary.pruned_columns += before - pile.columns.len();

        if !pile.is_empty() {
            relax(pile, RelaxMode::Gentle, profile, params, rng);
        }
    }

    store.retain(|id, pile| {
        if pile.is_empty() {
            debug!("Snow pile on window {id:?} decayed away.");
            summary.removed_piles += 1;
            false
        } else {
            true
        }
    });

    summary
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::field::{Column, DepositOutcome};
    use crate::geom::Rect;
    use crate::window::WindowId;

    const DT: f32 = 1.0 / 60.0;

    fn store_with_column(height: f32, age: f32) -> PileStore {
        let mut store = PileStore::new();
        let pile = store.upsert(WindowId(1), Rect::new(0.0, 0.0, 200.0, 100.0));
        pile.columns.insert(5, Column { height, age });
        store
    }

    fn column_height(store: &PileStore) -> f32 {
        store.get(WindowId(1)).unwrap().column(5).unwrap().height
    }

    #[test]
    fn ages_accumulate() {
        let mut store = store_with_column(10.0, 0.0);
        let mut rng = StdRng::seed_from_u64(1);
        tick(
            &mut store,
            2.5,
            &DecayParams::default(),
            &SlopeProfile::zero_jitter(),
            &FieldParams::default(),
            &mut rng,
        );
        let pile = store.get(WindowId(1)).unwrap();
        assert_eq!(pile.total_age, 2.5);
        assert_eq!(pile.column(5).unwrap().age, 2.5);
    }

    #[test]
    fn fresh_columns_do_not_melt() {
        // Height below the slope threshold, so relaxation moves nothing and
        // the height is untouched by a fresh-column tick.
        let mut store = store_with_column(5.0, 0.0);
        let mut rng = StdRng::seed_from_u64(1);
        tick(
            &mut store,
            DT,
            &DecayParams::default(),
            &SlopeProfile::zero_jitter(),
            &FieldParams::default(),
            &mut rng,
        );
        assert_eq!(column_height(&store), 5.0);
    }

    #[test]
    fn idle_columns_melt_at_the_configured_rate() {
        let decay = DecayParams::default();
        let mut store = store_with_column(5.0, decay.idle_melt_threshold + 1.0);
        let mut rng = StdRng::seed_from_u64(1);
        tick(
            &mut store,
            DT,
            &decay,
            &SlopeProfile::zero_jitter(),
            &FieldParams::default(),
            &mut rng,
        );
        // One nominal frame of melt plus one of compaction.
        let expected = 5.0 - decay.melt_rate - decay.compaction_rate;
        assert!((column_height(&store) - expected).abs() < 1e-5);
    }

    #[test]
    fn compaction_stops_at_the_floor() {
        let decay = DecayParams::default();
        let mut store = store_with_column(decay.compaction_floor + 0.001, 10.0);
        let mut rng = StdRng::seed_from_u64(1);
        tick(
            &mut store,
            DT,
            &decay,
            &SlopeProfile::zero_jitter(),
            &FieldParams::default(),
            &mut rng,
        );
        assert_eq!(column_height(&store), decay.compaction_floor);

        // Another tick: already at the floor, compaction leaves it alone.
        tick(
            &mut store,
            DT,
            &decay,
            &SlopeProfile::zero_jitter(),
            &FieldParams::default(),
            &mut rng,
        );
        assert_eq!(column_height(&store), decay.compaction_floor);
    }

    #[test]
    fn low_columns_are_pruned_and_empty_piles_removed() {
        let params = FieldParams::default();
        let mut store = store_with_column(params.min_column_height, 1.0);
        let mut rng = StdRng::seed_from_u64(1);
        let summary = tick(
            &mut store,
            DT,
            &DecayParams::default(),
            &SlopeProfile::zero_jitter(),
            &params,
            &mut rng,
        );
        assert_eq!(summary.pruned_columns, 1);
        assert_eq!(summary.removed_piles, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn overage_columns_are_pruned() {
        let params = FieldParams::default();
        let mut store = store_with_column(50.0, params.max_age);
        let mut rng = StdRng::seed_from_u64(1);
        let summary = tick(
            &mut store,
            DT,
            &DecayParams::default(),
            &SlopeProfile::zero_jitter(),
            &params,
            &mut rng,
        );
        assert_eq!(summary.pruned_columns, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn melt_mass_loss_keeps_slopes_relaxed() {
        // A freshly deposited pile stays relaxed as decay reshapes it.
        let params = FieldParams::default();
        let profile = SlopeProfile::zero_jitter();
        let decay = DecayParams::default();
        let mut store = PileStore::new();
        let mut rng = StdRng::seed_from_u64(21);
        let frame = Rect::new(0.0, 0.0, 200.0, 100.0);

        for _ in 0..40 {
            let outcome = store.deposit(
                WindowId(1),
                frame,
                Vec2::new(100.0, 100.0),
                6.0,
                &params,
                &profile,
                &mut rng,
            );
            assert_eq!(outcome, DepositOutcome::Accreted { index: 12 });
        }
        for _ in 0..600 {
            tick(&mut store, DT, &decay, &profile, &params, &mut rng);
        }

        let pile = store.get(WindowId(1)).expect("pile survives 10 seconds");
        let columns: Vec<(i32, f32)> = pile.columns().map(|(i, c)| (i, c.height)).collect();
        for pair in columns.windows(2) {
            let (ia, ha) = pair[0];
            let (ib, hb) = pair[1];
            if ib == ia + 1 {
                assert!(
                    (ha - hb).abs() <= profile.base_threshold + 0.5,
                    "adjacent columns {ia}/{ib} differ by {}",
                    (ha - hb).abs()
                );
            }
        }
    }
}
