//! Shared randomness helpers used by the engines.
//!
//! Every engine takes its randomness through an injected [`RngCore`], so a
//! seeded generator (or a zero-jitter profile) makes the whole simulation
//! deterministic.
use rand::rand_core::RngCore;

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform value in [lo, hi).
#[inline]
pub(crate) fn rand_range(rng: &mut dyn RngCore, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rand01(rng)
}

/// Symmetric jitter in [-spread, spread). Zero spread yields exactly zero.
#[inline]
pub(crate) fn jitter(rng: &mut dyn RngCore, spread: f32) -> f32 {
    if spread == 0.0 {
        return 0.0;
    }
    rand_range(rng, -spread, spread)
}

/// Fair coin flip.
#[inline]
pub(crate) fn coin(rng: &mut dyn RngCore) -> bool {
    rng.next_u32() & 1 == 1
}
