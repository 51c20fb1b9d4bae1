#![forbid(unsafe_code)]
//! snowdrift: desktop snowfall with piles that settle on top of foreign windows.
//!
//! Modules:
//! - field: per-window snow height fields (accretion, relaxation, decay, occlusion)
//! - window: window-directory snapshots, refresh caching, and stacking predicates
//! - collision: falling-particle landing detection against the window stack
//! - particle, sleigh, sprite: flake motion and wind, the decorative sleigh, XPM frames
//! - sim: the per-frame tick orchestrator tying everything together
//!
//! Coordinates are y-up: a window's snow-bearing top edge is its `max_y`, and
//! falling particles move toward smaller y. All randomness flows through
//! injected [`rand::RngCore`] sources, so every engine is deterministic under a
//! fixed seed.
pub mod collision;
pub mod config;
pub mod error;
pub mod events;
pub mod field;
pub mod geom;
pub mod particle;
mod random;
pub mod sim;
pub mod sleigh;
pub mod sprite;
pub mod window;

/// Nominal tick cadence the per-frame rates are calibrated against.
///
/// Per-frame constants (melt, compaction, particle speeds) are scaled by
/// `delta_time * NOMINAL_TICK_HZ`, so a caller driving the simulation slower
/// or faster than 60 Hz still gets the same wall-clock behavior.
pub const NOMINAL_TICK_HZ: f32 = 60.0;

/// Convenient re-exports for common types. Import with `use snowdrift::prelude::*;`.
pub mod prelude {
    pub use crate::collision::{find_landing, Landing};
    pub use crate::config::{Intensity, SimConfig};
    pub use crate::error::{Error, Result};
    pub use crate::events::{EventSink, FnSink, SimEvent, SimEventKind, VecSink};
    pub use crate::field::{
        Column, DecayParams, DepositOutcome, FieldParams, Pile, PileStore, RelaxMode, SlopeProfile,
    };
    pub use crate::geom::Rect;
    pub use crate::particle::{Particle, ParticleField, Wind};
    pub use crate::sim::Snowfall;
    pub use crate::sleigh::Sleigh;
    pub use crate::sprite::{load_xpm_file, parse_xpm, SpriteFrame};
    pub use crate::window::{
        frontmost_window_at, is_point_occluded, CachedWindowDirectory, DirectoryConfig,
        StaticWindows, WindowId, WindowSnapshot, WindowSource,
    };
    pub use crate::NOMINAL_TICK_HZ;
}
