//! Rate-limited caching layer over the platform window query.
//!
//! Enumerating windows goes out to the windowing system and can be slow, so
//! [`CachedWindowDirectory`] refreshes at most once per configured interval
//! and hands out the cached snapshot in between. Time is driven by the
//! caller's tick delta, not an ambient clock, which keeps the directory
//! deterministic under test.
use tracing::debug;

use crate::window::WindowSnapshot;

/// Source of visible-window snapshots, implemented by the platform
/// collaborator (or by [`StaticWindows`] in tests and demos).
///
/// Implementations report windows front to back with ascending
/// `stack_rank`, already excluding the simulation's own overlay window and
/// non-normal window layers.
pub trait WindowSource {
    fn query(&mut self) -> Vec<WindowSnapshot>;
}

/// Configuration for [`CachedWindowDirectory`].
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectoryConfig {
    /// Minimum seconds between two queries of the underlying source.
    pub refresh_interval: f32,
    /// Windows at or below this width/height are dropped as decorative or
    /// utility chrome.
    pub min_window_extent: f32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            refresh_interval: 0.5,
            min_window_extent: 50.0,
        }
    }
}

impl DirectoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum refresh interval in seconds.
    pub fn with_refresh_interval(mut self, refresh_interval: f32) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    /// Sets the minimum window extent filter.
    pub fn with_min_window_extent(mut self, min_window_extent: f32) -> Self {
        self.min_window_extent = min_window_extent;
        self
    }
}

/// Caching, rate-limited window directory.
///
/// Callers must tolerate geometry up to `refresh_interval` seconds old; the
/// simulation is specified against exactly that staleness.
pub struct CachedWindowDirectory<S> {
    source: S,
    config: DirectoryConfig,
    cached: Vec<WindowSnapshot>,
    since_refresh: f32,
    primed: bool,
}

impl<S: WindowSource> CachedWindowDirectory<S> {
    pub fn new(source: S, config: DirectoryConfig) -> Self {
        Self {
            source,
            config,
            cached: Vec::new(),
            since_refresh: 0.0,
            primed: false,
        }
    }

    /// Advance directory time by `delta_time` seconds and return the current
    /// snapshot, refreshing from the source if the interval has elapsed.
    pub fn advance(&mut self, delta_time: f32) -> &[WindowSnapshot] {
        self.since_refresh += delta_time.max(0.0);
        if !self.primed || self.since_refresh >= self.config.refresh_interval {
            self.refresh();
        }
        &self.cached
    }

    /// The cached snapshot without advancing time.
    pub fn snapshot(&self) -> &[WindowSnapshot] {
        &self.cached
    }

    /// Query the source immediately, bypassing the rate limit.
    pub fn refresh(&mut self) -> &[WindowSnapshot] {
        let min = self.config.min_window_extent;
        let mut windows = self.source.query();
        windows.retain(|w| w.frame.width() > min && w.frame.height() > min);
        debug!("Window directory refreshed: {} windows.", windows.len());
        self.cached = windows;
        self.since_refresh = 0.0;
        self.primed = true;
        &self.cached
    }
}

/// A fixed window stack, for tests and headless demos.
#[derive(Debug, Clone, Default)]
pub struct StaticWindows(pub Vec<WindowSnapshot>);

impl WindowSource for StaticWindows {
    fn query(&mut self) -> Vec<WindowSnapshot> {
        self.0.clone()
    }
}
