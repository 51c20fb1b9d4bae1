//! Event types and sinks for observing simulation ticks.
//!
//! Sinks let tests and demos watch what a tick did without threading return
//! values through the orchestrator. The unit sink `()` wants nothing and is
//! the zero-cost default.
use glam::Vec2;

use crate::window::WindowId;

/// Events emitted by [`crate::sim::Snowfall::tick_with_events`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// A falling particle reached a surface and was consumed.
    ParticleSettled {
        /// Window the particle landed on.
        window_id: WindowId,
        /// Deposit point on the snow surface.
        position: Vec2,
        /// False when the landing point was covered by a frontward window
        /// and no snow was recorded.
        deposited: bool,
    },

    /// The occlusion filter removed covered snow.
    SnowOccluded {
        columns: usize,
        piles: usize,
    },

    /// The decay pass pruned dead snow.
    SnowDecayed {
        columns: usize,
        piles: usize,
    },

    /// A sleigh flight launched.
    SleighLaunched {
        altitude: f32,
    },

    /// One tick finished.
    TickCompleted {
        piles: usize,
        falling_particles: usize,
    },
}

/// Discriminant for [`SimEvent`], used by [`EventSink::wants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEventKind {
    ParticleSettled,
    SnowOccluded,
    SnowDecayed,
    SleighLaunched,
    TickCompleted,
}

impl SimEvent {
    pub fn kind(&self) -> SimEventKind {
        match self {
            SimEvent::ParticleSettled { .. } => SimEventKind::ParticleSettled,
            SimEvent::SnowOccluded { .. } => SimEventKind::SnowOccluded,
            SimEvent::SnowDecayed { .. } => SimEventKind::SnowDecayed,
            SimEvent::SleighLaunched { .. } => SimEventKind::SleighLaunched,
            SimEvent::TickCompleted { .. } => SimEventKind::TickCompleted,
        }
    }
}

/// Receiver for simulation events.
pub trait EventSink {
    /// Cheap pre-filter; the orchestrator skips building events nobody wants.
    fn wants(&self, kind: SimEventKind) -> bool;
    fn send(&mut self, event: SimEvent);
}

/// The no-op sink.
impl EventSink for () {
    fn wants(&self, _kind: SimEventKind) -> bool {
        false
    }

    fn send(&mut self, _event: SimEvent) {}
}

/// Collects every event into a vector.
#[derive(Debug, Default)]
pub struct VecSink {
    events: Vec<SimEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn into_inner(self) -> Vec<SimEvent> {
        self.events
    }
}

impl EventSink for VecSink {
    fn wants(&self, _kind: SimEventKind) -> bool {
        true
    }

    fn send(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F: FnMut(SimEvent)>(pub F);

impl<F: FnMut(SimEvent)> EventSink for FnSink<F> {
    fn wants(&self, _kind: SimEventKind) -> bool {
        true
    }

    fn send(&mut self, event: SimEvent) {
        (self.0)(event);
    }
}
