//! The per-frame simulation orchestrator.
//!
//! One [`Snowfall`] instance owns every piece of mutable state; the caller
//! owns the scheduler and calls [`Snowfall::tick`] once per frame with the
//! current window-directory snapshot. A tick runs occlusion pruning, then
//! temporal decay, then per-particle flight and collision with accretion and
//! relaxation on landing. Every tick ends with the store in an
//! invariant-respecting state, so stopping the caller's timer is the only
//! cancellation needed.
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::collision::find_landing;
use crate::config::{Intensity, SimConfig};
use crate::error::Result;
use crate::events::{EventSink, SimEvent, SimEventKind};
use crate::field::{decay, occlusion, DecayParams, FieldParams, Pile, PileStore, SlopeProfile};
use crate::particle::{Particle, ParticleField, Wind, EDGE_SLACK};
use crate::sleigh::Sleigh;
use crate::window::WindowSnapshot;

/// The snowfall simulation: falling flakes, settled piles, wind, and the
/// decorative sleigh.
///
/// Not internally synchronized. When simulation and rendering live on
/// different threads, put the instance behind a single mutex and let the
/// renderer read between ticks; a tick never leaves a pile mid-relaxation.
pub struct Snowfall {
    config: SimConfig,
    field_params: FieldParams,
    slope: SlopeProfile,
    decay_params: DecayParams,
    store: PileStore,
    particles: ParticleField,
    wind: Wind,
    sleigh: Sleigh,
    rng: StdRng,
}

impl Snowfall {
    /// Create a simulation from a validated config and an RNG seed.
    pub fn try_new(config: SimConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = ParticleField::new(
            config.screen_extent,
            config.intensity.particle_count(),
            &mut rng,
        );
        let sleigh = Sleigh::new(config.screen_extent, config.sleigh_frame_count, &mut rng);
        let wind = Wind::new(config.wind_enabled);
        info!(
            "Snowfall initialized: {} particles over {}x{}.",
            particles.len(),
            config.screen_extent.x,
            config.screen_extent.y
        );
        Ok(Self {
            config,
            field_params: FieldParams::default(),
            slope: SlopeProfile::default(),
            decay_params: DecayParams::default(),
            store: PileStore::new(),
            particles,
            wind,
            sleigh,
            rng,
        })
    }

    /// Replaces the height-field parameters.
    pub fn with_field_params(mut self, field_params: FieldParams) -> Self {
        debug_assert!(field_params.validate().is_ok());
        self.field_params = field_params;
        self
    }

    /// Replaces the slope-relaxation profile.
    pub fn with_slope_profile(mut self, slope: SlopeProfile) -> Self {
        self.slope = slope;
        self
    }

    /// Replaces the decay parameters.
    pub fn with_decay_params(mut self, decay_params: DecayParams) -> Self {
        self.decay_params = decay_params;
        self
    }

    /// Advance the simulation by `delta_time` seconds against the given
    /// window snapshot.
    pub fn tick(&mut self, delta_time: f32, windows: &[WindowSnapshot]) {
        self.tick_with_events(delta_time, windows, &mut ());
    }

    /// [`Snowfall::tick`], reporting what happened to the sink.
    pub fn tick_with_events(
        &mut self,
        delta_time: f32,
        windows: &[WindowSnapshot],
        sink: &mut dyn EventSink,
    ) {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            warn!("Ignoring tick with degenerate delta_time {delta_time}.");
            return;
        }

        if self.config.sleigh_enabled {
            let was_active = self.sleigh.active;
            self.sleigh.update(delta_time, &mut self.rng);
            if !was_active && self.sleigh.active && sink.wants(SimEventKind::SleighLaunched) {
                sink.send(SimEvent::SleighLaunched {
                    altitude: self.sleigh.position.y,
                });
            }
        }

        if self.config.settling_enabled {
            let occluded = occlusion::filter_occluded(&mut self.store, windows, &self.field_params);
            if occluded != Default::default() && sink.wants(SimEventKind::SnowOccluded) {
                sink.send(SimEvent::SnowOccluded {
                    columns: occluded.removed_columns,
                    piles: occluded.removed_piles,
                });
            }

            let decayed = decay::tick(
                &mut self.store,
                delta_time,
                &self.decay_params,
                &self.slope,
                &self.field_params,
                &mut self.rng,
            );
            if decayed != Default::default() && sink.wants(SimEventKind::SnowDecayed) {
                sink.send(SimEvent::SnowDecayed {
                    columns: decayed.pruned_columns,
                    piles: decayed.removed_piles,
                });
            }
        }

        let wind_effect = self.wind.advance(delta_time);
        let extent = self.particles.extent();

        for index in 0..self.particles.len() {
            let mut particle = self.particles.particles_mut()[index];
            if !particle.falling {
                continue;
            }
            particle.integrate(delta_time, wind_effect);

            if self.config.settling_enabled {
                if let Some(landing) =
                    find_landing(&particle, windows, &self.store, &self.field_params)
                {
                    let deposited = !landing.occluded
                        && self
                            .store
                            .deposit(
                                landing.window_id,
                                landing.frame,
                                landing.point,
                                particle.size,
                                &self.field_params,
                                &self.slope,
                                &mut self.rng,
                            )
                            .is_accreted();
                    if sink.wants(SimEventKind::ParticleSettled) {
                        sink.send(SimEvent::ParticleSettled {
                            window_id: landing.window_id,
                            position: landing.point,
                            deposited,
                        });
                    }
                    self.particles.respawn_at_top(index, &mut self.rng);
                    continue;
                }
            }

            if particle.position.y < -EDGE_SLACK {
                self.particles.respawn_at_top(index, &mut self.rng);
                continue;
            }
            ParticleField::wrap_horizontal(extent, &mut particle);
            self.particles.particles_mut()[index] = particle;
        }

        if sink.wants(SimEventKind::TickCompleted) {
            sink.send(SimEvent::TickCompleted {
                piles: self.store.len(),
                falling_particles: self.particles.len(),
            });
        }
    }

    /// Change the particle-count preset, rebuilding the particle field.
    pub fn set_intensity(&mut self, intensity: Intensity) {
        self.config.intensity = intensity;
        self.particles
            .resize(intensity.particle_count(), &mut self.rng);
    }

    pub fn set_wind_enabled(&mut self, enabled: bool) {
        self.config.wind_enabled = enabled;
        self.wind.enabled = enabled;
    }

    /// Toggle settling; disabling clears every settled pile immediately.
    pub fn set_settling_enabled(&mut self, enabled: bool) {
        self.config.settling_enabled = enabled;
        if !enabled {
            self.clear_settled();
        }
    }

    pub fn set_sleigh_enabled(&mut self, enabled: bool) {
        self.config.sleigh_enabled = enabled;
    }

    /// Drop all settled snow.
    pub fn clear_settled(&mut self) {
        self.store.clear();
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read-only view of the settled snow, for the rendering consumer.
    pub fn store(&self) -> &PileStore {
        &self.store
    }

    /// All current piles, for the rendering consumer.
    pub fn piles(&self) -> impl Iterator<Item = &Pile> {
        self.store.all()
    }

    /// All live particles, for the rendering consumer.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn sleigh(&self) -> &Sleigh {
        &self.sleigh
    }

    pub fn field_params(&self) -> &FieldParams {
        &self.field_params
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut PileStore {
        &mut self.store
    }

    #[cfg(test)]
    pub(crate) fn particles_field_mut(&mut self) -> &mut ParticleField {
        &mut self.particles
    }
}
