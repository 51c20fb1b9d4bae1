//! Simulation configuration.
use glam::Vec2;

use crate::error::{Error, Result};

/// Snowfall intensity presets, mapped to particle counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intensity {
    Light,
    #[default]
    Medium,
    Heavy,
}

impl Intensity {
    /// Number of live particles for this preset.
    pub fn particle_count(&self) -> usize {
        match self {
            Intensity::Light => 100,
            Intensity::Medium => 250,
            Intensity::Heavy => 500,
        }
    }
}

/// Configuration for a [`crate::sim::Snowfall`] instance.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Size of the screen being snowed on, in screen units.
    pub screen_extent: Vec2,
    /// Particle-count preset.
    pub intensity: Intensity,
    /// Whether wind pushes particles sideways.
    pub wind_enabled: bool,
    /// Whether snow settles on windows. Disabling clears all settled state.
    pub settling_enabled: bool,
    /// Whether the decorative sleigh flies.
    pub sleigh_enabled: bool,
    /// Number of frames in the sleigh sprite sheet.
    pub sleigh_frame_count: usize,
}

impl SimConfig {
    /// Creates a config for the given screen extent with default toggles.
    pub fn new(screen_extent: Vec2) -> Self {
        Self {
            screen_extent,
            intensity: Intensity::default(),
            wind_enabled: true,
            settling_enabled: true,
            sleigh_enabled: true,
            sleigh_frame_count: 4,
        }
    }

    /// Sets the intensity preset.
    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }

    /// Sets whether wind is enabled.
    pub fn with_wind(mut self, enabled: bool) -> Self {
        self.wind_enabled = enabled;
        self
    }

    /// Sets whether settling is enabled.
    pub fn with_settling(mut self, enabled: bool) -> Self {
        self.settling_enabled = enabled;
        self
    }

    /// Sets whether the sleigh is enabled.
    pub fn with_sleigh(mut self, enabled: bool) -> Self {
        self.sleigh_enabled = enabled;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.screen_extent.x.is_finite() || !self.screen_extent.y.is_finite() {
            return Err(Error::InvalidConfig("screen_extent must be finite".into()));
        }
        if self.screen_extent.x <= 0.0 || self.screen_extent.y <= 0.0 {
            return Err(Error::InvalidConfig(
                "screen_extent must be > 0 in both components".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_presets_map_to_particle_counts() {
        assert_eq!(Intensity::Light.particle_count(), 100);
        assert_eq!(Intensity::Medium.particle_count(), 250);
        assert_eq!(Intensity::Heavy.particle_count(), 500);
        assert_eq!(Intensity::default(), Intensity::Medium);
    }

    #[test]
    fn validate_rejects_degenerate_extents() {
        assert!(SimConfig::new(Vec2::new(1440.0, 900.0)).validate().is_ok());
        assert!(SimConfig::new(Vec2::new(0.0, 900.0)).validate().is_err());
        assert!(SimConfig::new(Vec2::new(1440.0, -1.0)).validate().is_err());
        assert!(SimConfig::new(Vec2::new(f32::NAN, 900.0)).validate().is_err());
    }

    #[test]
    fn builders_override_defaults() {
        let config = SimConfig::new(Vec2::new(800.0, 600.0))
            .with_intensity(Intensity::Heavy)
            .with_wind(false)
            .with_settling(false)
            .with_sleigh(false);
        assert_eq!(config.intensity, Intensity::Heavy);
        assert!(!config.wind_enabled);
        assert!(!config.settling_enabled);
        assert!(!config.sleigh_enabled);
    }
}
