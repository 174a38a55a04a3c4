//! Scene configuration.
//!
//! Every tuning constant of a scene lives here, so variants of the effect can
//! be described as JSON files rather than code. Missing fields take their
//! defaults:
//!
//! ```json
//! {
//!   "capacity": 200,
//!   "density_exponent": 1.5,
//!   "visuals": { "hue_range": [0.0, 30.0] }
//! }
//! ```

use crate::error::ConfigError;
use crate::particle::{DEFAULT_BOUNDARY_RADIUS, DEFAULT_MAX_DRIFT_SPEED};
use crate::population::{DEFAULT_CAPACITY, MAX_CAPACITY};
use crate::scheduler::{DEFAULT_DENSITY_EXPONENT, DEFAULT_SPAWN_PERIOD};
use crate::spawn::SphereCoverage;
use crate::time::{DEFAULT_FALLBACK_DELTA, DEFAULT_MAX_DELTA};
use crate::visuals::VisualConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Complete scene configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Maximum live particles.
    pub capacity: usize,
    /// Closest spawn distance from the viewer.
    pub min_distance: f32,
    /// Farthest spawn distance from the viewer (exclusive).
    pub max_distance: f32,
    /// Burst size is `ceil(measurement ^ density_exponent)`.
    pub density_exponent: f32,
    /// Steady spawn period in milliseconds.
    pub spawn_period_ms: u64,
    /// Per-axis drift bound around each particle's origin.
    pub boundary_radius: f32,
    /// Per-axis initial drift speed bound.
    pub max_drift_speed: f32,
    /// Frame step used when the host reports no elapsed time.
    pub fallback_frame_ms: u64,
    /// Largest single frame step.
    pub max_frame_ms: u64,
    /// Directions spawn positions cover.
    pub coverage: SphereCoverage,
    /// Fixed RNG seed; random if absent.
    pub seed: Option<u64>,
    pub visuals: VisualConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            min_distance: 1.0,
            max_distance: 4.0,
            density_exponent: DEFAULT_DENSITY_EXPONENT,
            spawn_period_ms: DEFAULT_SPAWN_PERIOD.as_millis() as u64,
            boundary_radius: DEFAULT_BOUNDARY_RADIUS,
            max_drift_speed: DEFAULT_MAX_DRIFT_SPEED,
            fallback_frame_ms: DEFAULT_FALLBACK_DELTA.as_millis() as u64,
            max_frame_ms: DEFAULT_MAX_DELTA.as_millis() as u64,
            coverage: SphereCoverage::Full,
            seed: None,
            visuals: VisualConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Steady spawn period.
    #[inline]
    pub fn spawn_period(&self) -> Duration {
        Duration::from_millis(self.spawn_period_ms)
    }

    /// Frame fallback step.
    #[inline]
    pub fn fallback_frame(&self) -> Duration {
        Duration::from_millis(self.fallback_frame_ms)
    }

    /// Largest frame step.
    #[inline]
    pub fn max_frame(&self) -> Duration {
        Duration::from_millis(self.max_frame_ms)
    }

    /// Check every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(ConfigError::Capacity {
                got: self.capacity,
                max: MAX_CAPACITY,
            });
        }
        if self.spawn_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }

        check_distance_range(self.min_distance, self.max_distance)?;
        check_density_exponent(self.density_exponent)?;
        check_drift(self.boundary_radius, self.max_drift_speed)?;
        check_frame_steps(self.fallback_frame(), self.max_frame())?;
        self.visuals.validate()
    }
}

pub(crate) fn check_distance_range(min: f32, max: f32) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
        return Err(ConfigError::DistanceRange { min, max });
    }
    Ok(())
}

pub(crate) fn check_density_exponent(exponent: f32) -> Result<(), ConfigError> {
    if !exponent.is_finite() || exponent <= 0.0 {
        return Err(ConfigError::DensityExponent(exponent));
    }
    Ok(())
}

pub(crate) fn check_drift(boundary_radius: f32, max_speed: f32) -> Result<(), ConfigError> {
    if !boundary_radius.is_finite() || boundary_radius <= 0.0 {
        return Err(ConfigError::BoundaryRadius(boundary_radius));
    }
    if !max_speed.is_finite() || max_speed < 0.0 {
        return Err(ConfigError::DriftSpeed(max_speed));
    }
    Ok(())
}

/// A zero clamp or fallback would freeze drift.
pub(crate) fn check_frame_steps(fallback: Duration, max: Duration) -> Result<(), ConfigError> {
    if fallback.is_zero() || max.is_zero() || fallback > max {
        return Err(ConfigError::FrameStep { fallback, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SceneConfig::from_json(r#"{ "capacity": 200, "density_exponent": 1.5 }"#).unwrap();
        assert_eq!(config.capacity, 200);
        assert_eq!(config.density_exponent, 1.5);
        assert_eq!(config.spawn_period(), Duration::from_millis(1000));
        assert_eq!(config.visuals, VisualConfig::default());
    }

    #[test]
    fn test_coverage_names() {
        let config = SceneConfig::from_json(r#"{ "coverage": "upper_hemisphere" }"#).unwrap();
        assert_eq!(config.coverage, SphereCoverage::UpperHemisphere);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = |f: fn(&mut SceneConfig)| {
            let mut c = SceneConfig::default();
            f(&mut c);
            c.validate().unwrap_err()
        };

        assert!(matches!(bad(|c| c.capacity = 0), ConfigError::Capacity { got: 0, .. }));
        assert!(matches!(bad(|c| c.capacity = MAX_CAPACITY + 1), ConfigError::Capacity { .. }));
        assert!(matches!(bad(|c| c.min_distance = 5.0), ConfigError::DistanceRange { .. }));
        assert!(matches!(bad(|c| c.min_distance = -1.0), ConfigError::DistanceRange { .. }));
        assert!(matches!(bad(|c| c.density_exponent = 0.0), ConfigError::DensityExponent(_)));
        assert!(matches!(bad(|c| c.spawn_period_ms = 0), ConfigError::ZeroPeriod));
        assert!(matches!(bad(|c| c.boundary_radius = f32::NAN), ConfigError::BoundaryRadius(_)));
        assert!(matches!(bad(|c| c.max_drift_speed = f32::INFINITY), ConfigError::DriftSpeed(_)));
        assert!(matches!(bad(|c| c.max_distance = f32::INFINITY), ConfigError::DistanceRange { .. }));
        assert!(matches!(bad(|c| c.max_frame_ms = 0), ConfigError::FrameStep { .. }));
        assert!(matches!(bad(|c| c.fallback_frame_ms = 0), ConfigError::FrameStep { .. }));
        assert!(matches!(
            bad(|c| {
                c.fallback_frame_ms = 50;
                c.max_frame_ms = 20;
            }),
            ConfigError::FrameStep { .. }
        ));
        assert!(matches!(
            bad(|c| c.visuals.saturation = 1.5),
            ConfigError::VisualRange { name: "saturation", .. }
        ));
        assert!(matches!(
            bad(|c| c.visuals.lightness_range = (0.2, 1.5)),
            ConfigError::VisualRange { name: "lightness", .. }
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(SceneConfig::from_json("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");

        let mut config = SceneConfig::default();
        config.capacity = 300;
        config.seed = Some(7);
        config.save(&path).unwrap();

        let loaded = SceneConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SceneConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
