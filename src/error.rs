//! Error types for pmdrift.
//!
//! Sampling and drift are pure and cannot fail. Only configuration loading and
//! scene activation against a host can, and those failures are returned to the
//! caller synchronously.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// A capability the rendering host could not provide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host has no repeating timer facility.
    #[error("host does not provide repeating timers; steady spawning cannot run")]
    TimersUnavailable,
    /// The host never delivers per-frame callbacks.
    #[error("host does not provide frame callbacks; particles would never drift")]
    FramesUnavailable,
    /// The host rejected the requested timer period.
    #[error("host rejected timer period of {0} ms")]
    InvalidPeriod(u64),
}

/// Errors from building or validating a [`SceneConfig`](crate::config::SceneConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("failed to access config file: {0}")]
    Io(#[from] io::Error),
    /// The file was not valid config JSON.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Capacity outside `1..=MAX_CAPACITY`.
    #[error("capacity must be between 1 and {max}, got {got}")]
    Capacity { got: usize, max: usize },
    /// Spawn distances are negative, non-finite or inverted.
    #[error("invalid spawn distance range {min}..{max}")]
    DistanceRange { min: f32, max: f32 },
    /// Density exponent is non-finite or not positive.
    #[error("density exponent must be finite and positive, got {0}")]
    DensityExponent(f32),
    /// The steady spawn period is zero.
    #[error("spawn period must be non-zero")]
    ZeroPeriod,
    /// Boundary radius is non-finite or not positive.
    #[error("boundary radius must be finite and positive, got {0}")]
    BoundaryRadius(f32),
    /// Drift speed is non-finite or negative.
    #[error("max drift speed must be finite and non-negative, got {0}")]
    DriftSpeed(f32),
    /// Frame steps are zero, or the fallback exceeds the clamp.
    #[error("frame steps must be non-zero with fallback {fallback:?} <= max {max:?}")]
    FrameStep { fallback: Duration, max: Duration },
    /// A visual band (hue, lightness, size) is inverted or out of range.
    #[error("invalid {name} range {min}..{max}")]
    VisualRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
}

/// Errors that can occur when driving a [`Scene`](crate::Scene).
#[derive(Debug, Error)]
pub enum SceneError {
    /// The host lacks a capability the scene needs.
    #[error("host capability unavailable: {0}")]
    Host(#[from] HostError),
    /// The scene configuration is invalid.
    #[error("invalid scene configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_wraps_into_scene_error() {
        let err: SceneError = HostError::TimersUnavailable.into();
        assert!(matches!(err, SceneError::Host(HostError::TimersUnavailable)));
        assert!(err.to_string().contains("repeating timers"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Capacity { got: 0, max: 10_000 };
        assert_eq!(err.to_string(), "capacity must be between 1 and 10000, got 0");
    }
}
