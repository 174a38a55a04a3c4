//! Spawn position sampling.
//!
//! Every particle is placed at a random point in a spherical shell around the
//! viewer. Directions are drawn with the inverse-cosine method so the density
//! is uniform per unit of solid angle:
//!
//! ```ignore
//! let theta = rng.gen_range(0.0..TAU);
//! let phi = (2.0 * u - 1.0).acos();   // NOT rng.gen_range(0.0..PI)
//! ```
//!
//! Drawing `phi` uniformly instead piles samples up at the poles.
//!
//! # Example
//!
//! ```
//! use pmdrift::spawn::SphericalSampler;
//!
//! let mut sampler = SphericalSampler::seeded(7);
//! let p = sampler.sample(1.0, 4.0);
//! assert!(p.length() >= 1.0 && p.length() < 4.0 + 1e-4);
//! ```

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Which part of the sphere spawn directions cover.
///
/// The vertical axis is `+Y`, matching the usual AR world frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SphereCoverage {
    /// Every direction around the viewer.
    #[default]
    Full,
    /// Only directions with `y >= 0`.
    UpperHemisphere,
}

/// Seeded sampler for spawn positions and initial drift velocities.
///
/// Two samplers created with the same seed produce identical sequences.
#[derive(Clone, Debug)]
pub struct SphericalSampler {
    coverage: SphereCoverage,
    rng: SmallRng,
}

impl SphericalSampler {
    /// Create a sampler with a fixed seed (reproducible).
    pub fn seeded(seed: u64) -> Self {
        Self {
            coverage: SphereCoverage::Full,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Create a sampler seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            coverage: SphereCoverage::Full,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Restrict or widen the covered directions.
    pub fn with_coverage(mut self, coverage: SphereCoverage) -> Self {
        self.coverage = coverage;
        self
    }

    /// Current direction coverage.
    #[inline]
    pub fn coverage(&self) -> SphereCoverage {
        self.coverage
    }

    // ========== Random primitives ==========

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty or unbounded
    /// range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min && (max - min).is_finite() {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    // ========== Position helpers ==========

    /// Uniform unit direction over the configured coverage.
    pub fn sample_unit(&mut self) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let u: f32 = self.rng.gen();
        let cos_phi = match self.coverage {
            // phi = acos(2u - 1)
            SphereCoverage::Full => 2.0 * u - 1.0,
            SphereCoverage::UpperHemisphere => u,
        };
        let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();

        Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin())
    }

    /// Point whose distance from the origin is uniform in
    /// `[min_distance, max_distance)` and whose direction is uniform.
    ///
    /// Swapped bounds are reordered; equal bounds sample the sphere surface.
    pub fn sample(&mut self, min_distance: f32, max_distance: f32) -> Vec3 {
        let (lo, hi) = if max_distance < min_distance {
            (max_distance, min_distance)
        } else {
            (min_distance, max_distance)
        };
        let r = self.random_range(lo, hi);
        self.sample_unit() * r
    }

    // ========== Velocity helpers ==========

    /// Velocity with each axis uniform in `[-max_speed, max_speed)`.
    pub fn random_drift_velocity(&mut self, max_speed: f32) -> Vec3 {
        let s = max_speed.abs();
        Vec3::new(
            self.random_range(-s, s),
            self.random_range(-s, s),
            self.random_range(-s, s),
        )
    }
}

impl Default for SphericalSampler {
    fn default() -> Self {
        Self::from_entropy()
    }
}
