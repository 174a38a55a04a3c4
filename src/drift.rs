//! Bounded random drift.
//!
//! Each particle wanders around its origin at a constant per-axis speed. When
//! the displacement on an axis passes the particle's boundary radius, that
//! velocity component is turned back toward the origin. Position is never
//! clamped, so a particle may overshoot by at most one tick of travel before
//! the reflected velocity brings it back.
//!
//! There are no cross-particle effects, so particles can be stepped in any
//! order, and a trajectory is fully determined by the initial state and the
//! sequence of `dt` values.

use crate::particle::Particle;

/// Per-tick integrator for particle drift.
///
/// Owned by the scene and passed to [`PopulationBuffer::tick`](crate::population::PopulationBuffer::tick).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DriftSimulator;

impl DriftSimulator {
    pub fn new() -> Self {
        Self
    }

    /// Advance one particle by `dt` seconds.
    ///
    /// Returns how many axes reflected this tick (0 to 3). A non-finite or
    /// negative `dt` is treated as zero.
    pub fn step(&self, particle: &mut Particle, dt: f32) -> u32 {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        particle.position += particle.velocity * dt;

        let r = particle.boundary_radius();
        let d = particle.displacement();
        let mut reflected = 0;

        let mut v = particle.velocity.to_array();
        for (axis, offset) in d.to_array().into_iter().enumerate() {
            if offset > r {
                v[axis] = -v[axis].abs();
                reflected += 1;
            } else if offset < -r {
                v[axis] = v[axis].abs();
                reflected += 1;
            }
        }
        particle.velocity = v.into();

        reflected
    }

    /// Advance every particle yielded by `particles`.
    ///
    /// Returns the total number of axis reflections.
    pub fn step_all<'a>(&self, particles: impl IntoIterator<Item = &'a mut Particle>, dt: f32) -> u32 {
        particles.into_iter().map(|p| self.step(p, dt)).sum()
    }
}
