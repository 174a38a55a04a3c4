//! Particle entity and factory.
//!
//! A [`Particle`] drifts around the point it was spawned at. Identity, origin
//! and appearance never change after construction; only position and velocity
//! are advanced by the [`DriftSimulator`](crate::drift::DriftSimulator).

use crate::spawn::SphericalSampler;
use crate::visuals::{Visual, VisualConfig};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::fmt;

/// Default per-axis drift bound around a particle's origin.
pub const DEFAULT_BOUNDARY_RADIUS: f32 = 0.5;

/// Default maximum per-axis initial drift speed (units per second).
pub const DEFAULT_MAX_DRIFT_SPEED: f32 = 0.2;

/// Opaque particle identity, unique within one factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u64);

impl ParticleId {
    /// Raw numeric value.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live particle.
#[derive(Debug, PartialEq)]
pub struct Particle {
    id: ParticleId,
    origin: Vec3,
    pub(crate) position: Vec3,
    pub(crate) velocity: Vec3,
    visual: Visual,
    boundary_radius: f32,
}

impl Particle {
    /// Build a particle directly. Prefer [`ParticleFactory::create`].
    pub fn new(id: ParticleId, origin: Vec3, velocity: Vec3, visual: Visual, boundary_radius: f32) -> Self {
        Self {
            id,
            origin,
            position: origin,
            velocity,
            visual,
            boundary_radius: boundary_radius.abs(),
        }
    }

    #[inline]
    pub fn id(&self) -> ParticleId {
        self.id
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[inline]
    pub fn visual(&self) -> &Visual {
        &self.visual
    }

    #[inline]
    pub fn boundary_radius(&self) -> f32 {
        self.boundary_radius
    }

    /// Per-axis displacement from the origin.
    #[inline]
    pub fn displacement(&self) -> Vec3 {
        self.position - self.origin
    }

    /// Owned copy of what a renderer needs to materialize this particle.
    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            id: self.id,
            position: self.position,
            visual: self.visual.clone(),
        }
    }

    /// GPU-friendly instance record.
    pub fn instance(&self) -> ParticleInstance {
        ParticleInstance::new(self.id, self.position, self.visual.color, self.visual.size)
    }
}

/// Particle data carried by an admission event.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSnapshot {
    pub id: ParticleId,
    pub position: Vec3,
    pub visual: Visual,
}

impl ParticleSnapshot {
    pub fn instance(&self) -> ParticleInstance {
        ParticleInstance::new(self.id, self.position, self.visual.color, self.visual.size)
    }
}

/// Per-frame position record, laid out for direct upload into an instance buffer.
///
/// Fields are grouped into 16-byte rows.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub id_lo: u32,
    pub id_hi: u32,
    pub size: f32,
    pub _pad: f32,
    pub position: [f32; 3],
    pub _pad2: f32,
    pub color: [f32; 3],
    pub _pad3: f32,
}

impl ParticleInstance {
    pub fn new(id: ParticleId, position: Vec3, color: Vec3, size: f32) -> Self {
        let id = id.get();
        Self {
            id_lo: id as u32,
            id_hi: (id >> 32) as u32,
            size,
            _pad: 0.0,
            position: position.to_array(),
            _pad2: 0.0,
            color: color.to_array(),
            _pad3: 0.0,
        }
    }

    /// Reassemble the particle id.
    #[inline]
    pub fn id(&self) -> ParticleId {
        ParticleId(((self.id_hi as u64) << 32) | self.id_lo as u64)
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Builds particles. Never touches the population or the renderer.
#[derive(Clone, Debug)]
pub struct ParticleFactory {
    next_id: u64,
    boundary_radius: f32,
    max_drift_speed: f32,
    visuals: VisualConfig,
}

impl ParticleFactory {
    pub fn new(visuals: VisualConfig) -> Self {
        Self {
            next_id: 0,
            boundary_radius: DEFAULT_BOUNDARY_RADIUS,
            max_drift_speed: DEFAULT_MAX_DRIFT_SPEED,
            visuals,
        }
    }

    pub fn with_boundary_radius(mut self, radius: f32) -> Self {
        self.boundary_radius = radius.abs();
        self
    }

    pub fn with_max_drift_speed(mut self, speed: f32) -> Self {
        self.max_drift_speed = speed.abs();
        self
    }

    #[inline]
    pub fn boundary_radius(&self) -> f32 {
        self.boundary_radius
    }

    #[inline]
    pub fn max_drift_speed(&self) -> f32 {
        self.max_drift_speed
    }

    #[inline]
    pub fn visuals(&self) -> &VisualConfig {
        &self.visuals
    }

    /// Number of particles created so far.
    #[inline]
    pub fn created(&self) -> u64 {
        self.next_id
    }

    /// Create a particle at `sample_point`.
    ///
    /// Appearance and initial velocity come from `sampler`. `measurement`
    /// does not influence the individual particle.
    pub fn create(&mut self, _measurement: f32, sample_point: Vec3, sampler: &mut SphericalSampler) -> Particle {
        let id = ParticleId(self.next_id);
        self.next_id += 1;

        let visual = self.visuals.generate(sampler);
        let velocity = sampler.random_drift_velocity(self.max_drift_speed);

        Particle::new(id, sample_point, velocity, visual, self.boundary_radius)
    }
}

impl Default for ParticleFactory {
    fn default() -> Self {
        Self::new(VisualConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_assigns_unique_ids() {
        let mut factory = ParticleFactory::default();
        let mut sampler = SphericalSampler::seeded(1);
        let a = factory.create(10.0, Vec3::ZERO, &mut sampler);
        let b = factory.create(10.0, Vec3::ZERO, &mut sampler);
        assert_ne!(a.id(), b.id());
        assert_eq!(factory.created(), 2);
    }

    #[test]
    fn test_new_particle_starts_at_origin() {
        let mut factory = ParticleFactory::default().with_max_drift_speed(0.3);
        let mut sampler = SphericalSampler::seeded(2);
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let p = factory.create(0.0, origin, &mut sampler);
        assert_eq!(p.position(), origin);
        assert_eq!(p.origin(), origin);
        assert!(p.velocity().abs().max_element() <= 0.3);
        assert_eq!(p.boundary_radius(), DEFAULT_BOUNDARY_RADIUS);
    }

    #[test]
    fn test_measurement_does_not_change_appearance() {
        let mut f1 = ParticleFactory::default();
        let mut f2 = ParticleFactory::default();
        let a = f1.create(5.0, Vec3::ONE, &mut SphericalSampler::seeded(9));
        let b = f2.create(500.0, Vec3::ONE, &mut SphericalSampler::seeded(9));
        assert_eq!(a.visual(), b.visual());
        assert_eq!(a.velocity(), b.velocity());
    }

    #[test]
    fn test_instance_layout_and_id() {
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 48);

        let visual = VisualConfig::default().generate(&mut SphericalSampler::seeded(3));
        let p = Particle::new(ParticleId(u64::MAX - 1), Vec3::X, Vec3::ZERO, visual, 0.5);
        let inst = p.instance();
        assert_eq!(inst.id(), p.id());
        assert_eq!(inst.position(), Vec3::X);

        let bytes = bytemuck::bytes_of(&inst);
        assert_eq!(bytes.len(), 48);
    }
}
