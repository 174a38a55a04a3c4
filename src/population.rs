//! Capacity-bounded particle population.
//!
//! The buffer owns every live particle. Admission order is eviction order: once
//! the buffer is full, admitting a particle pushes out the single oldest one.

use crate::drift::DriftSimulator;
use crate::particle::{Particle, ParticleId, ParticleInstance};
use std::collections::VecDeque;

/// Default population capacity.
pub const DEFAULT_CAPACITY: usize = 150;

/// Largest capacity a configuration may request.
pub const MAX_CAPACITY: usize = 10_000;

/// FIFO collection of live particles with a hard size limit.
#[derive(Debug)]
pub struct PopulationBuffer {
    particles: VecDeque<Particle>,
    capacity: usize,
}

impl PopulationBuffer {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            particles: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a particle, evicting and returning the oldest one if the
    /// buffer would otherwise exceed its capacity.
    pub fn admit(&mut self, particle: Particle) -> Option<Particle> {
        debug_assert!(!self.contains(particle.id()), "duplicate particle {}", particle.id());

        self.particles.push_back(particle);
        let evicted = if self.particles.len() > self.capacity {
            self.particles.pop_front()
        } else {
            None
        };

        debug_assert!(self.particles.len() <= self.capacity);
        evicted
    }

    /// Advance every particle by `dt` seconds. Returns total axis reflections.
    pub fn tick(&mut self, dt: f32, drift: &DriftSimulator) -> u32 {
        drift.step_all(self.particles.iter_mut(), dt)
    }

    /// Number of live particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Particles in admission order, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Particle> + '_ {
        self.particles.iter()
    }

    /// Ids in admission order, oldest first.
    pub fn ids(&self) -> Vec<ParticleId> {
        self.particles.iter().map(Particle::id).collect()
    }

    /// Instance records in admission order.
    pub fn snapshot(&self) -> Vec<ParticleInstance> {
        self.particles.iter().map(Particle::instance).collect()
    }

    /// Look up a live particle.
    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id() == id)
    }

    #[inline]
    pub fn contains(&self, id: ParticleId) -> bool {
        self.get(id).is_some()
    }

    /// The particle that will be evicted next.
    #[inline]
    pub fn oldest(&self) -> Option<&Particle> {
        self.particles.front()
    }

    /// Remove every particle, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = Particle> + '_ {
        self.particles.drain(..)
    }
}

impl Default for PopulationBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleFactory;
    use crate::spawn::SphericalSampler;
    use glam::Vec3;

    fn spawn(factory: &mut ParticleFactory, sampler: &mut SphericalSampler) -> Particle {
        let at = sampler.sample(1.0, 2.0);
        factory.create(10.0, at, sampler)
    }

    #[test]
    fn test_admit_below_capacity() {
        let mut factory = ParticleFactory::default();
        let mut sampler = SphericalSampler::seeded(0);
        let mut buffer = PopulationBuffer::new(3);
        for _ in 0..3 {
            assert!(buffer.admit(spawn(&mut factory, &mut sampler)).is_none());
        }
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut factory = ParticleFactory::default();
        let mut sampler = SphericalSampler::seeded(1);
        let mut buffer = PopulationBuffer::new(3);
        for _ in 0..3 {
            buffer.admit(spawn(&mut factory, &mut sampler));
        }
        let before = buffer.ids();

        let evicted = buffer.admit(spawn(&mut factory, &mut sampler)).expect("over capacity");
        assert_eq!(evicted.id(), before[0]);
        assert!(!buffer.contains(before[0]));
        assert_eq!(buffer.len(), 3);
        assert_eq!(&buffer.ids()[..2], &before[1..]);
    }

    #[test]
    fn test_zero_capacity_raised_to_one() {
        let buffer = PopulationBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
    }

    #[test]
    fn test_tick_moves_everything() {
        let mut factory = ParticleFactory::default().with_max_drift_speed(0.5);
        let mut sampler = SphericalSampler::seeded(2);
        let mut buffer = PopulationBuffer::new(10);
        for _ in 0..10 {
            buffer.admit(spawn(&mut factory, &mut sampler));
        }
        let before: Vec<Vec3> = buffer.iter().map(Particle::position).collect();
        buffer.tick(0.1, &DriftSimulator::new());
        let moved = buffer
            .iter()
            .zip(&before)
            .filter(|(p, b)| p.position() != **b)
            .count();
        assert_eq!(moved, 10);
    }

    #[test]
    fn test_drain_empties_in_order() {
        let mut factory = ParticleFactory::default();
        let mut sampler = SphericalSampler::seeded(3);
        let mut buffer = PopulationBuffer::new(5);
        for _ in 0..5 {
            buffer.admit(spawn(&mut factory, &mut sampler));
        }
        let ids = buffer.ids();
        let drained: Vec<ParticleId> = buffer.drain().map(|p| p.id()).collect();
        assert_eq!(drained, ids);
        assert!(buffer.is_empty());
    }
}
