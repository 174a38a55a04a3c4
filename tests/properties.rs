//! Property tests for population and drift invariants.

use pmdrift::drift::DriftSimulator;
use pmdrift::particle::ParticleFactory;
use pmdrift::population::PopulationBuffer;
use pmdrift::scheduler::burst_count;
use pmdrift::spawn::SphericalSampler;
use proptest::prelude::*;

proptest! {
    #[test]
    fn population_never_exceeds_capacity(capacity in 1usize..300, admits in 0usize..1000, seed in any::<u64>()) {
        let mut sampler = SphericalSampler::seeded(seed);
        let mut factory = ParticleFactory::default();
        let mut buffer = PopulationBuffer::new(capacity);

        for _ in 0..admits {
            let at = sampler.sample(1.0, 4.0);
            let particle = factory.create(10.0, at, &mut sampler);
            let oldest = buffer.oldest().map(|p| p.id());
            let full = buffer.len() == capacity;

            let evicted = buffer.admit(particle);

            prop_assert!(buffer.len() <= capacity);
            if full {
                prop_assert_eq!(evicted.map(|p| p.id()), oldest);
            } else {
                prop_assert!(evicted.is_none());
            }
        }
        prop_assert_eq!(buffer.len(), admits.min(capacity));
    }

    #[test]
    fn ids_stay_unique(capacity in 1usize..100, admits in 0usize..400) {
        let mut sampler = SphericalSampler::seeded(0);
        let mut factory = ParticleFactory::default();
        let mut buffer = PopulationBuffer::new(capacity);
        for _ in 0..admits {
            buffer.admit(factory.create(1.0, sampler.sample(1.0, 2.0), &mut sampler));
        }
        let mut ids = buffer.ids();
        let n = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), n);
    }

    #[test]
    fn drift_stays_within_boundary(
        seed in any::<u64>(),
        radius in 0.05f32..2.0,
        speed in 0.0f32..1.0,
        dts in prop::collection::vec(0.0f32..0.05, 1..500),
    ) {
        let mut sampler = SphericalSampler::seeded(seed);
        let mut factory = ParticleFactory::default()
            .with_boundary_radius(radius)
            .with_max_drift_speed(speed);
        let mut particle = factory.create(5.0, sampler.sample(1.0, 3.0), &mut sampler);
        let drift = DriftSimulator::new();

        // One tick's worst-case travel
        let eps = particle.velocity().abs().max_element() * 0.05 + 1e-4;
        for dt in dts {
            drift.step(&mut particle, dt);
            prop_assert!(particle.displacement().abs().max_element() <= radius + eps);
        }
    }

    #[test]
    fn shell_distances_in_range(seed in any::<u64>(), min in 0.0f32..5.0, width in 0.01f32..5.0) {
        let mut sampler = SphericalSampler::seeded(seed);
        let max = min + width;
        for _ in 0..100 {
            let d = sampler.sample(min, max).length();
            prop_assert!(d >= min - 1e-3 && d < max + 1e-3);
        }
    }

    #[test]
    fn burst_count_is_ceiling(measurement in 0.0f32..500.0, exponent in 1.0f32..2.0) {
        let n = burst_count(measurement, exponent);
        let exact = (measurement as f64).powf(exponent as f64);
        prop_assert!(n as f64 >= exact);
        prop_assert!((n as f64) < exact + 1.0);
    }

    #[test]
    fn burst_count_never_negative(measurement in any::<f32>()) {
        let n = burst_count(measurement, 1.3);
        if !(measurement.is_finite() && measurement >= 0.0) {
            prop_assert_eq!(n, 0);
        }
    }
}
