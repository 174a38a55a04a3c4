//! Scene builder and controller.
//!
//! A [`Scene`] owns the whole simulation: sampler, factory, population,
//! drift integrator, scheduler and frame clock. The host drives it through
//! four entry points and never touches the population directly:
//!
//! | Host event | Scene call |
//! |------------|------------|
//! | Scene shown | [`Scene::activate`] |
//! | Repeating timer fired | [`Scene::on_timer`] |
//! | Frame | [`Scene::on_frame`] then [`Scene::present`] |
//! | Scene hidden | [`Scene::teardown`] |
//!
//! Events queue up until [`Scene::present`] or [`Scene::take_events`]. The
//! queue stays bounded by roughly twice the capacity even if the host never
//! drains it: a particle evicted before it was ever presented takes its
//! queued events with it, and only the latest selection and measurement
//! change are kept.

use crate::config::{self, SceneConfig};
use crate::drift::DriftSimulator;
use crate::error::{ConfigError, SceneError};
use crate::events::{dispatch, RemovalReason, RenderSink, SceneEvent};
use crate::host::{Host, TimerHandle};
use crate::particle::{Particle, ParticleFactory, ParticleId, ParticleInstance};
use crate::population::{PopulationBuffer, DEFAULT_CAPACITY};
use crate::scheduler::{Activation, SchedulerState, SpawnScheduler};
use crate::selection::{SelectedParticle, Selection};
use crate::spawn::{SphereCoverage, SphericalSampler};
use crate::time::FrameClock;
use crate::visuals::VisualConfig;
use log::{debug, info};
use std::time::Duration;

/// A particle scene visualizing one measurement.
///
/// Use method chaining to configure, then [`activate`](Self::activate) it
/// against a host.
///
/// ```
/// use pmdrift::host::ManualHost;
/// use pmdrift::events::RecordingSink;
/// use pmdrift::Scene;
/// use std::time::Duration;
///
/// let mut host = ManualHost::new();
/// let mut sink = RecordingSink::new();
/// let mut scene = Scene::new(12.0).with_capacity(100).with_seed(1);
///
/// scene.activate(&mut host).unwrap();
/// for timer in host.advance(Duration::from_secs(1)) {
///     scene.on_timer(timer);
/// }
/// scene.on_frame(Some(Duration::from_millis(16)));
/// scene.present(&mut sink);
///
/// assert_eq!(sink.live.len(), scene.population().len());
/// ```
#[derive(Debug)]
pub struct Scene {
    measurement: f32,
    min_distance: f32,
    max_distance: f32,
    sampler: SphericalSampler,
    factory: ParticleFactory,
    drift: DriftSimulator,
    population: PopulationBuffer,
    scheduler: SpawnScheduler,
    clock: FrameClock,
    selected: SelectedParticle,
    events: Vec<SceneEvent>,
    instances: Vec<ParticleInstance>,
    frames_held: bool,
}

impl Scene {
    /// Create a scene with default settings.
    pub fn new(measurement: f32) -> Self {
        Self {
            measurement,
            min_distance: 1.0,
            max_distance: 4.0,
            sampler: SphericalSampler::from_entropy(),
            factory: ParticleFactory::default(),
            drift: DriftSimulator::new(),
            population: PopulationBuffer::new(DEFAULT_CAPACITY),
            scheduler: SpawnScheduler::new(),
            clock: FrameClock::new(),
            selected: SelectedParticle::default(),
            events: Vec::new(),
            instances: Vec::new(),
            frames_held: false,
        }
    }

    /// Build a scene from a validated configuration.
    pub fn from_config(measurement: f32, config: &SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let clock = FrameClock::new()
            .with_fallback(config.fallback_frame())
            .with_max_delta(config.max_frame());

        let mut scene = Scene::new(measurement)
            .with_capacity(config.capacity)
            .with_distance_range(config.min_distance, config.max_distance)
            .with_density_exponent(config.density_exponent)
            .with_spawn_period(config.spawn_period())
            .with_boundary_radius(config.boundary_radius)
            .with_max_drift_speed(config.max_drift_speed)
            .with_clock(clock)
            .with_visuals(|v| *v = config.visuals.clone());

        if let Some(seed) = config.seed {
            scene = scene.with_seed(seed);
        }
        Ok(scene.with_coverage(config.coverage))
    }

    /// Set the maximum number of live particles.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.population = PopulationBuffer::new(capacity);
        self
    }

    /// Set the spawn shell around the viewer.
    pub fn with_distance_range(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Set the burst density exponent.
    pub fn with_density_exponent(mut self, exponent: f32) -> Self {
        self.scheduler = self.scheduler.with_density_exponent(exponent);
        self
    }

    /// Set the steady spawn period.
    pub fn with_spawn_period(mut self, period: Duration) -> Self {
        self.scheduler = self.scheduler.with_period(period);
        self
    }

    /// Set the per-axis drift bound for new particles.
    pub fn with_boundary_radius(mut self, radius: f32) -> Self {
        self.factory = self.factory.with_boundary_radius(radius);
        self
    }

    /// Set the per-axis initial drift speed bound for new particles.
    pub fn with_max_drift_speed(mut self, speed: f32) -> Self {
        self.factory = self.factory.with_max_drift_speed(speed);
        self
    }

    /// Configure particle appearance. Bands are checked on
    /// [`activate`](Self::activate).
    ///
    /// ```ignore
    /// .with_visuals(|v| {
    ///     v.hue_range(0.0, 30.0);
    ///     v.satellites(0, 0.0, 0.0);
    /// })
    /// ```
    pub fn with_visuals<F: FnOnce(&mut VisualConfig)>(mut self, configure: F) -> Self {
        let mut visuals = self.factory.visuals().clone();
        configure(&mut visuals);
        self.factory = ParticleFactory::new(visuals)
            .with_boundary_radius(self.factory.boundary_radius())
            .with_max_drift_speed(self.factory.max_drift_speed());
        self
    }

    /// Restrict spawn directions.
    pub fn with_coverage(mut self, coverage: SphereCoverage) -> Self {
        self.sampler = self.sampler.with_coverage(coverage);
        self
    }

    /// Make spawning reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.sampler = SphericalSampler::seeded(seed).with_coverage(self.sampler.coverage());
        self
    }

    /// Replace the frame clock.
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    // ========== Lifecycle ==========

    /// Start the scene: subscribe to frames, start the steady spawn timer and
    /// admit the initial burst.
    ///
    /// Only the first call does anything; later calls report
    /// [`Activation::AlreadyActive`] or [`Activation::AlreadyStopped`]. If the
    /// host is missing a capability, nothing is admitted, the scene stays
    /// idle and the error is returned. Builder values are validated first,
    /// with the same rules as [`SceneConfig::validate`].
    pub fn activate<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<Activation, SceneError> {
        if self.scheduler.state() != SchedulerState::Idle {
            return Ok(self.scheduler.activate(host, self.measurement)?);
        }

        self.validate()?;
        host.request_frames()?;
        let activation = match self.scheduler.activate(host, self.measurement) {
            Ok(activation) => activation,
            Err(e) => {
                host.release_frames();
                return Err(e.into());
            }
        };
        self.frames_held = true;

        if let Activation::Started { burst } = activation {
            // Anything beyond capacity would be evicted by the same burst
            let admitted = (burst as usize).min(self.population.capacity());
            if admitted < burst as usize {
                debug!("burst of {burst} truncated to capacity {admitted}");
            }
            self.spawn(admitted);
            self.scheduler.burst_complete();
            info!("scene active with {} particles", self.population.len());
        }

        Ok(activation)
    }

    /// Handle a host timer firing. Returns the number of particles spawned.
    pub fn on_timer(&mut self, handle: TimerHandle) -> usize {
        let count = self.scheduler.on_timer(handle) as usize;
        self.spawn(count);
        count
    }

    /// Advance drift by one frame. Returns the step used, in seconds.
    ///
    /// `reported` is the host's elapsed time since the previous frame; `None`
    /// or zero falls back to the clock's default frame length.
    pub fn on_frame(&mut self, reported: Option<Duration>) -> f32 {
        let dt = self.clock.tick(reported);
        self.population.tick(dt, &self.drift);
        dt
    }

    /// Deliver queued events to `sink`, then the current positions.
    pub fn present<S: RenderSink + ?Sized>(&mut self, sink: &mut S) {
        for event in self.events.drain(..) {
            dispatch(sink, &event);
        }

        self.instances.clear();
        self.instances.extend(self.population.iter().map(Particle::instance));
        sink.update_positions(&self.instances);
    }

    /// Stop steady spawning. Safe to call repeatedly.
    ///
    /// Live particles keep drifting until [`teardown`](Self::teardown).
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        self.scheduler.stop(host)
    }

    /// Stop spawning, release frames and remove every particle.
    ///
    /// Removal events stay queued for a final [`present`](Self::present).
    pub fn teardown<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.scheduler.stop(host);
        if self.frames_held {
            host.release_frames();
            self.frames_held = false;
        }

        let removed = self.population.len();
        for particle in self.population.drain() {
            self.events.push(SceneEvent::Removed {
                id: particle.id(),
                reason: RemovalReason::Teardown,
            });
        }
        self.selected.clear();
        info!("scene torn down, {removed} particles removed");
    }

    // ========== Interaction ==========

    /// Select a live particle. Returns `None` for unknown ids.
    ///
    /// An undelivered earlier selection is replaced.
    pub fn select(&mut self, id: ParticleId) -> Option<Selection> {
        let particle = self.population.get(id)?;
        let selection = Selection {
            id,
            measurement: self.measurement,
            position: particle.position(),
        };
        self.selected.set(id);
        self.events.retain(|e| !matches!(e, SceneEvent::Selected(_)));
        self.events.push(SceneEvent::Selected(selection));
        Some(selection)
    }

    /// Update the measurement.
    ///
    /// Before activation this changes the burst size. Afterwards it only
    /// changes what selections report; the population is not re-seeded.
    pub fn set_measurement(&mut self, measurement: f32) {
        let previous = self.measurement;
        if previous.to_bits() == measurement.to_bits() {
            return;
        }
        self.measurement = measurement;

        if self.scheduler.state() != SchedulerState::Idle {
            debug!("measurement changed {previous} -> {measurement}");
            let pending = self.events.iter_mut().find_map(|e| match e {
                SceneEvent::MeasurementChanged { current, .. } => Some(current),
                _ => None,
            });
            match pending {
                Some(current) => *current = measurement,
                None => self.events.push(SceneEvent::MeasurementChanged {
                    previous,
                    current: measurement,
                }),
            }
        }
    }

    // ========== Accessors ==========

    #[inline]
    pub fn measurement(&self) -> f32 {
        self.measurement
    }

    #[inline]
    pub fn population(&self) -> &PopulationBuffer {
        &self.population
    }

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    #[inline]
    pub fn scheduler(&self) -> &SpawnScheduler {
        &self.scheduler
    }

    #[inline]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Pause, scale or fix the frame clock.
    #[inline]
    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    #[inline]
    pub fn distance_range(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    /// Currently selected particle, if it is still alive.
    #[inline]
    pub fn selected(&self) -> Option<ParticleId> {
        self.selected.get()
    }

    /// Events not yet delivered by [`present`](Self::present).
    #[inline]
    pub fn pending_events(&self) -> &[SceneEvent] {
        &self.events
    }

    /// Take queued events without a sink.
    pub fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Check the builder values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        config::check_distance_range(self.min_distance, self.max_distance)?;
        config::check_density_exponent(self.scheduler.density_exponent())?;
        if self.scheduler.period().is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }
        config::check_drift(self.factory.boundary_radius(), self.factory.max_drift_speed())?;
        config::check_frame_steps(self.clock.fallback_delta(), self.clock.max_delta())?;
        self.factory.visuals().validate()
    }

    // ========== Internals ==========

    fn spawn(&mut self, count: usize) {
        for _ in 0..count {
            let at = self.sampler.sample(self.min_distance, self.max_distance);
            let particle = self.factory.create(self.measurement, at, &mut self.sampler);
            self.admit(particle);
        }
    }

    fn admit(&mut self, particle: Particle) {
        self.events.push(SceneEvent::Admitted(particle.snapshot()));

        if let Some(evicted) = self.population.admit(particle) {
            let id = evicted.id();
            debug!("evicted particle {id} ({} live)", self.population.len());
            self.selected.forget(id);

            let unseen = self
                .events
                .iter()
                .any(|e| matches!(e, SceneEvent::Admitted(s) if s.id == id));
            if unseen {
                // The sink never saw it
                self.events.retain(|e| e.particle_id() != Some(id));
            } else {
                self.events.push(SceneEvent::Removed {
                    id,
                    reason: RemovalReason::Evicted,
                });
            }
        }
    }
}
