//! Spawn scheduling.
//!
//! A scene spawns particles in two ways:
//!
//! | Phase | What happens |
//! |-------|--------------|
//! | Burst | Once, at activation: `ceil(measurement ^ density_exponent)` particles |
//! | Steady | One particle every `period`, until stopped |
//!
//! The scheduler only decides *how many* particles to spawn and when; the
//! [`Scene`](crate::Scene) creates and admits them.
//!
//! ```text
//! Idle ──activate──▶ BurstSpawning ──burst_complete──▶ Steady ──stop──▶ Stopped
//!   └────────────────────────────stop─────────────────────────────────────▲
//! ```

use crate::error::HostError;
use crate::host::{Host, TimerHandle};
use log::{debug, info, warn};
use std::time::Duration;

/// Default burst density exponent.
pub const DEFAULT_DENSITY_EXPONENT: f32 = 1.3;

/// Default steady spawn period.
pub const DEFAULT_SPAWN_PERIOD: Duration = Duration::from_millis(1000);

/// Size of the initial burst for a measurement.
///
/// `ceil(measurement ^ exponent)`. Negative or non-finite input yields 0;
/// results too large for `u32` saturate.
///
/// ```
/// use pmdrift::scheduler::burst_count;
///
/// assert_eq!(burst_count(0.0, 1.3), 0);
/// assert_eq!(burst_count(-5.0, 1.3), 0);
/// assert_eq!(burst_count(28.0, 1.3), 77);
/// ```
pub fn burst_count(measurement: f32, exponent: f32) -> u32 {
    if !measurement.is_finite() || measurement < 0.0 || !exponent.is_finite() {
        return 0;
    }
    let n = (measurement as f64).powf(exponent as f64).ceil();
    // Float to int casts saturate
    n as u32
}

/// Lifecycle of a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Not yet activated.
    Idle,
    /// Activated; the burst is being admitted.
    BurstSpawning,
    /// Spawning one particle per period.
    Steady,
    /// Stopped for good.
    Stopped,
}

/// Result of calling [`SpawnScheduler::activate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// First activation; the caller should admit `burst` particles.
    Started { burst: u32 },
    /// Already running; nothing happened.
    AlreadyActive,
    /// Already stopped; a scheduler never restarts.
    AlreadyStopped,
}

/// Decides when particles are spawned.
#[derive(Debug)]
pub struct SpawnScheduler {
    state: SchedulerState,
    period: Duration,
    density_exponent: f32,
    timer: Option<TimerHandle>,
    steady_spawns: u64,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            period: DEFAULT_SPAWN_PERIOD,
            density_exponent: DEFAULT_DENSITY_EXPONENT,
            timer: None,
            steady_spawns: 0,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn with_density_exponent(mut self, exponent: f32) -> Self {
        self.density_exponent = exponent;
        self
    }

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[inline]
    pub fn density_exponent(&self) -> f32 {
        self.density_exponent
    }

    /// Handle of the running timer, if any.
    #[inline]
    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    /// Particles granted by timer firings so far.
    #[inline]
    pub fn steady_spawns(&self) -> u64 {
        self.steady_spawns
    }

    /// Start the scheduler.
    ///
    /// Only the first call from `Idle` does anything: it registers the
    /// periodic timer with `host` and returns the burst size. If the host
    /// cannot provide a timer the scheduler stays `Idle` and the error is
    /// returned.
    pub fn activate<H: Host + ?Sized>(&mut self, host: &mut H, measurement: f32) -> Result<Activation, HostError> {
        match self.state {
            SchedulerState::Idle => {}
            SchedulerState::BurstSpawning | SchedulerState::Steady => {
                debug!("scheduler already active, ignoring activation");
                return Ok(Activation::AlreadyActive);
            }
            SchedulerState::Stopped => {
                debug!("scheduler stopped, ignoring activation");
                return Ok(Activation::AlreadyStopped);
            }
        }

        let timer = host.start_interval(self.period)?;
        self.timer = Some(timer);
        self.state = SchedulerState::BurstSpawning;

        if !measurement.is_finite() || measurement < 0.0 {
            warn!("measurement {measurement} is not a valid concentration, burst clamped to 0");
        }
        let burst = burst_count(measurement, self.density_exponent);
        info!(
            "scheduler active: burst of {burst} (measurement {measurement}, exponent {}), then 1 per {:?}",
            self.density_exponent, self.period
        );
        Ok(Activation::Started { burst })
    }

    /// Mark the burst as admitted and begin steady spawning.
    pub fn burst_complete(&mut self) {
        if self.state == SchedulerState::BurstSpawning {
            self.state = SchedulerState::Steady;
        }
    }

    /// Number of particles to spawn for a timer firing: 1 while steady and
    /// `handle` is this scheduler's timer, 0 otherwise.
    pub fn on_timer(&mut self, handle: TimerHandle) -> u32 {
        if self.state == SchedulerState::Steady && self.timer == Some(handle) {
            self.steady_spawns += 1;
            1
        } else {
            0
        }
    }

    /// Stop spawning for good. Safe to call repeatedly.
    ///
    /// Returns `true` if this call changed the state.
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        if let Some(timer) = self.timer.take() {
            host.cancel_interval(timer);
        }
        if self.state == SchedulerState::Stopped {
            return false;
        }
        info!("scheduler stopped after {} steady spawns", self.steady_spawns);
        self.state = SchedulerState::Stopped;
        true
    }
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        Self::new()
    }
}
