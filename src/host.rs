//! Rendering host capabilities.
//!
//! The scene never owns a thread or a clock. It asks the host for a repeating
//! timer (steady spawning) and for frame callbacks (drift), and the host calls
//! back into [`Scene::on_timer`](crate::Scene::on_timer) and
//! [`Scene::on_frame`](crate::Scene::on_frame).
//!
//! The host only ever holds [`TimerHandle`] values, so tearing down a scene
//! leaves nothing behind that keeps its particles alive.

use crate::error::HostError;
use std::time::Duration;

/// Identifies one repeating timer registered with a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// What the scene needs from its rendering host.
pub trait Host {
    /// Start a repeating timer firing every `period`.
    fn start_interval(&mut self, period: Duration) -> Result<TimerHandle, HostError>;

    /// Cancel a timer. Unknown or already-cancelled handles are ignored.
    fn cancel_interval(&mut self, handle: TimerHandle);

    /// Ask the host to start delivering frame callbacks.
    fn request_frames(&mut self) -> Result<(), HostError>;

    /// Stop delivering frame callbacks.
    fn release_frames(&mut self);
}

#[derive(Debug)]
struct Interval {
    handle: TimerHandle,
    period: Duration,
    pending: Duration,
}

/// Deterministic host driven by explicit calls to [`advance`](Self::advance).
///
/// Used by the headless runner and by tests.
///
/// # Example
///
/// ```
/// use pmdrift::host::{Host, ManualHost};
/// use std::time::Duration;
///
/// let mut host = ManualHost::new();
/// let timer = host.start_interval(Duration::from_millis(1000)).unwrap();
/// assert!(host.advance(Duration::from_millis(999)).is_empty());
/// assert_eq!(host.advance(Duration::from_millis(1)), vec![timer]);
/// ```
#[derive(Debug)]
pub struct ManualHost {
    timers_available: bool,
    frames_available: bool,
    frames_requested: bool,
    next_handle: u64,
    intervals: Vec<Interval>,
}

impl ManualHost {
    /// A host with every capability.
    pub fn new() -> Self {
        Self {
            timers_available: true,
            frames_available: true,
            frames_requested: false,
            next_handle: 1,
            intervals: Vec::new(),
        }
    }

    /// A host that cannot run repeating timers.
    pub fn without_timers() -> Self {
        Self {
            timers_available: false,
            ..Self::new()
        }
    }

    /// A host that never delivers frames.
    pub fn without_frames() -> Self {
        Self {
            frames_available: false,
            ..Self::new()
        }
    }

    /// Number of timers currently running.
    pub fn active_timers(&self) -> usize {
        self.intervals.len()
    }

    /// Whether a frame subscription is active.
    pub fn frames_requested(&self) -> bool {
        self.frames_requested
    }

    /// Let `elapsed` pass and return every timer firing that became due,
    /// in firing order per timer. A timer can fire several times if
    /// `elapsed` spans several periods.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerHandle> {
        let mut fired = Vec::new();
        for interval in &mut self.intervals {
            interval.pending += elapsed;
            while interval.pending >= interval.period {
                interval.pending -= interval.period;
                fired.push(interval.handle);
            }
        }
        fired
    }
}

impl Default for ManualHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for ManualHost {
    fn start_interval(&mut self, period: Duration) -> Result<TimerHandle, HostError> {
        if !self.timers_available {
            return Err(HostError::TimersUnavailable);
        }
        if period.is_zero() {
            return Err(HostError::InvalidPeriod(0));
        }

        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.intervals.push(Interval {
            handle,
            period,
            pending: Duration::ZERO,
        });
        Ok(handle)
    }

    fn cancel_interval(&mut self, handle: TimerHandle) {
        self.intervals.retain(|i| i.handle != handle);
    }

    fn request_frames(&mut self) -> Result<(), HostError> {
        if !self.frames_available {
            return Err(HostError::FramesUnavailable);
        }
        self.frames_requested = true;
        Ok(())
    }

    fn release_frames(&mut self) {
        self.frames_requested = false;
    }
}
