//! Frame timing.
//!
//! Hosts report elapsed time between frames irregularly, and sometimes not at
//! all. [`FrameClock`] turns whatever the host reports into a usable `dt`:
//! a missing or zero report falls back to a default frame length, and long
//! stalls are clamped so drift never jumps far past a particle's boundary.
//!
//! # Example
//!
//! ```
//! use pmdrift::time::FrameClock;
//! use std::time::Duration;
//!
//! let mut clock = FrameClock::new();
//! assert_eq!(clock.tick(None), 0.016);
//! assert_eq!(clock.tick(Some(Duration::from_millis(20))), 0.02);
//! assert_eq!(clock.frame(), 2);
//! ```

use std::time::Duration;

/// Frame length used when the host reports no elapsed time.
pub const DEFAULT_FALLBACK_DELTA: Duration = Duration::from_millis(16);

/// Longest single step the clock will hand out.
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(100);

/// Converts host-reported frame intervals into simulation time steps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Total simulated time in seconds.
    elapsed_secs: f32,
    /// Last step handed out, in seconds.
    delta_secs: f32,
    /// Total frames ticked.
    frame_count: u64,
    /// Step used for missing or zero reports.
    fallback_delta: Duration,
    /// Upper bound on a single step.
    max_delta: Duration,
    /// Fixed step overriding host reports (optional).
    fixed_delta: Option<f32>,
    /// Whether time is paused.
    paused: bool,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fallback_delta: DEFAULT_FALLBACK_DELTA,
            max_delta: DEFAULT_MAX_DELTA,
            fixed_delta: None,
            paused: false,
            time_scale: 1.0,
        }
    }

    /// Set the step used when the host reports nothing.
    pub fn with_fallback(mut self, fallback: Duration) -> Self {
        self.fallback_delta = fallback;
        self
    }

    /// Set the upper bound on a single step.
    pub fn with_max_delta(mut self, max: Duration) -> Self {
        self.max_delta = max;
        self
    }

    /// Advance one frame. Returns the step in seconds.
    pub fn tick(&mut self, reported: Option<Duration>) -> f32 {
        self.frame_count += 1;

        if self.paused {
            self.delta_secs = 0.0;
            return 0.0;
        }

        let raw = match reported {
            Some(d) if !d.is_zero() => d.min(self.max_delta),
            _ => self.fallback_delta.min(self.max_delta),
        };
        self.delta_secs = self.fixed_delta.unwrap_or(raw.as_secs_f32()) * self.time_scale;
        self.elapsed_secs += self.delta_secs;

        self.delta_secs
    }

    /// Total simulated time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Last step in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames ticked, including paused ones.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    #[inline]
    pub fn fallback_delta(&self) -> Duration {
        self.fallback_delta
    }

    #[inline]
    pub fn max_delta(&self) -> Duration {
        self.max_delta
    }

    /// Pause time progression. Ticks return 0 while paused.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after pausing.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Set a fixed step for deterministic updates.
    ///
    /// Pass `None` to use host-reported timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta.map(|d| d.max(0.0));
    }

    /// Set time scale multiplier.
    ///
    /// - `1.0` = normal speed
    /// - `0.5` = half speed (slow motion)
    /// - `2.0` = double speed
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }

    /// Reset counters, keeping configuration.
    pub fn reset(&mut self) {
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
        self.paused = false;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
        assert_eq!(clock.time_scale(), 1.0);
    }

    #[test]
    fn test_fallback_for_missing_or_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(None), 0.016);
        assert_eq!(clock.tick(Some(Duration::ZERO)), 0.016);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_measured_delta_is_clamped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(Some(Duration::from_secs(3))), 0.1);
    }

    #[test]
    fn test_clock_pause() {
        let mut clock = FrameClock::new();
        clock.tick(None);
        clock.pause();
        let before = clock.elapsed();
        assert_eq!(clock.tick(Some(Duration::from_millis(30))), 0.0);
        assert_eq!(clock.elapsed(), before);
        clock.resume();
        assert!(clock.tick(None) > 0.0);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = FrameClock::new();
        clock.set_time_scale(2.0);
        assert_eq!(clock.tick(Some(Duration::from_millis(10))), 0.02);

        // Negative scale should clamp to 0
        clock.set_time_scale(-1.0);
        assert_eq!(clock.time_scale(), 0.0);
    }

    #[test]
    fn test_fixed_delta() {
        let mut clock = FrameClock::new();
        clock.set_fixed_delta(Some(1.0 / 60.0));
        let dt = clock.tick(Some(Duration::from_millis(90)));
        assert!((dt - 1.0 / 60.0).abs() < 1e-6);
    }
}
