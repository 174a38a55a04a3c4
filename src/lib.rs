//! # pmdrift - PM2.5 particle drift
//!
//! A bounded, continuously refreshed particle population that turns an
//! air-quality reading into something you can see around you in AR.
//!
//! pmdrift is the simulation core only. It decides how many particles exist,
//! where they spawn and how they move; a renderer subscribes to its events and
//! draws them.
//!
//! ## Quick Start
//!
//! ```
//! use pmdrift::prelude::*;
//! use std::time::Duration;
//!
//! let mut host = ManualHost::new();
//! let mut sink = RecordingSink::new();
//!
//! let mut scene = Scene::new(28.0)          // PM2.5 in µg/m³
//!     .with_capacity(150)
//!     .with_distance_range(1.0, 4.0)
//!     .with_density_exponent(1.3)
//!     .with_spawn_period(Duration::from_millis(1000));
//!
//! scene.activate(&mut host).unwrap();        // burst of ceil(28^1.3) = 77
//!
//! // Host loop
//! for _ in 0..60 {
//!     for timer in host.advance(Duration::from_millis(16)) {
//!         scene.on_timer(timer);
//!     }
//!     scene.on_frame(Some(Duration::from_millis(16)));
//!     scene.present(&mut sink);
//! }
//!
//! scene.teardown(&mut host);
//! scene.present(&mut sink);
//! assert!(sink.live.is_empty());
//! ```
//!
//! ## Core Concepts
//!
//! ### Burst and steady spawning
//!
//! On activation a scene admits `ceil(measurement ^ density_exponent)`
//! particles at once, then one more every spawn period. See
//! [`scheduler`].
//!
//! ### Bounded population
//!
//! The [`PopulationBuffer`] holds at most `capacity` particles. Admitting
//! into a full buffer evicts the oldest particle.
//!
//! ### Drift
//!
//! Each particle moves at a constant per-axis speed and turns back when it
//! strays more than `boundary_radius` from where it spawned. See [`drift`].
//!
//! ### Hosts and sinks
//!
//! | Seam | Provided by | Purpose |
//! |------|-------------|---------|
//! | [`Host`] | rendering host | repeating timer, frame callbacks |
//! | [`RenderSink`] | renderer adapter | create, move, destroy visuals |
//!
//! [`ManualHost`] and [`RecordingSink`] implement both seams in memory for
//! headless runs and tests.

pub mod config;
pub mod drift;
pub mod error;
pub mod events;
pub mod host;
pub mod particle;
pub mod population;
mod scene;
pub mod scheduler;
pub mod selection;
pub mod spawn;
pub mod time;
pub mod visuals;

pub use bytemuck;
pub use config::SceneConfig;
pub use drift::DriftSimulator;
pub use error::{ConfigError, HostError, SceneError};
pub use events::{RecordingSink, RemovalReason, RenderSink, SceneEvent};
pub use glam::Vec3;
pub use host::{Host, ManualHost, TimerHandle};
pub use particle::{Particle, ParticleFactory, ParticleId, ParticleInstance, ParticleSnapshot};
pub use population::PopulationBuffer;
pub use scene::Scene;
pub use scheduler::{burst_count, Activation, SchedulerState, SpawnScheduler};
pub use selection::Selection;
pub use spawn::{SphereCoverage, SphericalSampler};
pub use time::FrameClock;
pub use visuals::{SatelliteLayout, Visual, VisualConfig};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use pmdrift::prelude::*;
/// ```
///
/// This imports:
/// - [`Scene`] - the scene builder
/// - [`SceneConfig`] - JSON-loadable settings
/// - [`Host`], [`ManualHost`], [`TimerHandle`] - host seam
/// - [`RenderSink`], [`RecordingSink`], [`SceneEvent`] - renderer seam
/// - [`Vec3`] - glam vector type
pub mod prelude {
    pub use crate::config::SceneConfig;
    pub use crate::events::{RecordingSink, RemovalReason, RenderSink, SceneEvent};
    pub use crate::host::{Host, ManualHost, TimerHandle};
    pub use crate::particle::{ParticleId, ParticleInstance, ParticleSnapshot};
    pub use crate::scene::Scene;
    pub use crate::scheduler::{Activation, SchedulerState};
    pub use crate::selection::Selection;
    pub use crate::spawn::SphereCoverage;
    pub use crate::time::FrameClock;
    pub use crate::visuals::{SatelliteLayout, VisualConfig};
    pub use crate::Vec3;
}
