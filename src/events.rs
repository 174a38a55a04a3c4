//! Scene events and the render sink.
//!
//! The simulation never calls into a renderer while it is mutating the
//! population. Admissions, removals and selections are queued as
//! [`SceneEvent`]s and handed to a [`RenderSink`] by
//! [`Scene::present`](crate::Scene::present), followed by one batch of
//! position updates for every live particle.

use crate::particle::{ParticleId, ParticleInstance, ParticleSnapshot};
use crate::selection::Selection;
use std::collections::HashMap;

/// Why a particle left the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalReason {
    /// Pushed out by a newer particle when the population was full.
    Evicted,
    /// The scene was torn down.
    Teardown,
}

/// Something the renderer needs to reflect.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
    /// A particle joined the population.
    Admitted(ParticleSnapshot),
    /// A particle left the population.
    Removed { id: ParticleId, reason: RemovalReason },
    /// The host asked about a particle.
    Selected(Selection),
    /// The measurement changed after activation.
    MeasurementChanged { previous: f32, current: f32 },
}

impl SceneEvent {
    /// The particle this event is about, if any.
    pub fn particle_id(&self) -> Option<ParticleId> {
        match self {
            SceneEvent::Admitted(snapshot) => Some(snapshot.id),
            SceneEvent::Removed { id, .. } => Some(*id),
            SceneEvent::Selected(selection) => Some(selection.id),
            SceneEvent::MeasurementChanged { .. } => None,
        }
    }
}

/// Consumer that materializes the scene.
pub trait RenderSink {
    /// Create the visual object for a new particle.
    fn particle_admitted(&mut self, particle: &ParticleSnapshot);

    /// Destroy the visual object for a particle.
    fn particle_removed(&mut self, id: ParticleId, reason: RemovalReason);

    /// Move every live particle. Called once per [`Scene::present`](crate::Scene::present).
    fn update_positions(&mut self, instances: &[ParticleInstance]);

    /// Display information about a selected particle.
    fn particle_selected(&mut self, _selection: &Selection) {}

    /// React to a new measurement value.
    fn measurement_changed(&mut self, _previous: f32, _current: f32) {}
}

/// Forward one event to the matching sink method.
pub fn dispatch<S: RenderSink + ?Sized>(sink: &mut S, event: &SceneEvent) {
    match event {
        SceneEvent::Admitted(snapshot) => sink.particle_admitted(snapshot),
        SceneEvent::Removed { id, reason } => sink.particle_removed(*id, *reason),
        SceneEvent::Selected(selection) => sink.particle_selected(selection),
        SceneEvent::MeasurementChanged { previous, current } => {
            sink.measurement_changed(*previous, *current)
        }
    }
}

/// Sink that mirrors the live scene in memory.
///
/// Useful for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Live particles keyed by id.
    pub live: HashMap<ParticleId, ParticleInstance>,
    /// Every admission seen, in order.
    pub admitted: Vec<ParticleId>,
    /// Every removal seen, in order.
    pub removed: Vec<(ParticleId, RemovalReason)>,
    /// Every selection seen, in order.
    pub selections: Vec<Selection>,
    /// Number of position batches received.
    pub frames: u64,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSink for RecordingSink {
    fn particle_admitted(&mut self, particle: &ParticleSnapshot) {
        self.admitted.push(particle.id);
        self.live.insert(particle.id, particle.instance());
    }

    fn particle_removed(&mut self, id: ParticleId, reason: RemovalReason) {
        self.removed.push((id, reason));
        self.live.remove(&id);
    }

    fn update_positions(&mut self, instances: &[ParticleInstance]) {
        self.frames += 1;
        for inst in instances {
            if let Some(live) = self.live.get_mut(&inst.id()) {
                *live = *inst;
            }
        }
    }

    fn particle_selected(&mut self, selection: &Selection) {
        self.selections.push(*selection);
    }
}
