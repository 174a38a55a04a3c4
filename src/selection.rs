//! Particle selection.
//!
//! The host reports that a particle was clicked; the scene answers with a
//! [`Selection`] carrying the current measurement so the host can show it.
//! The core itself renders nothing.
//!
//! # Example
//!
//! ```ignore
//! // In the host's click handler:
//! if let Some(selection) = scene.select(clicked_id) {
//!     label.set_text(format!("PM2.5: {:.1} µg/m³", selection.measurement));
//! }
//! ```

use crate::particle::ParticleId;
use glam::Vec3;

/// A particle the host asked about, with the value to display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    pub id: ParticleId,
    /// Measurement current at the time of selection.
    pub measurement: f32,
    /// Particle position at the time of selection.
    pub position: Vec3,
}

/// Tracks which particle, if any, is selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectedParticle(Option<ParticleId>);

impl SelectedParticle {
    /// Currently selected particle.
    #[inline]
    pub fn get(&self) -> Option<ParticleId> {
        self.0
    }

    pub fn set(&mut self, id: ParticleId) {
        self.0 = Some(id);
    }

    /// Drop the selection if it refers to `id`. Returns whether it did.
    pub fn forget(&mut self, id: ParticleId) -> bool {
        if self.0 == Some(id) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}
