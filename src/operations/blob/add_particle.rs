use crate::blob::{ClayBlob, ParticleId};
use crate::math::Point3;

use super::connect::connect_to_neighbors;

/// Adds one particle and bridges it to its nearest neighbors.
pub struct AddParticle {
    position: Point3,
    radius: f64,
}

impl AddParticle {
    /// Creates a new `AddParticle` operation.
    #[must_use]
    pub fn new(position: Point3, radius: f64) -> Self {
        Self { position, radius }
    }

    /// Executes the insertion.
    ///
    /// Returns `None` without touching the blob when it is at capacity or the
    /// position is not finite. The radius is clamped into the blob's size
    /// range. With blending on, the new particle is linked to at most
    /// `max_connections` nearest particles inside its blend radius.
    pub fn execute(&self, blob: &mut ClayBlob) -> Option<ParticleId> {
        if !self.position.coords.iter().all(|c| c.is_finite()) {
            tracing::debug!("rejected particle with non-finite position");
            return None;
        }
        if blob.is_full() {
            tracing::debug!(max = blob.max_particles(), "particle capacity reached");
            return None;
        }
        let radius = blob.clamp_radius(self.radius);
        let id = blob.insert(self.position, radius)?;
        connect_to_neighbors(blob, id);
        Some(id)
    }
}
