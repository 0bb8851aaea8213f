use crate::blob::{ClayBlob, ParticleId};
use crate::brush::{sanitize, MIN_RADIUS};
use crate::math::Point3;

use super::connect::relink;

#[derive(Debug, Clone, Copy)]
enum Target {
    Index(usize),
    Id(ParticleId),
}

/// Removes a single particle, addressed by position in the ordered view or
/// by handle.
pub struct RemoveParticle {
    target: Target,
}

impl RemoveParticle {
    /// Targets the particle currently at positional `index`.
    #[must_use]
    pub fn at(index: usize) -> Self {
        Self {
            target: Target::Index(index),
        }
    }

    /// Targets the particle with handle `id`.
    #[must_use]
    pub fn by_id(id: ParticleId) -> Self {
        Self {
            target: Target::Id(id),
        }
    }

    /// Executes the removal. Returns `false` for an out-of-range index or a
    /// stale handle, leaving the blob untouched.
    ///
    /// Connectors touching the particle are dropped and their surviving
    /// endpoints are re-linked to their current neighbors.
    pub fn execute(&self, blob: &mut ClayBlob) -> bool {
        let id = match self.target {
            Target::Index(index) => blob.id_at(index),
            Target::Id(id) => Some(id),
        };
        let Some(survivors) = id.and_then(|id| blob.remove(id)) else {
            return false;
        };
        relink(blob, survivors);
        true
    }
}

/// Removes every particle strictly within `radius` of a point.
pub struct RemoveNear {
    point: Point3,
    radius: f64,
}

impl RemoveNear {
    /// Creates a new `RemoveNear` operation. The radius is clamped to a
    /// minimum positive value.
    #[must_use]
    pub fn new(point: Point3, radius: f64) -> Self {
        Self {
            point,
            radius: sanitize(radius, MIN_RADIUS),
        }
    }

    /// Executes the removal, returning how many particles were removed.
    ///
    /// Hits are selected from a snapshot taken before anything is removed,
    /// so the result does not depend on removal order.
    pub fn execute(&self, blob: &mut ClayBlob) -> usize {
        let hits: Vec<ParticleId> = blob
            .snapshot()
            .into_iter()
            .filter(|(_, position)| (position - self.point).norm() < self.radius)
            .map(|(id, _)| id)
            .collect();

        let mut survivors = Vec::new();
        let mut removed = 0;
        for id in hits {
            if let Some(orphans) = blob.remove(id) {
                survivors.extend(orphans);
                removed += 1;
            }
        }
        relink(blob, survivors);

        if removed > 0 {
            tracing::debug!(removed, remaining = blob.len(), "removed particles near brush");
        }
        removed
    }
}
