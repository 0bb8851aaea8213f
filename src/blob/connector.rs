use crate::math::{safe_normalize, Point3, Vector3};

use super::particle::{Particle, ParticleId};

slotmap::new_key_type! {
    /// Identifier of a connector between two particles.
    pub struct ConnectorId;
}

/// A visual bridge between two particles.
///
/// Only the endpoints are stored. The bridge's geometry is derived from
/// the endpoints' current state through [`ConnectorShape::between`], so it
/// follows the particles as they move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connector {
    /// First endpoint.
    pub a: ParticleId,
    /// Second endpoint.
    pub b: ParticleId,
}

impl Connector {
    /// Returns `true` if `id` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, id: ParticleId) -> bool {
        self.a == id || self.b == id
    }

    /// Returns the endpoint opposite `id`, if `id` is an endpoint.
    #[must_use]
    pub fn other(&self, id: ParticleId) -> Option<ParticleId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Render-ready geometry of a connector: a capsule from one particle to the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorShape {
    /// First endpoint.
    pub a: ParticleId,
    /// Second endpoint.
    pub b: ParticleId,
    /// Point halfway between the two particle centers.
    pub midpoint: Point3,
    /// Unit direction from `a` to `b` (+Z when the centers coincide).
    pub direction: Vector3,
    /// Distance between the two particle centers.
    pub length: f64,
    /// Radius of the bridge.
    pub thickness: f64,
}

impl ConnectorShape {
    /// Derives the bridge between two particles.
    ///
    /// `thickness_factor` scales the smaller of the two radii.
    #[must_use]
    pub fn between(
        connector: Connector,
        a: &Particle,
        b: &Particle,
        thickness_factor: f64,
    ) -> Self {
        let delta = b.position() - a.position();
        Self {
            a: connector.a,
            b: connector.b,
            midpoint: a.position() + delta * 0.5,
            direction: safe_normalize(&delta).unwrap_or_else(Vector3::z),
            length: delta.norm(),
            thickness: a.radius().min(b.radius()) * thickness_factor,
        }
    }
}
