use crate::math::Point3;

use super::connector::ConnectorId;

slotmap::new_key_type! {
    /// Stable handle to a particle in a [`ClayBlob`](super::ClayBlob).
    ///
    /// Handles are generational: once a particle is removed its handle stops
    /// resolving, even if the slot is later reused.
    pub struct ParticleId;
}

/// One sphere-like unit of clay.
#[derive(Debug, Clone)]
pub struct Particle {
    position: Point3,
    radius: f64,
    origin: Point3,
    pub(super) connectors: Vec<ConnectorId>,
}

impl Particle {
    pub(super) fn new(position: Point3, radius: f64) -> Self {
        Self {
            position,
            radius,
            origin: position,
            connectors: Vec::new(),
        }
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> &Point3 {
        &self.position
    }

    /// Radius of the particle's sphere.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Rest position that ambient motion drifts around.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Connectors touching this particle. These are back-references only;
    /// the blob owns the connectors.
    #[must_use]
    pub fn connectors(&self) -> &[ConnectorId] {
        &self.connectors
    }

    /// Moves the particle and makes the new position its rest position.
    pub(crate) fn relocate(&mut self, position: Point3) {
        self.position = position;
        self.origin = position;
    }

    /// Moves the particle without touching its rest position.
    pub(crate) fn nudge(&mut self, position: Point3) {
        self.position = position;
    }
}
