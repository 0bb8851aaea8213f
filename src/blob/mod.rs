mod connector;
mod particle;

pub use connector::{Connector, ConnectorId, ConnectorShape};
pub use particle::{Particle, ParticleId};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotmap::SlotMap;

use crate::error::{BlobError, Result};
use crate::math::{centroid, Point3};

/// A bounded, non-empty range of particle radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRange {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
}

impl SizeRange {
    /// Creates a range of radii `[min, max)`.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draws a radius uniformly from the range.
    ///
    /// An empty or unbounded range yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max > self.min && (self.max - self.min).is_finite() {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.max >= self.min
    }
}

/// Tuning constants for a [`ClayBlob`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobParams {
    /// Hard ceiling on the number of particles.
    pub max_particles: usize,
    /// Every particle radius is clamped into this range.
    pub particle_size: SizeRange,
    /// Radii drawn for particles deposited by the add tool.
    pub add_size: SizeRange,
    /// Whether new particles are bridged to their neighbors.
    pub blending: bool,
    /// Maximum bridges a particle gets when it is linked.
    pub max_connections: usize,
    /// Blend radius as a multiple of the new particle's own radius.
    pub blend_radius_factor: f64,
    /// Bridge thickness as a fraction of the smaller endpoint radius.
    pub connector_thickness: f64,
    /// Seed for the blob's random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            max_particles: 500,
            particle_size: SizeRange::new(1.0, 40.0),
            add_size: SizeRange::new(5.0, 10.0),
            blending: true,
            max_connections: 3,
            blend_radius_factor: 3.0,
            connector_thickness: 0.6,
            seed: None,
        }
    }
}

impl BlobParams {
    /// Sets the particle capacity.
    #[must_use]
    pub fn with_max_particles(mut self, max_particles: usize) -> Self {
        self.max_particles = max_particles;
        self
    }

    /// Enables or disables bridging between neighbors.
    #[must_use]
    pub fn with_blending(mut self, blending: bool) -> Self {
        self.blending = blending;
        self
    }

    /// Sets a fixed seed for reproducible layouts.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> std::result::Result<(), BlobError> {
        let invalid = |name: &'static str, value: f64| BlobError::InvalidParameter { name, value };
        if self.max_particles == 0 {
            return Err(invalid("max_particles", 0.0));
        }
        if !self.particle_size.is_valid() {
            return Err(invalid("particle_size.min", self.particle_size.min));
        }
        if !self.add_size.is_valid() {
            return Err(invalid("add_size.min", self.add_size.min));
        }
        if !self.blend_radius_factor.is_finite() || self.blend_radius_factor < 0.0 {
            return Err(invalid("blend_radius_factor", self.blend_radius_factor));
        }
        if !self.connector_thickness.is_finite() || self.connector_thickness <= 0.0 {
            return Err(invalid("connector_thickness", self.connector_thickness));
        }
        Ok(())
    }
}

/// A dynamic set of clay particles and the bridges between them.
///
/// Particles live in a generational arena, so a [`ParticleId`] either
/// resolves to the particle it was issued for or to nothing. A separate
/// ordered list provides the positional view: index `i` is the `i`-th live
/// particle in insertion order, and indices shift down after a removal.
#[derive(Debug)]
pub struct ClayBlob {
    particles: SlotMap<ParticleId, Particle>,
    order: Vec<ParticleId>,
    connectors: SlotMap<ConnectorId, Connector>,
    params: BlobParams,
    rng: StdRng,
}

impl ClayBlob {
    /// Creates an empty blob.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` fails [`BlobParams::validate`].
    pub fn new(params: BlobParams) -> Result<Self> {
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            particles: SlotMap::with_capacity_and_key(params.max_particles),
            order: Vec::with_capacity(params.max_particles),
            connectors: SlotMap::with_key(),
            params,
            rng,
        })
    }

    /// Returns the blob's parameters.
    #[must_use]
    pub fn params(&self) -> &BlobParams {
        &self.params
    }

    /// Returns the number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the blob has no particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the particle capacity.
    #[must_use]
    pub fn max_particles(&self) -> usize {
        self.params.max_particles
    }

    /// Returns `true` once the capacity is reached.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= self.params.max_particles
    }

    /// Returns the particle for `id`, or an error if it no longer exists.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::ParticleNotFound`] for a stale or foreign handle.
    pub fn particle(&self, id: ParticleId) -> Result<&Particle> {
        self.particles
            .get(id)
            .ok_or_else(|| BlobError::ParticleNotFound.into())
    }

    /// Returns the particle for `id`, if it exists.
    #[must_use]
    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    /// Returns `true` if `id` resolves to a live particle.
    #[must_use]
    pub fn contains(&self, id: ParticleId) -> bool {
        self.particles.contains_key(id)
    }

    /// Returns the handle at positional `index`.
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<ParticleId> {
        self.order.get(index).copied()
    }

    /// Returns the current positional index of `id`.
    #[must_use]
    pub fn index_of(&self, id: ParticleId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    /// Iterates live particles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticleId, &Particle)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.particles.get(id).map(|p| (id, p)))
    }

    /// Copies out every `(id, position)` pair in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(ParticleId, Point3)> {
        self.iter().map(|(id, p)| (id, *p.position())).collect()
    }

    /// Returns the centroid of all particle positions.
    #[must_use]
    pub fn centroid(&self) -> Option<Point3> {
        let positions: Vec<Point3> = self.iter().map(|(_, p)| *p.position()).collect();
        centroid(&positions)
    }

    /// Returns the number of connectors.
    #[must_use]
    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Iterates the stored connectors.
    pub fn connectors(&self) -> impl Iterator<Item = (ConnectorId, &Connector)> + '_ {
        self.connectors.iter()
    }

    /// Derives the current geometry of every connector.
    #[must_use]
    pub fn connector_shapes(&self) -> Vec<ConnectorShape> {
        self.connectors
            .values()
            .filter_map(|&c| {
                let a = self.particles.get(c.a)?;
                let b = self.particles.get(c.b)?;
                Some(ConnectorShape::between(
                    c,
                    a,
                    b,
                    self.params.connector_thickness,
                ))
            })
            .collect()
    }

    /// Returns up to `limit` particles strictly within `radius` of `point`,
    /// nearest first, skipping `exclude`.
    #[must_use]
    pub fn nearest(
        &self,
        point: &Point3,
        radius: f64,
        limit: usize,
        exclude: Option<ParticleId>,
    ) -> Vec<ParticleId> {
        let mut hits: Vec<(f64, ParticleId)> = self
            .iter()
            .filter(|&(id, _)| Some(id) != exclude)
            .filter_map(|(id, p)| {
                let d = (p.position() - point).norm();
                (d < radius).then_some((d, id))
            })
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().take(limit).map(|(_, id)| id).collect()
    }

    /// Clamps a requested radius into the configured particle size range.
    #[must_use]
    pub fn clamp_radius(&self, radius: f64) -> f64 {
        let range = self.params.particle_size;
        if radius.is_finite() {
            radius.clamp(range.min, range.max)
        } else {
            range.min
        }
    }

    /// Inserts a particle if there is capacity. The radius must already be clamped.
    pub(crate) fn insert(&mut self, position: Point3, radius: f64) -> Option<ParticleId> {
        if self.is_full() {
            return None;
        }
        let id = self.particles.insert(Particle::new(position, radius));
        self.order.push(id);
        Some(id)
    }

    /// Removes a particle and every connector touching it.
    ///
    /// Returns the other endpoints of the dropped connectors that are still
    /// alive, so the caller can re-link them.
    pub(crate) fn remove(&mut self, id: ParticleId) -> Option<Vec<ParticleId>> {
        let particle = self.particles.remove(id)?;
        if let Some(index) = self.index_of(id) {
            self.order.remove(index);
        }

        let mut survivors = Vec::new();
        for cid in particle.connectors {
            let Some(connector) = self.connectors.remove(cid) else {
                continue;
            };
            let Some(other) = connector.other(id) else {
                continue;
            };
            if let Some(p) = self.particles.get_mut(other) {
                p.connectors.retain(|&c| c != cid);
                survivors.push(other);
            }
        }
        Some(survivors)
    }

    /// Bridges two live, distinct, not-yet-linked particles.
    pub(crate) fn link(&mut self, a: ParticleId, b: ParticleId) -> Option<ConnectorId> {
        if a == b || !self.contains(a) || !self.contains(b) || self.linked(a, b) {
            return None;
        }
        let cid = self.connectors.insert(Connector { a, b });
        for id in [a, b] {
            if let Some(p) = self.particles.get_mut(id) {
                p.connectors.push(cid);
            }
        }
        Some(cid)
    }

    /// Returns `true` if a connector already joins `a` and `b`.
    ///
    /// Every connector listed on `a` touches `a`, so only the far end is checked.
    #[must_use]
    pub fn linked(&self, a: ParticleId, b: ParticleId) -> bool {
        a != b
            && self.particles.get(a).is_some_and(|p| {
                p.connectors
                    .iter()
                    .any(|&cid| self.connectors.get(cid).is_some_and(|c| c.touches(b)))
            })
    }

    /// Drops every particle and connector. Capacity is kept.
    pub(crate) fn clear(&mut self) {
        self.particles.clear();
        self.order.clear();
        self.connectors.clear();
    }

    pub(crate) fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.get_mut(id)
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ClayError;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn blob() -> ClayBlob {
        ClayBlob::new(BlobParams::default().with_seed(7)).unwrap()
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = ClayBlob::new(BlobParams::default().with_max_particles(0)).unwrap_err();
        assert!(matches!(
            err,
            ClayError::Blob(BlobError::InvalidParameter {
                name: "max_particles",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_size_range() {
        let params = BlobParams {
            particle_size: SizeRange::new(0.0, 10.0),
            ..BlobParams::default()
        };
        assert!(params.validate().is_err());
        let params = BlobParams {
            add_size: SizeRange::new(8.0, 2.0),
            ..BlobParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn stale_handle_does_not_resolve() {
        let mut blob = blob();
        let a = blob.insert(p(0.0, 0.0, 0.0), 5.0).unwrap();
        blob.remove(a).unwrap();
        let b = blob.insert(p(1.0, 0.0, 0.0), 5.0).unwrap();

        assert!(!blob.contains(a));
        assert!(matches!(
            blob.particle(a).unwrap_err(),
            ClayError::Blob(BlobError::ParticleNotFound)
        ));
        assert!(blob.particle(b).is_ok());
    }

    #[test]
    fn positional_view_compacts() {
        let mut blob = blob();
        let ids: Vec<_> = (0..4)
            .map(|i| blob.insert(p(f64::from(i), 0.0, 0.0), 5.0).unwrap())
            .collect();
        blob.remove(ids[1]).unwrap();
        assert_eq!(blob.len(), 3);
        assert_eq!(blob.id_at(1), Some(ids[2]));
        assert_eq!(blob.index_of(ids[3]), Some(2));
        assert_eq!(blob.id_at(3), None);
    }

    #[test]
    fn link_is_symmetric_and_unique() {
        let mut blob = blob();
        let a = blob.insert(p(0.0, 0.0, 0.0), 5.0).unwrap();
        let b = blob.insert(p(4.0, 0.0, 0.0), 5.0).unwrap();
        assert!(blob.link(a, b).is_some());
        assert!(blob.link(b, a).is_none());
        assert!(blob.link(a, a).is_none());
        assert!(blob.linked(b, a));
        assert_eq!(blob.connector_count(), 1);
        assert_eq!(blob.particle(a).unwrap().connectors().len(), 1);
    }

    #[test]
    fn linked_checks_the_far_endpoint() {
        let mut blob = blob();
        let a = blob.insert(p(0.0, 0.0, 0.0), 5.0).unwrap();
        let b = blob.insert(p(4.0, 0.0, 0.0), 5.0).unwrap();
        let c = blob.insert(p(0.0, 4.0, 0.0), 5.0).unwrap();
        blob.link(a, b);

        assert!(blob.linked(a, b));
        assert!(!blob.linked(a, a));
        assert!(!blob.linked(a, c));
        assert!(!blob.linked(c, a));
    }

    #[test]
    fn remove_drops_connectors_and_reports_survivors() {
        let mut blob = blob();
        let a = blob.insert(p(0.0, 0.0, 0.0), 5.0).unwrap();
        let b = blob.insert(p(4.0, 0.0, 0.0), 5.0).unwrap();
        let c = blob.insert(p(0.0, 4.0, 0.0), 5.0).unwrap();
        blob.link(a, b);
        blob.link(a, c);
        blob.link(b, c);

        let mut survivors = blob.remove(a).unwrap();
        survivors.sort();

        let mut expected = vec![b, c];
        expected.sort();
        assert_eq!(survivors, expected);
        assert_eq!(blob.connector_count(), 1);
        assert!(blob.linked(b, c));
        assert_eq!(blob.particle(b).unwrap().connectors().len(), 1);
        assert!(blob.remove(a).is_none());
    }

    #[test]
    fn connector_shapes_follow_particles() {
        let mut blob = blob();
        let a = blob.insert(p(0.0, 0.0, 0.0), 5.0).unwrap();
        let b = blob.insert(p(4.0, 0.0, 0.0), 5.0).unwrap();
        blob.link(a, b);

        blob.particle_mut(b).unwrap().relocate(p(10.0, 0.0, 0.0));

        let shapes = blob.connector_shapes();
        assert_eq!(shapes.len(), 1);
        assert!((shapes[0].length - 10.0).abs() < 1e-12);
        assert!((shapes[0].midpoint - p(5.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn nearest_is_sorted_and_bounded() {
        let mut blob = blob();
        let far = blob.insert(p(9.0, 0.0, 0.0), 5.0).unwrap();
        let near = blob.insert(p(1.0, 0.0, 0.0), 5.0).unwrap();
        let mid = blob.insert(p(5.0, 0.0, 0.0), 5.0).unwrap();
        blob.insert(p(50.0, 0.0, 0.0), 5.0).unwrap();

        let hits = blob.nearest(&Point3::origin(), 10.0, 3, None);
        assert_eq!(hits, vec![near, mid, far]);
        let hits = blob.nearest(&Point3::origin(), 10.0, 2, Some(near));
        assert_eq!(hits, vec![mid, far]);
    }

    #[test]
    fn insert_stops_at_capacity() {
        let mut blob = ClayBlob::new(BlobParams::default().with_max_particles(2)).unwrap();
        assert!(blob.insert(p(0.0, 0.0, 0.0), 5.0).is_some());
        assert!(blob.insert(p(1.0, 0.0, 0.0), 5.0).is_some());
        assert!(blob.is_full());
        assert!(blob.insert(p(2.0, 0.0, 0.0), 5.0).is_none());
        assert_eq!(blob.len(), 2);
    }

    #[test]
    fn clamp_radius_bounds() {
        let blob = blob();
        assert!((blob.clamp_radius(0.0) - 1.0).abs() < f64::EPSILON);
        assert!((blob.clamp_radius(1e9) - 40.0).abs() < f64::EPSILON);
        assert!((blob.clamp_radius(f64::NAN) - 1.0).abs() < f64::EPSILON);
        assert!((blob.clamp_radius(7.5) - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn size_range_sample_in_bounds() {
        let mut blob = blob();
        let range = SizeRange::new(5.0, 10.0);
        for _ in 0..100 {
            let r = range.sample(blob.rng_mut());
            assert!((5.0..10.0).contains(&r));
        }
        assert!((SizeRange::new(3.0, 3.0).sample(blob.rng_mut()) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unbounded_size_range_samples_min() {
        let mut blob = blob();
        let r = SizeRange::new(5.0, f64::INFINITY).sample(blob.rng_mut());
        assert!((r - 5.0).abs() < f64::EPSILON);
        let r = SizeRange::new(-f64::MAX, f64::MAX).sample(blob.rng_mut());
        assert!((r + f64::MAX).abs() < f64::EPSILON);
        assert!(SizeRange::new(f64::NAN, 4.0).sample(blob.rng_mut()).is_nan());
        assert!(!SizeRange::new(5.0, f64::INFINITY).is_valid());
    }
}
