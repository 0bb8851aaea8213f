use crate::blob::ClayBlob;
use crate::brush::{sanitize, MIN_RADIUS};
use crate::math::{centroid, Point3};

/// Pulls every particle strictly within `radius` of a point toward their
/// shared centroid.
pub struct SmoothNear {
    point: Point3,
    radius: f64,
    blend: f64,
}

impl SmoothNear {
    /// Creates a new `SmoothNear` operation.
    ///
    /// `blend` is the fraction of the way each particle travels toward the
    /// centroid and is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(point: Point3, radius: f64, blend: f64) -> Self {
        let blend = if blend.is_nan() { 0.0 } else { blend.clamp(0.0, 1.0) };
        Self {
            point,
            radius: sanitize(radius, MIN_RADIUS),
            blend,
        }
    }

    /// Executes the smoothing, returning how many particles moved.
    ///
    /// With fewer than two particles in range there is nothing to average
    /// and the blob is left untouched. Moved particles adopt their new
    /// position as their rest position.
    pub fn execute(&self, blob: &mut ClayBlob) -> usize {
        let nearby: Vec<_> = blob
            .snapshot()
            .into_iter()
            .filter(|(_, position)| (position - self.point).norm() < self.radius)
            .collect();
        if nearby.len() < 2 {
            return 0;
        }
        let positions: Vec<Point3> = nearby.iter().map(|&(_, position)| position).collect();
        let Some(center) = centroid(&positions) else {
            return 0;
        };

        for (id, position) in &nearby {
            if let Some(particle) = blob.particle_mut(*id) {
                particle.relocate(position + (center - position) * self.blend);
            }
        }
        nearby.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::blob::BlobParams;
    use crate::operations::blob::AddParticle;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn positions(blob: &ClayBlob) -> Vec<Point3> {
        blob.iter().map(|(_, particle)| *particle.position()).collect()
    }

    #[test]
    fn single_particle_in_range_is_noop() {
        let mut blob = ClayBlob::new(BlobParams::default()).unwrap();
        AddParticle::new(p(0.0, 0.0, 0.0), 5.0).execute(&mut blob);
        AddParticle::new(p(50.0, 0.0, 0.0), 5.0).execute(&mut blob);
        let before = positions(&blob);

        assert_eq!(SmoothNear::new(p(1.0, 0.0, 0.0), 10.0, 0.5).execute(&mut blob), 0);
        assert_eq!(SmoothNear::new(p(-500.0, 0.0, 0.0), 10.0, 0.5).execute(&mut blob), 0);
        assert_eq!(positions(&blob), before);
    }

    #[test]
    fn moves_fraction_toward_centroid() {
        let mut blob = ClayBlob::new(BlobParams::default()).unwrap();
        let a = AddParticle::new(p(-4.0, 0.0, 0.0), 5.0).execute(&mut blob).unwrap();
        let b = AddParticle::new(p(4.0, 0.0, 0.0), 5.0).execute(&mut blob).unwrap();
        let far = AddParticle::new(p(40.0, 0.0, 0.0), 5.0).execute(&mut blob).unwrap();

        let moved = SmoothNear::new(Point3::origin(), 10.0, 0.25).execute(&mut blob);

        assert_eq!(moved, 2);
        assert_relative_eq!(*blob.particle(a).unwrap().position(), p(-3.0, 0.0, 0.0));
        assert_relative_eq!(*blob.particle(b).unwrap().position(), p(3.0, 0.0, 0.0));
        assert_relative_eq!(*blob.particle(a).unwrap().origin(), p(-3.0, 0.0, 0.0));
        assert_relative_eq!(*blob.particle(far).unwrap().position(), p(40.0, 0.0, 0.0));
    }

    #[test]
    fn blend_is_clamped() {
        let mut blob = ClayBlob::new(BlobParams::default()).unwrap();
        let a = AddParticle::new(p(-2.0, 0.0, 0.0), 5.0).execute(&mut blob).unwrap();
        AddParticle::new(p(2.0, 0.0, 0.0), 5.0).execute(&mut blob).unwrap();

        SmoothNear::new(Point3::origin(), 10.0, 7.0).execute(&mut blob);
        assert_relative_eq!(*blob.particle(a).unwrap().position(), Point3::origin());
    }
}
