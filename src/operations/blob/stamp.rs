use std::f64::consts::TAU;

use crate::blob::ClayBlob;
use crate::brush::{sanitize, MIN_RADIUS};
use crate::error::BlobError;
use crate::math::{orthonormal_basis, safe_normalize, Point3, Vector3};

use super::AddParticle;

/// Tuning constants for stamps and patterns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StampParams {
    /// Shell particles in a sphere stamp, not counting the core.
    pub sphere_count: usize,
    /// Lattice points per axis in a cube stamp.
    pub cube_resolution: usize,
    /// Particles laid by a spiral or ring pattern.
    pub pattern_count: usize,
    /// Turns of the spiral pattern.
    pub spiral_turns: f64,
    /// Particle radius as a fraction of the brush radius.
    pub size_factor: f64,
}

impl Default for StampParams {
    fn default() -> Self {
        Self {
            sphere_count: 12,
            cube_resolution: 3,
            pattern_count: 12,
            spiral_turns: 2.0,
            size_factor: 0.35,
        }
    }
}

impl StampParams {
    /// Checks that every parameter is usable.
    ///
    /// Counts may be zero, in which case the tool deposits nothing, and
    /// large counts are cut off by the blob's capacity.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> std::result::Result<(), BlobError> {
        let invalid = |name: &'static str, value: f64| BlobError::InvalidParameter { name, value };
        if !self.spiral_turns.is_finite() {
            return Err(invalid("spiral_turns", self.spiral_turns));
        }
        if !self.size_factor.is_finite() || self.size_factor <= 0.0 {
            return Err(invalid("size_factor", self.size_factor));
        }
        Ok(())
    }
}

/// Solid shape deposited by a [`Stamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampShape {
    Sphere,
    Cube,
}

/// Deposits a small solid cluster of particles at once.
pub struct Stamp {
    shape: StampShape,
    center: Point3,
    radius: f64,
    params: StampParams,
}

impl Stamp {
    /// A ball: one core particle plus a shell spread over the brush sphere.
    #[must_use]
    pub fn sphere(center: Point3, radius: f64) -> Self {
        Self::new(StampShape::Sphere, center, radius)
    }

    /// A lattice filling the cube of half-extent `radius / 2`.
    #[must_use]
    pub fn cube(center: Point3, radius: f64) -> Self {
        Self::new(StampShape::Cube, center, radius)
    }

    fn new(shape: StampShape, center: Point3, radius: f64) -> Self {
        Self {
            shape,
            center,
            radius: sanitize(radius, MIN_RADIUS),
            params: StampParams::default(),
        }
    }

    /// Sets custom stamp parameters.
    #[must_use]
    pub fn with_params(mut self, params: StampParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the stamp, returning how many particles were added.
    ///
    /// Stops silently once the blob is full.
    pub fn execute(&self, blob: &mut ClayBlob) -> usize {
        let params = &self.params;
        let size = self.radius * params.size_factor;
        match self.shape {
            StampShape::Sphere => {
                let points = sphere_points(self.center, self.radius, params.sphere_count);
                deposit(blob, points, params.sphere_count.saturating_add(1), size)
            }
            StampShape::Cube => {
                let resolution = params.cube_resolution;
                let points = cube_points(self.center, self.radius * 0.5, resolution);
                deposit(blob, points, resolution.saturating_pow(3), size)
            }
        }
    }
}

/// Flat arrangement laid by a [`Pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternShape {
    Spiral,
    Ring,
}

/// Lays particles along a flat curve facing away from the blob.
///
/// The curve lies in the plane through the brush point whose normal is the
/// direction from the blob's centroid to that point, so patterns drawn on
/// the surface of the lump lie flat against it.
pub struct Pattern {
    shape: PatternShape,
    center: Point3,
    radius: f64,
    params: StampParams,
}

impl Pattern {
    /// An Archimedean spiral growing from the point out to `radius`.
    #[must_use]
    pub fn spiral(center: Point3, radius: f64) -> Self {
        Self::new(PatternShape::Spiral, center, radius)
    }

    /// A circle of `radius` around the point.
    #[must_use]
    pub fn ring(center: Point3, radius: f64) -> Self {
        Self::new(PatternShape::Ring, center, radius)
    }

    fn new(shape: PatternShape, center: Point3, radius: f64) -> Self {
        Self {
            shape,
            center,
            radius: sanitize(radius, MIN_RADIUS),
            params: StampParams::default(),
        }
    }

    /// Sets custom pattern parameters.
    #[must_use]
    pub fn with_params(mut self, params: StampParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the pattern, returning how many particles were added.
    ///
    /// Stops silently once the blob is full.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self, blob: &mut ClayBlob) -> usize {
        let normal = blob
            .centroid()
            .and_then(|c| safe_normalize(&(self.center - c)))
            .unwrap_or_else(Vector3::z);
        let (u, v) = orthonormal_basis(&normal);
        let count = self.params.pattern_count;

        let points = (0..count).map(|i| {
            let (angle, reach) = match self.shape {
                PatternShape::Spiral => {
                    let t = if count > 1 {
                        i as f64 / (count - 1) as f64
                    } else {
                        0.0
                    };
                    (TAU * self.params.spiral_turns * t, self.radius * t)
                }
                PatternShape::Ring => (TAU * i as f64 / count as f64, self.radius),
            };
            self.center + (u * angle.cos() + v * angle.sin()) * reach
        });

        deposit(blob, points, count, self.radius * self.params.size_factor)
    }
}

/// Adds one particle per point until the blob is full.
///
/// Points are generated lazily, so an oversized request costs no more than
/// the remaining capacity.
fn deposit(
    blob: &mut ClayBlob,
    points: impl Iterator<Item = Point3>,
    requested: usize,
    size: f64,
) -> usize {
    let mut added = 0;
    for point in points {
        if blob.is_full() {
            break;
        }
        if AddParticle::new(point, size).execute(blob).is_some() {
            added += 1;
        }
    }
    if added < requested {
        tracing::debug!(added, requested, "stamp truncated");
    }
    added
}

/// Core point plus `count` points spread over a sphere with the golden-angle spiral.
#[allow(clippy::cast_precision_loss)]
fn sphere_points(center: Point3, radius: f64, count: usize) -> impl Iterator<Item = Point3> {
    let golden_angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
    let shell = (0..count).map(move |i| {
        let z = 1.0 - 2.0 * (i as f64 + 0.5) / count as f64;
        let ring = (1.0 - z * z).max(0.0).sqrt();
        let azimuth = golden_angle * i as f64;
        center + Vector3::new(ring * azimuth.cos(), ring * azimuth.sin(), z) * radius
    });
    std::iter::once(center).chain(shell)
}

/// `resolution^3` lattice points filling the cube of `half_extent` around `center`.
#[allow(clippy::cast_precision_loss)]
fn cube_points(center: Point3, half_extent: f64, resolution: usize) -> impl Iterator<Item = Point3> {
    let coord = move |i: usize| {
        if resolution <= 1 {
            0.0
        } else {
            -half_extent + 2.0 * half_extent * i as f64 / (resolution - 1) as f64
        }
    };
    (0..resolution).flat_map(move |x| {
        (0..resolution).flat_map(move |y| {
            (0..resolution).map(move |z| center + Vector3::new(coord(x), coord(y), coord(z)))
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::blob::BlobParams;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn empty_blob() -> ClayBlob {
        ClayBlob::new(BlobParams::default().with_seed(5)).unwrap()
    }

    #[test]
    fn sphere_stamp_places_core_and_shell() {
        let mut blob = empty_blob();
        let center = p(10.0, 0.0, 0.0);
        let added = Stamp::sphere(center, 8.0).execute(&mut blob);

        assert_eq!(added, 13);
        let mut on_shell = 0;
        for (_, particle) in blob.iter() {
            let d = (particle.position() - center).norm();
            assert!(d < 1e-9 || (d - 8.0).abs() < 1e-9);
            if d > 1.0 {
                on_shell += 1;
            }
            assert_relative_eq!(particle.radius(), 8.0 * 0.35);
        }
        assert_eq!(on_shell, 12);
    }

    #[test]
    fn cube_stamp_fills_lattice() {
        let mut blob = empty_blob();
        let center = p(0.0, 5.0, 0.0);
        let added = Stamp::cube(center, 10.0).execute(&mut blob);

        assert_eq!(added, 27);
        for (_, particle) in blob.iter() {
            let offset = particle.position() - center;
            assert!(offset.amax() <= 5.0 + 1e-9);
        }
    }

    #[test]
    fn stamp_truncates_at_capacity() {
        let mut blob = ClayBlob::new(BlobParams::default().with_max_particles(5)).unwrap();
        let added = Stamp::cube(Point3::origin(), 10.0).execute(&mut blob);
        assert_eq!(added, 5);
        assert_eq!(blob.len(), 5);
        assert_eq!(Stamp::sphere(Point3::origin(), 10.0).execute(&mut blob), 0);
    }

    #[test]
    fn ring_lies_flat_facing_away_from_blob() {
        let mut blob = empty_blob();
        AddParticle::new(Point3::origin(), 5.0).execute(&mut blob);
        let center = p(0.0, 0.0, 20.0);

        let added = Pattern::ring(center, 6.0).execute(&mut blob);

        assert_eq!(added, 12);
        for (_, particle) in blob.iter().skip(1) {
            let offset = particle.position() - center;
            assert_relative_eq!(offset.norm(), 6.0, epsilon = 1e-9);
            assert!(offset.z.abs() < 1e-9, "ring point off plane: {offset:?}");
        }
    }

    #[test]
    fn spiral_grows_outward() {
        let mut blob = empty_blob();
        let center = p(3.0, 3.0, 3.0);
        let added = Pattern::spiral(center, 9.0).execute(&mut blob);
        assert_eq!(added, 12);

        let reaches: Vec<f64> = blob
            .iter()
            .map(|(_, particle)| (particle.position() - center).norm())
            .collect();
        assert!(reaches[0] < 1e-9);
        assert_relative_eq!(reaches[11], 9.0, epsilon = 1e-9);
        assert!(reaches.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn single_point_patterns() {
        let params = StampParams {
            pattern_count: 1,
            cube_resolution: 1,
            ..StampParams::default()
        };
        let mut blob = empty_blob();
        assert_eq!(
            Pattern::spiral(Point3::origin(), 4.0)
                .with_params(params)
                .execute(&mut blob),
            1
        );
        assert_eq!(
            Stamp::cube(p(30.0, 0.0, 0.0), 4.0)
                .with_params(params)
                .execute(&mut blob),
            1
        );
    }

    #[test]
    fn huge_counts_stop_at_capacity() {
        let params = StampParams {
            cube_resolution: usize::MAX,
            sphere_count: usize::MAX,
            pattern_count: usize::MAX,
            ..StampParams::default()
        };
        let mut blob = ClayBlob::new(BlobParams::default().with_max_particles(40)).unwrap();
        let cube = Stamp::cube(Point3::origin(), 10.0).with_params(params);
        assert_eq!(cube.execute(&mut blob), 40);

        let mut blob = ClayBlob::new(BlobParams::default().with_max_particles(40)).unwrap();
        let sphere = Stamp::sphere(Point3::origin(), 10.0).with_params(params);
        assert_eq!(sphere.execute(&mut blob), 40);

        let mut blob = ClayBlob::new(BlobParams::default().with_max_particles(40)).unwrap();
        let ring = Pattern::ring(Point3::origin(), 10.0).with_params(params);
        assert_eq!(ring.execute(&mut blob), 40);
    }

    #[test]
    fn validate_rejects_bad_factors() {
        assert!(StampParams::default().validate().is_ok());
        let flat = StampParams {
            size_factor: 0.0,
            ..StampParams::default()
        };
        assert!(matches!(
            flat.validate(),
            Err(BlobError::InvalidParameter {
                name: "size_factor",
                ..
            })
        ));
        let spin = StampParams {
            spiral_turns: f64::NAN,
            ..StampParams::default()
        };
        assert!(spin.validate().is_err());
    }
}
