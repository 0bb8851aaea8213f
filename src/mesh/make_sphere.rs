use std::f64::consts::{PI, TAU};

use crate::error::{MeshError, Result};
use crate::math::{Point3, TOLERANCE};

use super::SculptMesh;

/// Creates a sculptable UV sphere with shared pole and seam vertices.
///
/// The sphere is laid out as a single north pole, `rings - 1` latitude rings
/// of `segments` vertices each, and a single south pole, for a total of
/// `2 + (rings - 1) * segments` vertices. No position is duplicated, so
/// sculpting never tears the surface open along the seam or at the poles.
pub struct MakeSculptSphere {
    center: Point3,
    radius: f64,
    segments: usize,
    rings: usize,
}

impl MakeSculptSphere {
    /// Default number of longitudinal segments.
    pub const DEFAULT_SEGMENTS: usize = 64;

    /// Default number of latitudinal bands.
    pub const DEFAULT_RINGS: usize = 48;

    /// Creates a new `MakeSculptSphere` operation with default resolution.
    #[must_use]
    pub fn new(center: Point3, radius: f64) -> Self {
        Self {
            center,
            radius,
            segments: Self::DEFAULT_SEGMENTS,
            rings: Self::DEFAULT_RINGS,
        }
    }

    /// Sets the tessellation resolution.
    #[must_use]
    pub fn with_resolution(mut self, segments: usize, rings: usize) -> Self {
        self.segments = segments;
        self.rings = rings;
        self
    }

    /// Executes the operation, producing a mesh whose baseline is the sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive, there are fewer than
    /// 3 segments or 2 rings, or the vertex count does not fit a `u32` index.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<SculptMesh> {
        if !self.radius.is_finite() || self.radius < TOLERANCE {
            return Err(MeshError::Degenerate("sphere radius must be positive".into()).into());
        }
        if self.segments < 3 || self.rings < 2 {
            return Err(MeshError::Degenerate(
                "sphere needs at least 3 segments and 2 rings".into(),
            )
            .into());
        }
        let count = 2 + (self.rings - 1) * self.segments;
        if u32::try_from(count).is_err() {
            return Err(MeshError::Degenerate("sphere resolution too large".into()).into());
        }

        let r = self.radius;
        let o = self.center;
        let segments = self.segments;

        let mut vertices = Vec::with_capacity(count);
        vertices.push(Point3::new(o.x, o.y, o.z + r));
        for ring in 1..self.rings {
            #[allow(clippy::cast_precision_loss)]
            let polar = PI * ring as f64 / self.rings as f64;
            let (sp, cp) = polar.sin_cos();
            for seg in 0..segments {
                #[allow(clippy::cast_precision_loss)]
                let azimuth = TAU * seg as f64 / segments as f64;
                let (sa, ca) = azimuth.sin_cos();
                vertices.push(Point3::new(
                    o.x + r * sp * ca,
                    o.y + r * sp * sa,
                    o.z + r * cp,
                ));
            }
        }
        vertices.push(Point3::new(o.x, o.y, o.z - r));

        let north = 0u32;
        let south = (count - 1) as u32;
        let ring_start = |ring: usize| 1 + (ring - 1) * segments;

        let mut indices = Vec::with_capacity(2 * segments * (self.rings - 1));

        // Cap fans around the poles, wound counter-clockwise seen from outside.
        let first = ring_start(1);
        let last = ring_start(self.rings - 1);
        for seg in 0..segments {
            let next = (seg + 1) % segments;
            indices.push([north, (first + seg) as u32, (first + next) as u32]);
            indices.push([(last + seg) as u32, south, (last + next) as u32]);
        }

        // Quads between consecutive rings, split into two triangles.
        for ring in 1..self.rings - 1 {
            let upper = ring_start(ring);
            let lower = ring_start(ring + 1);
            for seg in 0..segments {
                let next = (seg + 1) % segments;
                let a = (upper + seg) as u32;
                let b = (upper + next) as u32;
                let c = (lower + next) as u32;
                let d = (lower + seg) as u32;
                indices.push([a, d, c]);
                indices.push([a, c, b]);
            }
        }

        SculptMesh::from_parts(self.center, vertices, indices)
    }
}
