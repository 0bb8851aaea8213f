mod make_sphere;
mod normals;

pub use make_sphere::MakeSculptSphere;

use crate::error::{MeshError, Result};
use crate::math::{Point3, Vector3};

/// A fixed-topology triangle mesh whose vertices are displaced in place.
///
/// Alongside the live positions the mesh keeps an immutable baseline copy
/// captured at construction, and a rest copy holding the last sculpted
/// shape. Idle motion wanders around the rest shape without changing it.
/// Vertices, baseline, rest and normals are index-aligned and never
/// reordered or resized; only positions, rest positions and normals change.
#[derive(Debug, Clone)]
pub struct SculptMesh {
    center: Point3,
    vertices: Vec<Point3>,
    baseline: Vec<Point3>,
    rest: Vec<Point3>,
    normals: Vec<Vector3>,
    indices: Vec<[u32; 3]>,
    neighbors: Vec<Vec<u32>>,
    normal_revision: u64,
}

impl SculptMesh {
    /// Builds a mesh from raw positions and triangles.
    ///
    /// `center` is the reference point for radial tools (push, pull, inflate).
    /// The given positions become the baseline.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no vertices, a position is not finite,
    /// or a triangle references a vertex that does not exist.
    pub fn from_parts(
        center: Point3,
        vertices: Vec<Point3>,
        indices: Vec<[u32; 3]>,
    ) -> Result<Self> {
        if vertices.is_empty() {
            return Err(MeshError::Empty.into());
        }
        if !center.coords.iter().all(|c| c.is_finite()) {
            return Err(MeshError::Degenerate("center must be finite".into()).into());
        }
        if vertices
            .iter()
            .any(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(MeshError::Degenerate("vertex positions must be finite".into()).into());
        }
        let len = vertices.len();
        if let Some(&index) = indices.iter().flatten().find(|&&i| i as usize >= len) {
            return Err(MeshError::IndexOutOfRange { index, len }.into());
        }

        let neighbors = normals::vertex_neighbors(len, &indices);
        let mut mesh = Self {
            center,
            baseline: vertices.clone(),
            rest: vertices.clone(),
            normals: vec![Vector3::zeros(); len],
            vertices,
            indices,
            neighbors,
            normal_revision: 0,
        };
        mesh.recompute_normals();
        Ok(mesh)
    }

    /// Returns the reference center for radial tools.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the live vertex positions.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Returns the positions captured at construction.
    #[must_use]
    pub fn baseline(&self) -> &[Point3] {
        &self.baseline
    }

    /// Returns the sculpted rest positions, which equal the baseline until a
    /// sculpt tool moves a vertex.
    #[must_use]
    pub fn rest(&self) -> &[Point3] {
        &self.rest
    }

    /// Returns the per-vertex normals matching the live positions.
    #[must_use]
    pub fn normals(&self) -> &[Vector3] {
        &self.normals
    }

    /// Returns the triangle list.
    #[must_use]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// Returns the one-ring neighbors of vertex `index`.
    #[must_use]
    pub fn neighbors(&self, index: usize) -> &[u32] {
        self.neighbors
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of times normals have been recomputed since construction.
    ///
    /// Renderers can compare this against a cached value to decide whether to
    /// re-upload normal data.
    #[must_use]
    pub fn normal_revision(&self) -> u64 {
        self.normal_revision
    }

    /// Restores every vertex to its baseline position and recomputes normals.
    ///
    /// The live and rest buffers are overwritten in place; nothing is
    /// reallocated.
    pub fn reset(&mut self) {
        self.vertices.copy_from_slice(&self.baseline);
        self.rest.copy_from_slice(&self.baseline);
        self.recompute_normals();
        tracing::debug!(vertices = self.vertices.len(), "sculpt mesh reset to baseline");
    }

    /// Recomputes area-weighted vertex normals from the live positions.
    pub fn recompute_normals(&mut self) {
        normals::area_weighted_normals(
            &self.vertices,
            &self.indices,
            &self.center,
            &mut self.normals,
        );
        self.normal_revision += 1;
    }

    /// Moves a vertex and makes the new position its rest position.
    pub(crate) fn sculpt_vertex(&mut self, index: usize, position: Point3) {
        if let (Some(vertex), Some(rest)) =
            (self.vertices.get_mut(index), self.rest.get_mut(index))
        {
            *vertex = position;
            *rest = position;
        }
    }

    /// Mutable access to live positions. Rest positions are not affected.
    pub(crate) fn vertices_mut(&mut self) -> &mut [Point3] {
        &mut self.vertices
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

    fn tetrahedron() -> SculptMesh {
        SculptMesh::from_parts(
            p(0.0, 0.0, 0.0),
            vec![
                p(1.0, 1.0, 1.0),
                p(-1.0, -1.0, 1.0),
                p(-1.0, 1.0, -1.0),
                p(1.0, -1.0, -1.0),
            ],
            vec![[0, 1, 3], [0, 2, 1], [0, 3, 2], [1, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty() {
        let err = SculptMesh::from_parts(Point3::origin(), vec![], vec![]).unwrap_err();
        assert!(matches!(err, ClayError::Mesh(MeshError::Empty)));
    }

    #[test]
    fn rejects_dangling_index() {
        let err = SculptMesh::from_parts(
            Point3::origin(),
            vec![p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.0, 1.0)],
            vec![[0, 1, 3]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ClayError::Mesh(MeshError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn rejects_non_finite_vertex() {
        let err = SculptMesh::from_parts(
            Point3::origin(),
            vec![p(f64::NAN, 0.0, 0.0)],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, ClayError::Mesh(MeshError::Degenerate(_))));
    }

    #[test]
    fn buffers_are_aligned() {
        let mesh = tetrahedron();
        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.baseline().len(), 4);
        assert_eq!(mesh.normals().len(), 4);
        assert_eq!(mesh.rest().len(), 4);
        assert_eq!(mesh.vertices(), mesh.baseline());
        assert_eq!(mesh.rest(), mesh.baseline());
    }

    #[test]
    fn tetrahedron_neighbors() {
        let mesh = tetrahedron();
        for i in 0..4 {
            assert_eq!(mesh.neighbors(i).len(), 3, "vertex {i}");
            assert!(!mesh.neighbors(i).contains(&u32::try_from(i).unwrap()));
        }
        assert!(mesh.neighbors(99).is_empty());
    }

    #[test]
    fn normals_point_outward() {
        let mesh = tetrahedron();
        for (v, n) in mesh.vertices().iter().zip(mesh.normals()) {
            assert!((n.norm() - 1.0).abs() < 1e-9);
            assert!(n.dot(&v.coords) > 0.0, "normal {n:?} at {v:?} points inward");
        }
    }

    #[test]
    fn reset_restores_baseline_in_place() {
        let mut mesh = tetrahedron();
        let before_ptr = mesh.vertices().as_ptr();
        mesh.sculpt_vertex(2, p(5.0, 5.0, 5.0));
        mesh.vertices_mut()[1] = p(-2.0, -2.0, 2.0);
        mesh.recompute_normals();
        let revision = mesh.normal_revision();

        mesh.reset();

        assert_eq!(mesh.vertices(), mesh.baseline());
        assert_eq!(mesh.rest(), mesh.baseline());
        assert_eq!(mesh.vertices().as_ptr(), before_ptr);
        assert_eq!(mesh.normal_revision(), revision + 1);
    }

    #[test]
    fn sculpt_vertex_moves_rest_but_not_baseline() {
        let mut mesh = tetrahedron();
        mesh.sculpt_vertex(0, p(2.0, 2.0, 2.0));
        mesh.sculpt_vertex(99, p(9.0, 9.0, 9.0));

        assert_eq!(mesh.vertices()[0], p(2.0, 2.0, 2.0));
        assert_eq!(mesh.rest()[0], p(2.0, 2.0, 2.0));
        assert_eq!(mesh.baseline()[0], p(1.0, 1.0, 1.0));
        assert_eq!(mesh.vertex_count(), 4);
    }
}
