use crate::math::{safe_normalize, Point3, Vector3};

/// Builds sorted, deduplicated one-ring adjacency lists from a triangle list.
pub(super) fn vertex_neighbors(vertex_count: usize, indices: &[[u32; 3]]) -> Vec<Vec<u32>> {
    let mut neighbors = vec![Vec::new(); vertex_count];
    for tri in indices {
        for k in 0..3 {
            let a = tri[k];
            let b = tri[(k + 1) % 3];
            if a == b {
                continue;
            }
            neighbors[a as usize].push(b);
            neighbors[b as usize].push(a);
        }
    }
    for list in &mut neighbors {
        list.sort_unstable();
        list.dedup();
    }
    neighbors
}

/// Writes area-weighted vertex normals into `out`.
///
/// Each triangle contributes its unnormalized cross product to its three
/// corners, so larger faces weigh more. A vertex with no usable faces falls
/// back to its radial direction from `center`, then to +Z.
pub(super) fn area_weighted_normals(
    vertices: &[Point3],
    indices: &[[u32; 3]],
    center: &Point3,
    out: &mut [Vector3],
) {
    out.fill(Vector3::zeros());

    for tri in indices {
        let [i0, i1, i2] = tri.map(|i| i as usize);
        let face = (vertices[i1] - vertices[i0]).cross(&(vertices[i2] - vertices[i0]));
        out[i0] += face;
        out[i1] += face;
        out[i2] += face;
    }

    for (n, v) in out.iter_mut().zip(vertices) {
        *n = safe_normalize(n)
            .or_else(|| safe_normalize(&(v - center)))
            .unwrap_or_else(Vector3::z);
    }
}
