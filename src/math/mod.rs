pub mod falloff;

pub use falloff::{falloff, Falloff};

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Normalizes `v`, or returns `None` when it is too short to carry a direction.
#[must_use]
pub fn safe_normalize(v: &Vector3) -> Option<Vector3> {
    let len = v.norm();
    if len < TOLERANCE || !len.is_finite() {
        return None;
    }
    Some(v / len)
}

/// Builds two unit vectors that, together with `normal`, form a right-handed
/// orthonormal frame.
///
/// `normal` must be unit length. The helper axis is the world axis least
/// aligned with `normal`, so the cross product never degenerates.
#[must_use]
pub fn orthonormal_basis(normal: &Vector3) -> (Vector3, Vector3) {
    let helper = if normal.x.abs() <= normal.y.abs() && normal.x.abs() <= normal.z.abs() {
        Vector3::x()
    } else if normal.y.abs() <= normal.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = normal.cross(&helper).normalize();
    let v = normal.cross(&u);
    (u, v)
}

/// Returns the arithmetic mean of `points`, or `None` for an empty slice.
#[must_use]
pub fn centroid(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    Some(Point3::from(sum / n))
}
