use crate::brush::{sanitize, BrushConfig, InputModality, SculptTool, MIN_RADIUS, MIN_STRENGTH};
use crate::math::{safe_normalize, Point3, Vector3};
use crate::mesh::SculptMesh;

use super::{SculptParams, SmoothTarget};

/// Applies one sculpt tool dab to a [`SculptMesh`].
///
/// Every vertex strictly inside the brush sphere is displaced according to
/// the tool, scaled by the falloff weight and the effective strength.
/// Displacements are computed from the positions as they were before the
/// dab and written back together, becoming the mesh's new rest shape;
/// normals are then recomputed exactly once. Vertices outside the brush are
/// never written.
pub struct ApplyTool {
    tool: SculptTool,
    point: Point3,
    radius: f64,
    strength: f64,
    modality: InputModality,
    params: SculptParams,
}

impl ApplyTool {
    /// Creates a new `ApplyTool` operation for pointer input and default params.
    ///
    /// Radius and strength are clamped to their minimum positive values.
    #[must_use]
    pub fn new(tool: SculptTool, point: Point3, radius: f64, strength: f64) -> Self {
        Self {
            tool,
            point,
            radius: sanitize(radius, MIN_RADIUS),
            strength: sanitize(strength, MIN_STRENGTH),
            modality: InputModality::Pointer,
            params: SculptParams::default(),
        }
    }

    /// Creates the operation from the radius and strength of `brush`.
    #[must_use]
    pub fn from_brush(tool: SculptTool, brush: &BrushConfig, point: Point3) -> Self {
        Self::new(tool, point, brush.radius(), brush.strength())
    }

    /// Sets the input modality.
    #[must_use]
    pub fn with_modality(mut self, modality: InputModality) -> Self {
        self.modality = modality;
        self
    }

    /// Sets custom tool tuning.
    #[must_use]
    pub fn with_params(mut self, params: SculptParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the dab, returning the number of vertices that moved.
    pub fn execute(&self, mesh: &mut SculptMesh) -> usize {
        let scale = self.strength
            * self.modality.multiplier(self.params.touch_multiplier)
            * self.params.gain(self.tool);
        let falloff = self.tool.falloff();
        let brush_dir = safe_normalize(&(self.point - mesh.center()));

        let mut updates = Vec::new();
        for (index, vertex) in mesh.vertices().iter().enumerate() {
            let distance = (vertex - self.point).norm();
            if distance.is_nan() || distance >= self.radius {
                continue;
            }
            let amount = falloff.weight(distance, self.radius) * scale;
            if amount <= 0.0 {
                continue;
            }
            if let Some(next) = self.displace(mesh, index, vertex, amount, brush_dir) {
                if next != *vertex && next.coords.iter().all(|c| c.is_finite()) {
                    updates.push((index, next));
                }
            }
        }

        let affected = updates.len();
        for (index, next) in updates {
            mesh.sculpt_vertex(index, next);
        }
        mesh.recompute_normals();

        tracing::trace!(tool = ?self.tool, affected, "applied sculpt tool");
        affected
    }

    /// Computes the new position of one vertex, or `None` to leave it alone.
    fn displace(
        &self,
        mesh: &SculptMesh,
        index: usize,
        vertex: &Point3,
        amount: f64,
        brush_dir: Option<Vector3>,
    ) -> Option<Point3> {
        let radial = || safe_normalize(&(vertex - mesh.center()));
        let blend = amount.min(1.0);

        match self.tool {
            SculptTool::Push => {
                let dir = brush_dir.or_else(radial)?;
                Some(vertex - dir * amount)
            }
            SculptTool::Pull => {
                let dir = brush_dir.or_else(radial)?;
                Some(vertex + dir * amount)
            }
            SculptTool::Smooth => {
                let target = match self.params.smooth_target {
                    SmoothTarget::Baseline => *mesh.baseline().get(index)?,
                    SmoothTarget::Neighborhood => neighborhood_average(mesh, index)?,
                };
                Some(vertex + (target - vertex) * blend)
            }
            SculptTool::Pinch => Some(vertex + (self.point - vertex) * blend),
            SculptTool::Inflate => {
                let dir = radial()?;
                Some(vertex + dir * amount)
            }
            SculptTool::Flatten => {
                let normal = brush_dir.or_else(radial)?;
                let height = (vertex - self.point).dot(&normal);
                Some(vertex - normal * (height * blend))
            }
        }
    }
}

/// Average of the one-ring neighbors' current positions.
fn neighborhood_average(mesh: &SculptMesh, index: usize) -> Option<Point3> {
    let neighbors = mesh.neighbors(index);
    if neighbors.is_empty() {
        return None;
    }
    let vertices = mesh.vertices();
    let sum = neighbors
        .iter()
        .fold(Vector3::zeros(), |acc, &n| acc + vertices[n as usize].coords);
    #[allow(clippy::cast_precision_loss)]
    let count = neighbors.len() as f64;
    Some(Point3::from(sum / count))
}
