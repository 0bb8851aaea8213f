//! The interaction context that owns both clay representations.
//!
//! A [`ClaySession`] holds the brush, the color hint, a [`SculptMesh`], a
//! [`ClayBlob`] and an [`AmbientAnimator`]. Each call to
//! [`interact`](ClaySession::interact) runs exactly one operator, chosen by
//! the active tool, against the representation that tool works on.

use crate::ambient::{AmbientAnimator, AmbientParams};
use crate::blob::{BlobParams, ClayBlob, ParticleId, SizeRange};
use crate::brush::{BlobTool, BrushConfig, ClayColor, InputModality, Tool};
use crate::error::{BlobError, Result};
use crate::math::Point3;
use crate::mesh::{MakeSculptSphere, SculptMesh};
use crate::operations::blob::{
    AddParticle, Pattern, RemoveNear, SeedLayout, SeedParams, SmoothNear, Stamp, StampParams,
};
use crate::operations::sculpt::{ApplyTool, SculptParams};

/// Interpolation of add-tool strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeParams {
    /// Segments between consecutive stroke points; `steps - 1` particles are
    /// inserted in between.
    pub steps: usize,
    /// Consecutive points closer than this are not interpolated.
    pub min_spacing: f64,
    /// Radii of interpolated particles.
    pub stroke_size: SizeRange,
}

impl Default for StrokeParams {
    fn default() -> Self {
        Self {
            steps: 3,
            min_spacing: 0.01,
            stroke_size: SizeRange::new(3.0, 7.0),
        }
    }
}

impl StrokeParams {
    /// Checks that the spacing and the stroke size range are usable.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> std::result::Result<(), BlobError> {
        let invalid = |name: &'static str, value: f64| BlobError::InvalidParameter { name, value };
        if self.min_spacing.is_nan() || self.min_spacing < 0.0 {
            return Err(invalid("min_spacing", self.min_spacing));
        }
        if !self.stroke_size.is_valid() {
            return Err(invalid("stroke_size.max", self.stroke_size.max));
        }
        Ok(())
    }
}

/// Everything needed to build a [`ClaySession`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionParams {
    /// Radius of the sculptable sphere, centered on the origin.
    pub mesh_radius: f64,
    /// Longitudinal segments of the sculptable sphere.
    pub mesh_segments: usize,
    /// Latitudinal bands of the sculptable sphere.
    pub mesh_rings: usize,
    /// Gains and touch multiplier of the sculpt tools.
    pub sculpt: SculptParams,
    /// Capacity, sizes and bridging of the particle blob.
    pub blob: BlobParams,
    /// Layout seeded on creation and on every reset.
    pub seed: SeedParams,
    /// Counts and sizes of the stamp and pattern tools.
    pub stamp: StampParams,
    /// Interpolation of add strokes.
    pub stroke: StrokeParams,
    /// Idle motion driven by [`ClaySession::tick`].
    pub ambient: AmbientParams,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            mesh_radius: 2.0,
            mesh_segments: MakeSculptSphere::DEFAULT_SEGMENTS,
            mesh_rings: MakeSculptSphere::DEFAULT_RINGS,
            sculpt: SculptParams::default(),
            blob: BlobParams::default(),
            seed: SeedParams::default(),
            stamp: StampParams::default(),
            stroke: StrokeParams::default(),
            ambient: AmbientParams::default(),
        }
    }
}

impl SessionParams {
    /// Seeds both the blob and the ambient animator for reproducible sessions.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.blob = self.blob.with_seed(seed);
        self.ambient = self.ambient.with_seed(seed.wrapping_add(1));
        self
    }

    /// Sets the resolution of the sculptable sphere.
    #[must_use]
    pub fn with_mesh_resolution(mut self, segments: usize, rings: usize) -> Self {
        self.mesh_segments = segments;
        self.mesh_rings = rings;
        self
    }
}

/// What a single interaction did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// A sculpt tool displaced this many vertices.
    Sculpted { moved: usize },
    /// The add tool ran. `particle` is `None` at capacity; `interpolated`
    /// counts the extra particles filled in along the stroke.
    Added {
        particle: Option<ParticleId>,
        interpolated: usize,
    },
    /// The remove tool scooped away this many particles.
    Removed { count: usize },
    /// The blob smoothing tool moved this many particles.
    Smoothed { moved: usize },
    /// A stamp or pattern tool deposited this many particles.
    Stamped { added: usize },
}

/// Engine-owned interaction context.
#[derive(Debug)]
pub struct ClaySession {
    brush: BrushConfig,
    color: ClayColor,
    params: SessionParams,
    mesh: SculptMesh,
    blob: ClayBlob,
    ambient: AmbientAnimator,
    last_point: Option<Point3>,
}

impl ClaySession {
    /// Builds the sphere and the seeded blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the sphere parameters are degenerate or the blob,
    /// seed, stamp or stroke parameters fail validation.
    pub fn new(params: SessionParams) -> Result<Self> {
        params.seed.validate()?;
        params.stamp.validate()?;
        params.stroke.validate()?;
        let mesh = MakeSculptSphere::new(Point3::origin(), params.mesh_radius)
            .with_resolution(params.mesh_segments, params.mesh_rings)
            .execute()?;
        let mut blob = ClayBlob::new(params.blob)?;
        SeedLayout::new().with_params(params.seed).execute(&mut blob);

        tracing::debug!(
            vertices = mesh.vertex_count(),
            particles = blob.len(),
            "clay session created"
        );
        Ok(Self {
            brush: BrushConfig::default(),
            color: ClayColor::default(),
            ambient: AmbientAnimator::new(params.ambient),
            params,
            mesh,
            blob,
            last_point: None,
        })
    }

    /// Runs the active tool at `point`.
    pub fn interact(&mut self, point: Point3, modality: InputModality) -> InteractionOutcome {
        let brush = self.brush;
        let outcome = match brush.tool() {
            Tool::Sculpt(tool) => {
                let moved = ApplyTool::from_brush(tool, &brush, point)
                    .with_modality(modality)
                    .with_params(self.params.sculpt)
                    .execute(&mut self.mesh);
                InteractionOutcome::Sculpted { moved }
            }
            Tool::Blob(tool) => self.interact_blob(tool, point, modality),
        };
        self.last_point = Some(point);
        outcome
    }

    fn interact_blob(
        &mut self,
        tool: BlobTool,
        point: Point3,
        modality: InputModality,
    ) -> InteractionOutcome {
        let radius = self.brush.radius();
        let stamp = self.params.stamp;
        match tool {
            BlobTool::Add => {
                let range = self.blob.params().add_size;
                let size = range.sample(self.blob.rng_mut());
                let particle = AddParticle::new(point, size).execute(&mut self.blob);
                let interpolated = self.interpolate_stroke(point);
                InteractionOutcome::Added {
                    particle,
                    interpolated,
                }
            }
            BlobTool::Remove => InteractionOutcome::Removed {
                count: RemoveNear::new(point, radius).execute(&mut self.blob),
            },
            BlobTool::SmoothBlob => {
                let blend = self.brush.strength()
                    * modality.multiplier(self.params.sculpt.touch_multiplier);
                InteractionOutcome::Smoothed {
                    moved: SmoothNear::new(point, radius, blend).execute(&mut self.blob),
                }
            }
            BlobTool::StampSphere => InteractionOutcome::Stamped {
                added: Stamp::sphere(point, radius)
                    .with_params(stamp)
                    .execute(&mut self.blob),
            },
            BlobTool::StampCube => InteractionOutcome::Stamped {
                added: Stamp::cube(point, radius)
                    .with_params(stamp)
                    .execute(&mut self.blob),
            },
            BlobTool::PatternSpiral => InteractionOutcome::Stamped {
                added: Pattern::spiral(point, radius)
                    .with_params(stamp)
                    .execute(&mut self.blob),
            },
            BlobTool::PatternRing => InteractionOutcome::Stamped {
                added: Pattern::ring(point, radius)
                    .with_params(stamp)
                    .execute(&mut self.blob),
            },
        }
    }

    /// Fills the gap between the previous stroke point and `point` with
    /// smaller particles.
    #[allow(clippy::cast_precision_loss)]
    fn interpolate_stroke(&mut self, point: Point3) -> usize {
        let stroke = self.params.stroke;
        let Some(last) = self.last_point else {
            return 0;
        };
        if (point - last).norm() <= stroke.min_spacing || stroke.steps < 2 {
            return 0;
        }
        let delta = (point - last) / stroke.steps as f64;
        let mut added = 0;
        for i in 1..stroke.steps {
            let size = stroke.stroke_size.sample(self.blob.rng_mut());
            let position = last + delta * i as f64;
            if AddParticle::new(position, size).execute(&mut self.blob).is_none() {
                break;
            }
            added += 1;
        }
        added
    }

    /// Forgets the previous stroke point so the next add starts a new stroke.
    pub fn end_stroke(&mut self) {
        self.last_point = None;
    }

    /// Returns the brush used by the next interaction.
    #[must_use]
    pub fn brush(&self) -> &BrushConfig {
        &self.brush
    }

    /// Replaces the brush. Takes effect on the next interaction.
    pub fn set_brush(&mut self, brush: BrushConfig) {
        if brush.tool() != self.brush.tool() {
            self.end_stroke();
        }
        self.brush = brush;
    }

    /// Switches the active tool, keeping radius and strength.
    pub fn set_tool(&mut self, tool: impl Into<Tool>) {
        self.set_brush(self.brush.with_tool(tool));
    }

    /// Switches the active tool by its UI name.
    ///
    /// # Errors
    ///
    /// Returns [`BrushError::UnknownTool`](crate::error::BrushError::UnknownTool)
    /// if the name matches no tool; the brush is left unchanged.
    pub fn set_tool_by_name(&mut self, name: &str) -> Result<()> {
        let tool: Tool = name.parse()?;
        self.set_tool(tool);
        Ok(())
    }

    /// Returns the color hint.
    #[must_use]
    pub fn color(&self) -> ClayColor {
        self.color
    }

    /// Sets the color hint. Has no effect on geometry.
    pub fn set_color(&mut self, color: ClayColor) {
        self.color = color;
    }

    /// Returns the session's parameters.
    #[must_use]
    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    /// Returns the sculptable mesh.
    #[must_use]
    pub fn mesh(&self) -> &SculptMesh {
        &self.mesh
    }

    /// Returns the particle blob.
    #[must_use]
    pub fn blob(&self) -> &ClayBlob {
        &self.blob
    }

    /// Restores the mesh baseline and reseeds the blob.
    pub fn reset(&mut self) {
        self.mesh.reset();
        SeedLayout::new()
            .with_params(self.params.seed)
            .execute(&mut self.blob);
        self.end_stroke();
        tracing::debug!("clay session reset");
    }

    /// Advances the ambient clock by one frame. Returns how many elements moved.
    pub fn tick(&mut self) -> usize {
        self.ambient.animate(&mut self.blob, &mut self.mesh)
    }

    /// Returns the number of live particles.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.blob.len()
    }

    /// Returns the particle capacity.
    #[must_use]
    pub fn max_particles(&self) -> usize {
        self.blob.max_particles()
    }

    /// Returns `true` while another particle fits.
    #[must_use]
    pub fn can_add_particle(&self) -> bool {
        !self.blob.is_full()
    }

    /// Returns the number of mesh vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }
}
