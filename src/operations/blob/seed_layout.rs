use std::f64::consts::PI;

use rand::Rng;

use crate::blob::{ClayBlob, SizeRange};
use crate::error::BlobError;
use crate::math::{Point3, Vector3};

use super::AddParticle;

/// Shape of the canonical starting lump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedParams {
    /// Center of the lump.
    pub center: Point3,
    /// Particles spread over the outer shell.
    pub shell_count: usize,
    /// Radius of the outer shell.
    pub shell_radius: f64,
    /// Full width of the per-axis random offset applied to shell particles.
    pub shell_jitter: f64,
    /// Radii of shell particles.
    pub shell_size: SizeRange,
    /// Particles scattered inside the shell for solidity.
    pub inner_count: usize,
    /// Side of the inner scatter cube as a fraction of the shell radius.
    pub inner_extent: f64,
    /// Radii of inner particles.
    pub inner_size: SizeRange,
}

impl Default for SeedParams {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            shell_count: 50,
            shell_radius: 20.0,
            shell_jitter: 5.0,
            shell_size: SizeRange::new(5.0, 10.0),
            inner_count: 20,
            inner_extent: 0.7,
            inner_size: SizeRange::new(4.0, 8.0),
        }
    }
}

impl SeedParams {
    /// Number of particles a full seed produces, before any capacity limit.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.shell_count + self.inner_count
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> std::result::Result<(), BlobError> {
        let invalid = |name: &'static str, value: f64| BlobError::InvalidParameter { name, value };
        if let Some(&c) = self.center.coords.iter().find(|c| !c.is_finite()) {
            return Err(invalid("center", c));
        }
        for (name, value) in [
            ("shell_radius", self.shell_radius),
            ("shell_jitter", self.shell_jitter),
            ("inner_extent", self.inner_extent),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(name, value));
            }
        }
        if !self.shell_size.is_valid() {
            return Err(invalid("shell_size.max", self.shell_size.max));
        }
        if !self.inner_size.is_valid() {
            return Err(invalid("inner_size.max", self.inner_size.max));
        }
        Ok(())
    }

    /// Distance from `center` that no seeded particle exceeds.
    #[must_use]
    pub fn bounding_radius(&self) -> f64 {
        let shell = self.shell_radius + 3f64.sqrt() * self.shell_jitter.abs() * 0.5;
        let inner = 3f64.sqrt() * self.shell_radius * self.inner_extent.abs() * 0.5;
        shell.max(inner)
    }
}

/// Clears a blob and reseeds the canonical lump.
///
/// Shell particles follow the spiral `phi = acos(-1 + 2i/n)`,
/// `theta = sqrt(n * pi) * phi`, which spreads them roughly evenly over the
/// sphere, and are then jittered. Inner particles are scattered uniformly in
/// a cube around the center.
#[derive(Default)]
pub struct SeedLayout {
    params: SeedParams,
}

impl SeedLayout {
    /// Creates a new `SeedLayout` operation with the canonical parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets custom layout parameters.
    #[must_use]
    pub fn with_params(mut self, params: SeedParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the reseed, returning how many particles were placed.
    ///
    /// Placement stops early if the blob's capacity is smaller than the layout.
    /// Unusable jitter widths are treated as zero, and particles whose
    /// position comes out non-finite are skipped.
    pub fn execute(&self, blob: &mut ClayBlob) -> usize {
        blob.clear();
        let params = &self.params;
        let mut placed = 0;

        #[allow(clippy::cast_precision_loss)]
        let n = params.shell_count as f64;
        for i in 0..params.shell_count {
            #[allow(clippy::cast_precision_loss)]
            let phi = (-1.0 + 2.0 * i as f64 / n).acos();
            let theta = (n * PI).sqrt() * phi;
            let on_sphere = Vector3::new(
                theta.cos() * phi.sin(),
                theta.sin() * phi.sin(),
                phi.cos(),
            ) * params.shell_radius;
            let rng = blob.rng_mut();
            let offset = jitter(rng, params.shell_jitter);
            let size = params.shell_size.sample(rng);
            let position = params.center + on_sphere + offset;
            if blob.is_full() {
                break;
            }
            if AddParticle::new(position, size).execute(blob).is_some() {
                placed += 1;
            }
        }

        let extent = params.shell_radius * params.inner_extent;
        for _ in 0..params.inner_count {
            let rng = blob.rng_mut();
            let size = params.inner_size.sample(rng);
            let position = params.center + jitter(rng, extent);
            if blob.is_full() {
                break;
            }
            if AddParticle::new(position, size).execute(blob).is_some() {
                placed += 1;
            }
        }

        tracing::debug!(
            placed,
            connectors = blob.connector_count(),
            "seeded clay blob"
        );
        placed
    }
}

/// Random offset with each component uniform in `[-width/2, width/2)`.
/// A non-finite or non-positive width gives no offset.
fn jitter<R: Rng + ?Sized>(rng: &mut R, width: f64) -> Vector3 {
    if !width.is_finite() || width <= 0.0 {
        return Vector3::zeros();
    }
    Vector3::new(
        rng.gen_range(-0.5..0.5),
        rng.gen_range(-0.5..0.5),
        rng.gen_range(-0.5..0.5),
    ) * width
}
