use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::blob::ClayBlob;
use crate::math::{Point3, Vector3};
use crate::mesh::SculptMesh;

/// Tuning constants for [`AmbientAnimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientParams {
    /// The animator fires once every this many ticks. Zero behaves like one.
    pub interval_ticks: u32,
    /// Particles or vertices perturbed per firing.
    pub samples: usize,
    /// Full width of the per-axis particle offset.
    pub particle_intensity: f64,
    /// Full width of the per-axis vertex offset.
    pub mesh_intensity: f64,
    /// Farthest a particle may wander from its rest position.
    pub max_drift: f64,
    /// Farthest a vertex may wander from its sculpted rest position.
    pub mesh_max_drift: f64,
    /// Seed for the animator's random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for AmbientParams {
    fn default() -> Self {
        Self {
            interval_ticks: 10,
            samples: 3,
            particle_intensity: 0.2,
            mesh_intensity: 0.002,
            max_drift: 1.0,
            mesh_max_drift: 0.01,
            seed: None,
        }
    }
}

impl AmbientParams {
    /// Sets the firing interval.
    #[must_use]
    pub fn with_interval(mut self, interval_ticks: u32) -> Self {
        self.interval_ticks = interval_ticks;
        self
    }

    /// Sets the number of elements perturbed per firing.
    #[must_use]
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Sets a fixed seed for reproducible motion.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Small idle motion that keeps the clay looking alive between strokes.
///
/// Time is a simulated clock advanced by [`tick`](Self::tick); nothing runs
/// in the background. Particles and vertices wander around their rest
/// positions, each bounded by a drift radius, so counts and bounds never
/// change and sculpted or smoothed shapes are kept.
#[derive(Debug)]
pub struct AmbientAnimator {
    params: AmbientParams,
    rng: StdRng,
    ticks: u64,
}

impl Default for AmbientAnimator {
    fn default() -> Self {
        Self::new(AmbientParams::default())
    }
}

impl AmbientAnimator {
    /// Creates an animator with its clock at zero.
    #[must_use]
    pub fn new(params: AmbientParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            params,
            rng,
            ticks: 0,
        }
    }

    /// Returns the animator's parameters.
    #[must_use]
    pub fn params(&self) -> &AmbientParams {
        &self.params
    }

    /// Returns the number of ticks seen so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances the clock by one tick. Returns `true` on ticks where the
    /// animator fires.
    pub fn tick(&mut self) -> bool {
        self.ticks += 1;
        let interval = u64::from(self.params.interval_ticks.max(1));
        self.ticks % interval == 0
    }

    /// Perturbs up to `samples` random particles, returning how many moved.
    ///
    /// Rest positions are left alone; a particle pushed beyond `max_drift`
    /// from its rest position is pulled back onto the drift sphere.
    pub fn jitter_particles(&mut self, blob: &mut ClayBlob) -> usize {
        if blob.is_empty() {
            return 0;
        }
        let intensity = self.params.particle_intensity;
        let max_drift = self.params.max_drift;
        let mut moved = 0;
        for _ in 0..self.params.samples {
            let index = self.rng.gen_range(0..blob.len());
            let offset = offset(&mut self.rng, intensity);
            let Some(id) = blob.id_at(index) else {
                continue;
            };
            let Some(particle) = blob.particle_mut(id) else {
                continue;
            };
            let origin = *particle.origin();
            let next = bounded(origin, particle.position() + offset, max_drift);
            particle.nudge(next);
            moved += 1;
        }
        moved
    }

    /// Perturbs up to `samples` random vertices, returning how many moved.
    ///
    /// Each vertex stays within `mesh_max_drift` of its sculpted rest
    /// position, so idle motion never undoes sculpting. Rest positions and
    /// the baseline are never touched. Normals are recomputed once.
    pub fn jitter_mesh(&mut self, mesh: &mut SculptMesh) -> usize {
        let count = mesh.vertex_count();
        if count == 0 || self.params.samples == 0 {
            return 0;
        }
        let picks: Vec<(usize, Vector3)> = (0..self.params.samples)
            .map(|_| {
                let index = self.rng.gen_range(0..count);
                (index, offset(&mut self.rng, self.params.mesh_intensity))
            })
            .collect();

        let rest: Vec<Point3> = picks.iter().map(|&(i, _)| mesh.rest()[i]).collect();
        let max_drift = self.params.mesh_max_drift;
        let vertices = mesh.vertices_mut();
        for (&(index, offset), rest) in picks.iter().zip(rest) {
            vertices[index] = bounded(rest, vertices[index] + offset, max_drift);
        }
        mesh.recompute_normals();
        picks.len()
    }

    /// Advances the clock and, on a firing tick, perturbs the blob and the
    /// mesh. Returns the number of elements moved.
    pub fn animate(&mut self, blob: &mut ClayBlob, mesh: &mut SculptMesh) -> usize {
        if !self.tick() {
            return 0;
        }
        let moved = self.jitter_particles(blob) + self.jitter_mesh(mesh);
        tracing::trace!(tick = self.ticks, moved, "ambient motion");
        moved
    }
}

/// Random offset with each component uniform in `[-width/2, width/2)`.
fn offset(rng: &mut StdRng, width: f64) -> Vector3 {
    if !width.is_finite() || width <= 0.0 {
        return Vector3::zeros();
    }
    Vector3::new(
        rng.gen_range(-0.5..0.5),
        rng.gen_range(-0.5..0.5),
        rng.gen_range(-0.5..0.5),
    ) * width
}

/// Pulls `position` back onto the sphere of `max_drift` around `rest` if it
/// has wandered outside it.
fn bounded(rest: Point3, position: Point3, max_drift: f64) -> Point3 {
    let max_drift = if max_drift.is_finite() { max_drift.max(0.0) } else { 0.0 };
    let drift = position - rest;
    let distance = drift.norm();
    if distance > max_drift {
        rest + drift * (max_drift / distance)
    } else {
        position
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::blob::BlobParams;
    use crate::brush::SculptTool;
    use crate::mesh::MakeSculptSphere;
    use crate::operations::blob::SeedLayout;
    use crate::operations::sculpt::ApplyTool;

    fn seeded_blob() -> ClayBlob {
        let mut blob = ClayBlob::new(BlobParams::default().with_seed(2)).unwrap();
        SeedLayout::new().execute(&mut blob);
        blob
    }

    fn sphere() -> SculptMesh {
        MakeSculptSphere::new(Point3::origin(), 2.0)
            .with_resolution(16, 12)
            .execute()
            .unwrap()
    }

    #[test]
    fn fires_once_per_interval() {
        let mut animator = AmbientAnimator::new(AmbientParams::default().with_seed(1));
        let mut fired = Vec::new();
        for _ in 0..35 {
            if animator.tick() {
                fired.push(animator.ticks());
            }
        }
        assert_eq!(fired, vec![10, 20, 30]);
    }

    #[test]
    fn zero_interval_fires_every_tick() {
        let mut animator = AmbientAnimator::new(AmbientParams::default().with_interval(0));
        assert!((0..5).all(|_| animator.tick()));
    }

    #[test]
    fn animate_is_rate_limited() {
        let mut animator = AmbientAnimator::new(AmbientParams::default().with_seed(4));
        let mut blob = seeded_blob();
        let mut mesh = sphere();

        let moved: Vec<usize> = (0..20)
            .map(|_| animator.animate(&mut blob, &mut mesh))
            .collect();

        assert_eq!(moved.iter().filter(|&&m| m > 0).count(), 2);
        assert_eq!(moved[9], 6);
        assert_eq!(moved[19], 6);
    }

    #[test]
    fn particles_stay_within_drift_of_origin() {
        let params = AmbientParams {
            particle_intensity: 5.0,
            max_drift: 0.5,
            samples: 20,
            ..AmbientParams::default().with_seed(9)
        };
        let mut animator = AmbientAnimator::new(params);
        let mut blob = seeded_blob();
        let origins: Vec<Point3> = blob.iter().map(|(_, p)| *p.origin()).collect();

        for _ in 0..50 {
            animator.jitter_particles(&mut blob);
        }

        assert_eq!(blob.len(), 70);
        for ((_, particle), origin) in blob.iter().zip(&origins) {
            assert_eq!(particle.origin(), origin);
            assert!((particle.position() - origin).norm() <= 0.5 + 1e-12);
        }
    }

    #[test]
    fn empty_blob_is_untouched() {
        let mut animator = AmbientAnimator::new(AmbientParams::default().with_seed(3));
        let mut blob = ClayBlob::new(BlobParams::default()).unwrap();
        assert_eq!(animator.jitter_particles(&mut blob), 0);
        assert!(blob.is_empty());
    }

    #[test]
    fn mesh_jitter_keeps_baseline_and_recomputes_normals_once() {
        let mut animator = AmbientAnimator::new(AmbientParams::default().with_seed(6));
        let mut mesh = sphere();
        let baseline = mesh.baseline().to_vec();
        let revision = mesh.normal_revision();

        assert_eq!(animator.jitter_mesh(&mut mesh), 3);

        assert_eq!(mesh.baseline(), baseline.as_slice());
        assert_eq!(mesh.normal_revision(), revision + 1);
        for (vertex, rest) in mesh.vertices().iter().zip(&baseline) {
            assert!((vertex - rest).norm() <= 0.01 + 1e-12);
        }
    }

    #[test]
    fn mesh_jitter_keeps_sculpted_shape() {
        let params = AmbientParams {
            mesh_intensity: 0.5,
            samples: 400,
            ..AmbientParams::default().with_seed(12)
        };
        let mut animator = AmbientAnimator::new(params);
        let mut mesh = sphere();
        let pole = Point3::new(0.0, 0.0, 2.0);
        ApplyTool::new(SculptTool::Pull, pole, 0.5, 0.5).execute(&mut mesh);
        let sculpted = mesh.rest().to_vec();
        assert!((sculpted[0].coords.norm() - 2.5).abs() < 1e-9);

        animator.jitter_mesh(&mut mesh);

        assert_eq!(mesh.rest(), sculpted.as_slice());
        for (vertex, rest) in mesh.vertices().iter().zip(&sculpted) {
            assert!((vertex - rest).norm() <= params.mesh_max_drift + 1e-12);
        }
        assert!(mesh.vertices()[0].coords.norm() > 2.4);
    }

    #[test]
    fn zero_intensity_never_moves() {
        let params = AmbientParams {
            particle_intensity: 0.0,
            ..AmbientParams::default().with_seed(8)
        };
        let mut animator = AmbientAnimator::new(params);
        let mut blob = seeded_blob();
        let before = blob.snapshot();
        animator.jitter_particles(&mut blob);
        assert_eq!(blob.snapshot(), before);
    }
}
