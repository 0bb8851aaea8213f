//! Distance-based influence weights shared by every brush.
//!
//! A weight is `(1 - d/r)^p`, which is exactly 1 at the brush center and
//! decays smoothly to 0 at the brush boundary.

/// Shape of a brush's influence profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Falloff {
    /// Quadratic decay, used by most tools.
    #[default]
    Smooth,
    /// Cubic decay, for tools that should bite harder near the center.
    Sharp,
}

impl Falloff {
    /// Exponent applied to the linear ramp `1 - d/r`.
    #[must_use]
    pub fn power(self) -> i32 {
        match self {
            Self::Smooth => 2,
            Self::Sharp => 3,
        }
    }

    /// Returns the influence weight in `[0, 1]` at `distance` for a brush of `radius`.
    #[must_use]
    pub fn weight(self, distance: f64, radius: f64) -> f64 {
        if !radius.is_finite() || radius <= 0.0 {
            return 0.0;
        }
        let distance = if distance.is_nan() { radius } else { distance.max(0.0) };
        if distance >= radius {
            return 0.0;
        }
        (1.0 - distance / radius).powi(self.power())
    }
}

/// Canonical smooth (quadratic) falloff.
#[must_use]
pub fn falloff(distance: f64, radius: f64) -> f64 {
    Falloff::Smooth.weight(distance, radius)
}
