mod apply_tool;

pub use apply_tool::ApplyTool;

use crate::brush::SculptTool;

/// What the smooth tool relaxes vertices toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothTarget {
    /// The vertex's own baseline position.
    #[default]
    Baseline,
    /// The average of the vertex's one-ring neighbors before the stroke.
    Neighborhood,
}

/// Tuning constants for the vertex sculpt tools.
///
/// Every displacement is `weight * strength * gain`, with the touch
/// multiplier folded into `strength` for touch input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SculptParams {
    /// Distance gain for [`SculptTool::Push`].
    pub push_gain: f64,
    /// Distance gain for [`SculptTool::Pull`].
    pub pull_gain: f64,
    /// Blend gain for [`SculptTool::Smooth`].
    pub smooth_gain: f64,
    /// Blend gain for [`SculptTool::Pinch`].
    pub pinch_gain: f64,
    /// Distance gain for [`SculptTool::Inflate`].
    pub inflate_gain: f64,
    /// Blend gain for [`SculptTool::Flatten`].
    pub flatten_gain: f64,
    /// Strength multiplier applied to touch input.
    pub touch_multiplier: f64,
    /// What the smooth tool relaxes toward.
    pub smooth_target: SmoothTarget,
}

impl Default for SculptParams {
    fn default() -> Self {
        Self {
            push_gain: 1.0,
            pull_gain: 1.0,
            smooth_gain: 1.0,
            pinch_gain: 1.0,
            inflate_gain: 1.0,
            flatten_gain: 1.0,
            touch_multiplier: 1.5,
            smooth_target: SmoothTarget::Baseline,
        }
    }
}

impl SculptParams {
    /// Returns the gain configured for `tool`.
    #[must_use]
    pub fn gain(&self, tool: SculptTool) -> f64 {
        match tool {
            SculptTool::Push => self.push_gain,
            SculptTool::Pull => self.pull_gain,
            SculptTool::Smooth => self.smooth_gain,
            SculptTool::Pinch => self.pinch_gain,
            SculptTool::Inflate => self.inflate_gain,
            SculptTool::Flatten => self.flatten_gain,
        }
    }

    /// Sets the gain for `tool`. Negative or non-finite gains become zero.
    #[must_use]
    pub fn with_gain(mut self, tool: SculptTool, gain: f64) -> Self {
        let gain = if gain.is_finite() { gain.max(0.0) } else { 0.0 };
        let slot = match tool {
            SculptTool::Push => &mut self.push_gain,
            SculptTool::Pull => &mut self.pull_gain,
            SculptTool::Smooth => &mut self.smooth_gain,
            SculptTool::Pinch => &mut self.pinch_gain,
            SculptTool::Inflate => &mut self.inflate_gain,
            SculptTool::Flatten => &mut self.flatten_gain,
        };
        *slot = gain;
        self
    }

    /// Sets the touch multiplier. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_touch_multiplier(mut self, multiplier: f64) -> Self {
        self.touch_multiplier = crate::brush::sanitize(multiplier, 1.0);
        self
    }

    /// Sets what the smooth tool relaxes toward.
    #[must_use]
    pub fn with_smooth_target(mut self, target: SmoothTarget) -> Self {
        self.smooth_target = target;
        self
    }
}
