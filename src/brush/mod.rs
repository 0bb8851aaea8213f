//! Brush state: the active tool, its radius and strength, the input modality
//! and the color hint.
//!
//! A [`BrushConfig`] is an explicit value handed to every operator call.
//! Its constructor and setters sanitize input, so operators can assume a
//! positive, finite radius and strength.

use std::fmt;
use std::str::FromStr;

use crate::error::BrushError;
use crate::math::Falloff;

/// Smallest radius a brush may have.
pub const MIN_RADIUS: f64 = 1e-3;

/// Smallest strength a brush may have.
pub const MIN_STRENGTH: f64 = 1e-6;

/// Tools that displace the vertices of a [`SculptMesh`](crate::mesh::SculptMesh).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SculptTool {
    /// Dent the surface inward.
    Push,
    /// Raise a bump outward.
    Pull,
    /// Relax vertices toward their rest shape.
    Smooth,
    /// Draw vertices toward the brush point.
    Pinch,
    /// Expand vertices along their own radial direction.
    Inflate,
    /// Press vertices onto the plane through the brush point.
    Flatten,
}

impl SculptTool {
    /// All sculpt tools, in UI order.
    pub const ALL: [Self; 6] = [
        Self::Push,
        Self::Pull,
        Self::Smooth,
        Self::Pinch,
        Self::Inflate,
        Self::Flatten,
    ];

    /// Influence profile used by this tool.
    #[must_use]
    pub fn falloff(self) -> Falloff {
        match self {
            Self::Pinch => Falloff::Sharp,
            Self::Push | Self::Pull | Self::Smooth | Self::Inflate | Self::Flatten => {
                Falloff::Smooth
            }
        }
    }
}

/// Tools that add, remove or rearrange particles of a
/// [`ClayBlob`](crate::blob::ClayBlob).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobTool {
    /// Deposit a single particle.
    Add,
    /// Scoop away every particle under the brush.
    Remove,
    /// Pull particles under the brush toward their centroid.
    SmoothBlob,
    /// Deposit a small ball of particles.
    StampSphere,
    /// Deposit a small lattice cube of particles.
    StampCube,
    /// Lay particles along a flat spiral.
    PatternSpiral,
    /// Lay particles along a flat ring.
    PatternRing,
}

impl BlobTool {
    /// All blob tools, in UI order.
    pub const ALL: [Self; 7] = [
        Self::Add,
        Self::Remove,
        Self::SmoothBlob,
        Self::StampSphere,
        Self::StampCube,
        Self::PatternSpiral,
        Self::PatternRing,
    ];
}

/// The active tool, tagged by the representation it operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Sculpt(SculptTool),
    Blob(BlobTool),
}

impl Tool {
    /// Every tool the engine knows about.
    #[must_use]
    pub fn all() -> Vec<Self> {
        SculptTool::ALL
            .iter()
            .copied()
            .map(Self::Sculpt)
            .chain(BlobTool::ALL.iter().copied().map(Self::Blob))
            .collect()
    }

    /// Stable kebab-case name, as used by UI bindings.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sculpt(SculptTool::Push) => "push",
            Self::Sculpt(SculptTool::Pull) => "pull",
            Self::Sculpt(SculptTool::Smooth) => "smooth",
            Self::Sculpt(SculptTool::Pinch) => "pinch",
            Self::Sculpt(SculptTool::Inflate) => "inflate",
            Self::Sculpt(SculptTool::Flatten) => "flatten",
            Self::Blob(BlobTool::Add) => "add",
            Self::Blob(BlobTool::Remove) => "remove",
            Self::Blob(BlobTool::SmoothBlob) => "smooth-blob",
            Self::Blob(BlobTool::StampSphere) => "stamp-sphere",
            Self::Blob(BlobTool::StampCube) => "stamp-cube",
            Self::Blob(BlobTool::PatternSpiral) => "pattern-spiral",
            Self::Blob(BlobTool::PatternRing) => "pattern-ring",
        }
    }
}

impl From<SculptTool> for Tool {
    fn from(tool: SculptTool) -> Self {
        Self::Sculpt(tool)
    }
}

impl From<BlobTool> for Tool {
    fn from(tool: BlobTool) -> Self {
        Self::Blob(tool)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = BrushError;

    /// Parses a tool name. Accepts kebab-case and camelCase (`smoothBlob`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|tool| tool.name().replace('-', "") == key)
            .ok_or_else(|| BrushError::UnknownTool(s.to_owned()))
    }
}

/// How the interaction point was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputModality {
    /// Mouse, pen or any other precise pointer.
    #[default]
    Pointer,
    /// Finger input, which gets a strength boost to make up for imprecision.
    Touch,
}

impl InputModality {
    /// Strength multiplier for this modality given the configured touch boost.
    #[must_use]
    pub fn multiplier(self, touch_multiplier: f64) -> f64 {
        match self {
            Self::Pointer => 1.0,
            Self::Touch => touch_multiplier,
        }
    }
}

/// Tool, radius and strength applied to the next interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushConfig {
    tool: Tool,
    radius: f64,
    strength: f64,
}

impl BrushConfig {
    /// Creates a brush, clamping radius and strength to their minimum positive values.
    #[must_use]
    pub fn new(tool: impl Into<Tool>, radius: f64, strength: f64) -> Self {
        Self {
            tool: tool.into(),
            radius: sanitize(radius, MIN_RADIUS),
            strength: sanitize(strength, MIN_STRENGTH),
        }
    }

    /// Returns the active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Returns the brush radius (always positive).
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the brush strength (always positive).
    #[must_use]
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Returns a copy with a different tool.
    #[must_use]
    pub fn with_tool(mut self, tool: impl Into<Tool>) -> Self {
        self.tool = tool.into();
        self
    }

    /// Returns a copy with a different radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = sanitize(radius, MIN_RADIUS);
        self
    }

    /// Returns a copy with a different strength.
    #[must_use]
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = sanitize(strength, MIN_STRENGTH);
        self
    }
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self::new(BlobTool::Add, 15.0, 0.1)
    }
}

/// Clamps `value` to at least `min`, mapping NaN to `min`.
///
/// Infinite values are also mapped to `min` so a runaway UI value cannot
/// make every element of the shape fall inside the brush.
pub(crate) fn sanitize(value: f64, min: f64) -> f64 {
    if value.is_finite() {
        value.max(min)
    } else {
        min
    }
}

/// Opaque `0xRRGGBB` color applied to the clay material.
///
/// Purely a rendering hint; none of the deformation math reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClayColor(u32);

impl ClayColor {
    /// Light terracotta.
    pub const DEFAULT: Self = Self(0x00e8_c291);

    /// Creates a color from a packed `0xRRGGBB` value. Bits above 24 are dropped.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    /// Creates a color from its channels.
    #[must_use]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
    }

    /// Returns the packed `0xRRGGBB` value.
    #[must_use]
    pub fn hex(self) -> u32 {
        self.0
    }

    /// Returns the `(r, g, b)` channels.
    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.0.to_be_bytes();
        (r, g, b)
    }
}

impl Default for ClayColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_through_parse() {
        for tool in Tool::all() {
            assert_eq!(tool.name().parse::<Tool>().unwrap(), tool);
        }
        assert_eq!(Tool::all().len(), 13);
    }

    #[test]
    fn parse_accepts_camel_case() {
        assert_eq!(
            "smoothBlob".parse::<Tool>().unwrap(),
            Tool::Blob(BlobTool::SmoothBlob)
        );
        assert_eq!(
            "Stamp-Sphere".parse::<Tool>().unwrap(),
            Tool::Blob(BlobTool::StampSphere)
        );
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "chisel".parse::<Tool>().unwrap_err();
        assert!(matches!(err, BrushError::UnknownTool(ref s) if s == "chisel"));
    }

    #[test]
    fn pinch_is_sharp() {
        assert_eq!(SculptTool::Pinch.falloff(), Falloff::Sharp);
        assert_eq!(SculptTool::Pull.falloff(), Falloff::Smooth);
    }

    #[test]
    fn malformed_brush_values_are_clamped() {
        let brush = BrushConfig::new(SculptTool::Push, -4.0, f64::NAN);
        assert!((brush.radius() - MIN_RADIUS).abs() < f64::EPSILON);
        assert!((brush.strength() - MIN_STRENGTH).abs() < f64::EPSILON);

        let brush = brush.with_radius(f64::INFINITY).with_strength(0.5);
        assert!((brush.radius() - MIN_RADIUS).abs() < f64::EPSILON);
        assert!((brush.strength() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn touch_multiplier_only_for_touch() {
        assert!((InputModality::Pointer.multiplier(1.5) - 1.0).abs() < f64::EPSILON);
        assert!((InputModality::Touch.multiplier(1.5) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn color_channels() {
        let c = ClayColor::DEFAULT;
        assert_eq!(c.rgb(), (0xe8, 0xc2, 0x91));
        assert_eq!(ClayColor::from_rgb(0xe8, 0xc2, 0x91), c);
        assert_eq!(ClayColor::from_hex(0xff12_3456).hex(), 0x0012_3456);
    }
}
