//! Light descriptions carried by a world or model group.

use crate::float_types::Real;
use crate::pose::Pose;

/// Kind of light source, mirroring the SDF `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightKind {
    #[default]
    Point,
    Directional,
    Spot,
}

impl LightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LightKind::Point => "point",
            LightKind::Directional => "directional",
            LightKind::Spot => "spot",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "point" => Some(LightKind::Point),
            "directional" => Some(LightKind::Directional),
            "spot" => Some(LightKind::Spot),
            _ => None,
        }
    }
}

/// A light source with RGBA colors and a simple attenuation range.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub name: String,
    pub kind: LightKind,
    pub pose: Pose,
    pub diffuse: [Real; 4],
    pub specular: [Real; 4],
    pub range: Real,
    pub cast_shadows: bool,
}

impl Light {
    pub fn new(name: impl Into<String>, kind: LightKind) -> Self {
        Light {
            name: name.into(),
            kind,
            pose: Pose::identity(),
            diffuse: [1.0, 1.0, 1.0, 1.0],
            specular: [0.1, 0.1, 0.1, 1.0],
            range: 10.0,
            cast_shadows: matches!(kind, LightKind::Directional),
        }
    }
}
