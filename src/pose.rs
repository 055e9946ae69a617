//! 6-DoF pose: a position plus a roll/pitch/yaw orientation.
//!
//! Poses compose: `a.compose(&b)` places `b` in the frame defined by `a`,
//! accumulating both the translation and the rotation. The SDF text form is
//! the whitespace-separated `x y z roll pitch yaw` sextuple.

use crate::errors::{Error, Result};
use crate::float_types::Real;
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

/// Position and orientation in world or parent-frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub x: Real,
    pub y: Real,
    pub z: Real,
    pub roll: Real,
    pub pitch: Real,
    pub yaw: Real,
}

impl Pose {
    pub fn new(x: Real, y: Real, z: Real, roll: Real, pitch: Real, yaw: Real) -> Self {
        Pose { x, y, z, roll, pitch, yaw }
    }

    /// Identity pose at the origin.
    pub fn identity() -> Self {
        Pose::default()
    }

    /// Pure translation, zero orientation.
    pub fn from_position(x: Real, y: Real, z: Real) -> Self {
        Pose { x, y, z, ..Pose::default() }
    }

    pub fn position(&self) -> Vector3<Real> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn rpy(&self) -> [Real; 3] {
        [self.roll, self.pitch, self.yaw]
    }

    pub fn set_rpy(&mut self, roll: Real, pitch: Real, yaw: Real) {
        self.roll = roll;
        self.pitch = pitch;
        self.yaw = yaw;
    }

    /// Convert to a nalgebra isometry (translation + unit quaternion).
    pub fn to_isometry(&self) -> Isometry3<Real> {
        Isometry3::from_parts(
            Translation3::new(self.x, self.y, self.z),
            UnitQuaternion::from_euler_angles(self.roll, self.pitch, self.yaw),
        )
    }

    /// Rebuild a pose from an isometry, extracting Euler angles.
    pub fn from_isometry(iso: &Isometry3<Real>) -> Self {
        let t = iso.translation.vector;
        let (roll, pitch, yaw) = iso.rotation.euler_angles();
        Pose { x: t.x, y: t.y, z: t.z, roll, pitch, yaw }
    }

    /// Compose `other` on top of `self`: the result is `other` expressed in
    /// the frame defined by `self`. Offsets accumulate in both components.
    pub fn compose(&self, other: &Pose) -> Pose {
        Pose::from_isometry(&(self.to_isometry() * other.to_isometry()))
    }

    /// Parse the SDF `x y z roll pitch yaw` text form.
    pub fn from_sdf_text(text: &str) -> Result<Pose> {
        let values: Vec<Real> = text
            .split_whitespace()
            .map(|v| {
                v.parse::<Real>()
                    .map_err(|e| Error::SdfParse(format!("bad pose value {v:?}: {e}")))
            })
            .collect::<Result<_>>()?;
        if values.len() != 6 {
            return Err(Error::SdfParse(format!(
                "pose needs 6 values, got {}",
                values.len()
            )));
        }
        Ok(Pose::new(
            values[0], values[1], values[2], values[3], values[4], values[5],
        ))
    }
}

impl std::fmt::Display for Pose {
    /// The SDF text form.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.x, self.y, self.z, self.roll, self.pitch, self.yaw
        )
    }
}
