//! Decoded track values

use glam::{Mat4, Quat, Vec3};
use serde::Serialize;

/// Scale, rotation, and position of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub scale: Vec3,
    /// Quaternion as stored; not renormalized
    pub rotation: Quat,
    pub position: Vec3,
}

impl Transform {
    /// Identity transform (no rotation, no translation, unit scale)
    pub const IDENTITY: Self = Self {
        scale: Vec3::ONE,
        rotation: Quat::IDENTITY,
        position: Vec3::ZERO,
    };

    /// Build from the ten floats in stored order: scale xyz, rotation xyzw, position xyz
    pub fn from_array(v: [f32; 10]) -> Self {
        Self {
            scale: Vec3::new(v[0], v[1], v[2]),
            rotation: Quat::from_xyzw(v[3], v[4], v[5], v[6]),
            position: Vec3::new(v[7], v[8], v[9]),
        }
    }

    pub fn to_array(&self) -> [f32; 10] {
        let (s, r, p) = (self.scale, self.rotation, self.position);
        [s.x, s.y, s.z, r.x, r.y, r.z, r.w, p.x, p.y, p.z]
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One decoded frame of a track
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackFrame {
    Visibility(bool),
    Transform(Transform),
}

impl TrackFrame {
    pub fn as_visibility(&self) -> Option<bool> {
        match self {
            Self::Visibility(visible) => Some(*visible),
            Self::Transform(_) => None,
        }
    }

    pub fn as_transform(&self) -> Option<&Transform> {
        match self {
            Self::Transform(transform) => Some(transform),
            Self::Visibility(_) => None,
        }
    }
}
