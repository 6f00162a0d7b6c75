// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides a Quaternion type for carrying 3D rotations.

use serde::{Deserialize, Serialize};

use super::{approx_eq, Vec3};

/// A rotation stored as `(x, y, z, w)`, where `[x, y, z]` is the "vector" part
/// and `w` is the "scalar" part.
///
/// Both engines store rotations this way, so stored values pass through
/// untouched. A rotation is only computed when a source carries Euler angles alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// The x component of the vector part.
    #[serde(default)]
    pub x: f32,
    /// The y component of the vector part.
    #[serde(default)]
    pub y: f32,
    /// The z component of the vector part.
    #[serde(default)]
    pub z: f32,
    /// The scalar (real) part.
    #[serde(default = "one")]
    pub w: f32,
}

fn one() -> f32 {
    1.0
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a new quaternion from its raw components.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Builds a rotation from Euler angles in degrees, applied in Y, Z, X order.
    pub fn from_euler_degrees(euler: Vec3) -> Self {
        let half = std::f32::consts::PI / 360.0;
        let (sx, cx) = (euler.x * half).sin_cos();
        let (sy, cy) = (euler.y * half).sin_cos();
        let (sz, cz) = (euler.z * half).sin_cos();
        Self {
            x: sx * cy * cz + cx * sy * sz,
            y: cx * sy * cz + sx * cy * sz,
            z: cx * cy * sz - sx * sy * cz,
            w: cx * cy * cz - sx * sy * sz,
        }
    }

    /// Whether this quaternion is the identity rotation, within tolerance.
    #[inline]
    pub fn is_identity(&self) -> bool {
        approx_eq(self.x, 0.0)
            && approx_eq(self.y, 0.0)
            && approx_eq(self.z, 0.0)
            && approx_eq(self.w, 1.0)
    }
}

impl Default for Quaternion {
    /// Returns the identity quaternion.
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_detection() {
        assert!(Quaternion::IDENTITY.is_identity());
        assert!(Quaternion::default().is_identity());
        assert!(!Quaternion::new(0.0, 0.7071, 0.0, 0.7071).is_identity());
    }

    #[test]
    fn missing_w_defaults_to_one() {
        let q: Quaternion = serde_json::from_str(r#"{"x": 0, "y": 0, "z": 0}"#).unwrap();
        assert!(q.is_identity());
    }

    #[test]
    fn euler_yaw_becomes_a_y_rotation() {
        let q = Quaternion::from_euler_degrees(Vec3::new(0.0, 90.0, 0.0));
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(q.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(q.y, half, epsilon = 1e-6);
        assert_relative_eq!(q.z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(q.w, half, epsilon = 1e-6);
        assert!(Quaternion::from_euler_degrees(Vec3::ZERO).is_identity());
    }

    #[test]
    fn near_identity_within_tolerance() {
        let q = Quaternion::new(0.0, 0.0, 1e-6, 0.999_999_9);
        assert!(q.is_identity());
        assert_relative_eq!(q.w, 1.0, epsilon = 1e-5);
    }
}
