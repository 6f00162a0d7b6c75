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

//! The Coordinate Reconciler.
//!
//! Pure functions between the source conventions (anchor-origin, Y-up UI space;
//! flat 3D transform fields) and the output conventions (top-left-origin, Y-down
//! UI space; nested 3D `transform`).
//!
//! For a child of a UI rect with anchor `(ax, ay)` and size `(w, h)`:
//!
//! ```text
//! x' =  x + ax * w
//! y' = -y + ay * h
//! ```
//!
//! A child whose parent has no UI rect keeps its position as is.

use crate::fields::{quat_value, vec3_value};
use scenegraft_core::math::{Quaternion, RectInfo, Vec2, Vec3};
use serde_json::{Map, Value};

/// Converts a source UI position into the output convention.
#[inline]
pub fn to_ui_position(source: Vec2, parent: Option<RectInfo>) -> Vec2 {
    match parent {
        Some(rect) => {
            let offset = rect.anchor_offset();
            Vec2::new(source.x + offset.x, -source.y + offset.y)
        }
        None => source,
    }
}

/// The exact inverse of [`to_ui_position`].
#[inline]
pub fn from_ui_position(output: Vec2, parent: Option<RectInfo>) -> Vec2 {
    match parent {
        Some(rect) => {
            let offset = rect.anchor_offset();
            Vec2::new(output.x - offset.x, offset.y - output.y)
        }
        None => output,
    }
}

/// Moves an output position computed against `from` so it is expressed against `to`.
#[inline]
pub fn reanchor(output: Vec2, from: Option<RectInfo>, to: Option<RectInfo>) -> Vec2 {
    to_ui_position(from_ui_position(output, from), to)
}

/// UI rotation: the source Z angle in degrees, unchanged.
#[inline]
pub fn ui_rotation(euler_z_degrees: f32) -> f32 {
    euler_z_degrees
}

/// The Z angle, in degrees, of a rotation about the Z axis.
#[inline]
pub fn z_angle_degrees(rotation: Quaternion) -> f32 {
    (2.0 * rotation.z.atan2(rotation.w)).to_degrees()
}

/// UI scale: independent X and Y factors.
#[inline]
pub fn ui_scale(scale: Vec3) -> Vec2 {
    scale.truncate()
}

/// Builds the nested 3D `transform` field.
///
/// Each sub-field is emitted only when present in the source and, outside
/// override mode, different from identity. Returns `None` when nothing is left.
pub fn spatial_transform(
    position: Option<Vec3>,
    rotation: Option<Quaternion>,
    scale: Option<Vec3>,
    is_override: bool,
) -> Option<Map<String, Value>> {
    let mut transform = Map::new();
    if let Some(position) = position.filter(|p| is_override || !p.approx_eq(Vec3::ZERO)) {
        transform.insert("position".into(), vec3_value(position));
    }
    if let Some(rotation) = rotation.filter(|r| is_override || !r.is_identity()) {
        transform.insert("rotation".into(), quat_value(rotation));
    }
    if let Some(scale) = scale.filter(|s| is_override || !s.approx_eq(Vec3::ONE)) {
        transform.insert("scale".into(), vec3_value(scale));
    }
    (!transform.is_empty()).then_some(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn centered_parent_round_trip() {
        let parent = Some(RectInfo::new(Vec2::new(200.0, 100.0), Vec2::new(0.5, 0.5)));
        let converted = to_ui_position(Vec2::new(10.0, -20.0), parent);
        assert_eq!(converted, Vec2::new(110.0, 70.0));
        assert_eq!(from_ui_position(converted, parent), Vec2::new(10.0, -20.0));
    }

    #[test]
    fn top_left_anchor_flips_y() {
        let parent = Some(RectInfo::new(Vec2::new(0.0, 100.0), Vec2::new(0.0, 1.0)));
        assert_eq!(
            to_ui_position(Vec2::new(10.0, 20.0), parent),
            Vec2::new(10.0, 80.0)
        );
    }

    #[test]
    fn no_rect_passes_through() {
        assert_eq!(to_ui_position(Vec2::new(10.0, 20.0), None), Vec2::new(10.0, 20.0));
        assert_eq!(from_ui_position(Vec2::new(10.0, 20.0), None), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn reanchor_moves_between_parents() {
        let rect = Some(RectInfo::new(Vec2::new(100.0, 50.0), Vec2::new(0.5, 0.5)));
        assert_eq!(reanchor(Vec2::new(5.0, 5.0), None, rect), Vec2::new(55.0, 20.0));
    }

    #[test]
    fn quarter_turn_about_z() {
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(
            z_angle_degrees(Quaternion::new(0.0, 0.0, half, half)),
            90.0,
            epsilon = 1e-3
        );
        assert_relative_eq!(z_angle_degrees(Quaternion::IDENTITY), 0.0);
    }

    #[test]
    fn identity_transform_is_omitted_unless_overriding() {
        let identity = (Some(Vec3::ZERO), Some(Quaternion::IDENTITY), Some(Vec3::ONE));
        assert!(spatial_transform(identity.0, identity.1, identity.2, false).is_none());

        let explicit = spatial_transform(identity.0, identity.1, identity.2, true).unwrap();
        assert!(explicit.contains_key("position"));
        assert!(explicit.contains_key("rotation"));
        assert!(explicit.contains_key("scale"));
    }

    #[test]
    fn only_non_identity_parts_are_kept() {
        let transform =
            spatial_transform(Some(Vec3::new(0.0, 2.0, 0.0)), None, Some(Vec3::ONE), false)
                .unwrap();
        assert_eq!(transform.len(), 1);
        assert!(transform.contains_key("position"));
    }
}
