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

//! Maps a node record's primitive fields onto output fields.
//!
//! Only keys present in the record are considered. Outside override mode a
//! field equal to its default is left out; in override mode every present
//! field is written so it can replace the template's value.

use crate::reconcile;
use scenegraft_core::math::{self, Quaternion, RectInfo, Vec2, Vec3};
use scenegraft_core::SpaceMode;
use scenegraft_data::{Record, RecordExt};
use serde_json::{json, Map, Value};

/// Where the fields being mapped live.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldContext {
    /// The node's space convention.
    pub space: SpaceMode,
    /// The UI rect of the node's parent, if any.
    pub parent_rect: Option<RectInfo>,
    /// Emit every present field, even at its default.
    pub is_override: bool,
}

/// Maps `record` into output fields.
pub fn map_fields(record: &Record, cx: &FieldContext) -> Map<String, Value> {
    let mut fields = Map::new();

    if let Some(name) = record.str_field("name") {
        fields.insert("name".into(), Value::from(name));
    }
    if let Some(active) = record.bool_field("active") {
        if cx.is_override || !active {
            fields.insert("visible".into(), Value::from(active));
        }
    }

    match cx.space {
        SpaceMode::TwoD => map_ui_fields(record, cx, &mut fields),
        SpaceMode::ThreeD => {
            let transform = reconcile::spatial_transform(
                read_vec3(record, "position", Vec3::ZERO),
                read_quat(record, "rotation").or_else(|| {
                    read_vec3(record, "euler", Vec3::ZERO).map(Quaternion::from_euler_degrees)
                }),
                read_vec3(record, "scale", Vec3::ONE),
                cx.is_override,
            );
            if let Some(transform) = transform {
                fields.insert("transform".into(), Value::Object(transform));
            }
        }
    }

    fields
}

fn map_ui_fields(record: &Record, cx: &FieldContext, fields: &mut Map<String, Value>) {
    if let Some(position) = read_vec3(record, "position", Vec3::ZERO) {
        let position = reconcile::to_ui_position(position.truncate(), cx.parent_rect);
        if cx.is_override || !position.approx_eq(Vec2::ZERO) {
            fields.insert("position".into(), vec2_value(position));
        }
    }

    // `euler.z` is authoritative; a bare quaternion still carries a Z angle.
    let rotation = read_vec3(record, "euler", Vec3::ZERO)
        .map(|euler| reconcile::ui_rotation(euler.z))
        .or_else(|| read_quat(record, "rotation").map(reconcile::z_angle_degrees));
    if let Some(rotation) = rotation {
        if cx.is_override || !math::approx_eq(rotation, 0.0) {
            fields.insert("rotation".into(), Value::from(rotation));
        }
    }

    if let Some(scale) = read_vec3(record, "scale", Vec3::ONE) {
        let scale = reconcile::ui_scale(scale);
        if cx.is_override || !scale.approx_eq(Vec2::ONE) {
            fields.insert("scale".into(), vec2_value(scale));
        }
    }
}

fn component(value: &Map<String, Value>, key: &str, default: f32) -> f32 {
    value
        .get(key)
        .and_then(Value::as_f64)
        .map_or(default, |v| v as f32)
}

/// Reads a `{x, y}` object. Missing components take `default`'s value.
pub fn read_vec2(value: &Value, default: Vec2) -> Option<Vec2> {
    let object = value.as_object()?;
    Some(Vec2::new(
        component(object, "x", default.x),
        component(object, "y", default.y),
    ))
}

/// Reads a `{x, y, z}` field. Missing components take `default`'s value.
pub fn read_vec3(record: &Record, key: &str, default: Vec3) -> Option<Vec3> {
    let object = record.get(key)?.as_object()?;
    Some(Vec3::new(
        component(object, "x", default.x),
        component(object, "y", default.y),
        component(object, "z", default.z),
    ))
}

/// Reads a `{x, y, z, w}` field. Missing components take the identity's value.
pub fn read_quat(record: &Record, key: &str) -> Option<Quaternion> {
    let object = record.get(key)?.as_object()?;
    let identity = Quaternion::IDENTITY;
    Some(Quaternion::new(
        component(object, "x", identity.x),
        component(object, "y", identity.y),
        component(object, "z", identity.z),
        component(object, "w", identity.w),
    ))
}

/// `{"x", "y"}`
pub fn vec2_value(v: Vec2) -> Value {
    json!({ "x": v.x, "y": v.y })
}

/// `{"x", "y", "z"}`
pub fn vec3_value(v: Vec3) -> Value {
    json!({ "x": v.x, "y": v.y, "z": v.z })
}

/// `{"x", "y", "z", "w"}`
pub fn quat_value(q: Quaternion) -> Value {
    json!({ "x": q.x, "y": q.y, "z": q.z, "w": q.w })
}
