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

//! Transcoders for the component types the pipeline itself depends on.

use crate::builder::NodeBuilder;
use crate::fields::read_vec2;
use crate::fixup::{FieldHolder, Fixup};
use crate::registry::{Capabilities, ComponentTranscoder, TranscoderRegistry};
use scenegraft_core::math::{RectInfo, Vec2};
use scenegraft_core::DiagnosticKind;
use scenegraft_data::scene::{CanvasData, RectData};
use scenegraft_data::{Component, ComponentData, Node, Record, RecordExt};
use serde_json::Value;

/// Source type name of the UI rect component.
pub const UI_TRANSFORM: &str = "UITransform";
/// Source type name of the canvas component.
pub const CANVAS: &str = "Canvas";

pub(crate) fn register_builtins(registry: &mut TranscoderRegistry) {
    registry.register(UI_TRANSFORM, UiTransformTranscoder);
    registry.register(CANVAS, CanvasTranscoder);
}

fn read_size(value: &Value) -> Option<Vec2> {
    let object = value.as_object()?;
    let axis = |key: &str| object.get(key).and_then(Value::as_f64).unwrap_or(0.0) as f32;
    Some(Vec2::new(axis("width"), axis("height")))
}

/// `UITransform`: content size and anchor point.
#[derive(Debug, Default, Clone, Copy)]
pub struct UiTransformTranscoder;

impl ComponentTranscoder for UiTransformTranscoder {
    fn transcode(
        &self,
        _cx: &mut NodeBuilder<'_>,
        node: &mut Node,
        raw: &Record,
        is_override: bool,
    ) {
        let keep = |v: &Vec2| is_override || !v.approx_eq(Vec2::ZERO);
        let data = RectData {
            size: raw.get("contentSize").and_then(read_size).filter(keep),
            anchor: raw
                .get("anchorPoint")
                .and_then(|v| read_vec2(v, Vec2::ZERO))
                .filter(keep),
        };
        if data.size.is_some() || data.anchor.is_some() {
            node.push_component(Component::new(ComponentData::Rect(data)));
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::UI
    }

    fn rect(&self, raw: &Record) -> Option<RectInfo> {
        Some(RectInfo::new(
            raw.get("contentSize")
                .and_then(read_size)
                .unwrap_or(Vec2::ZERO),
            raw.get("anchorPoint")
                .and_then(|v| read_vec2(v, Vec2::ZERO))
                .unwrap_or(Vec2::ZERO),
        ))
    }
}

/// `Canvas`: marks a UI root and points at the camera node rendering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanvasTranscoder;

impl ComponentTranscoder for CanvasTranscoder {
    fn transcode(
        &self,
        cx: &mut NodeBuilder<'_>,
        node: &mut Node,
        raw: &Record,
        _is_override: bool,
    ) {
        let data = CanvasData {
            camera: None,
            fit_width: raw.bool_field("fitWidth"),
            fit_height: raw.bool_field("fitHeight"),
        };
        let component = Component::new(ComponentData::Canvas(data));
        let kind = component.kind_name().to_string();
        node.push_component(component);

        let Some(camera) = raw.link("cameraComponent") else {
            return;
        };
        match cx.element(camera).and_then(|record| record.link("node")) {
            Some(camera_node) => cx.defer(Fixup::ResolveRef {
                holder: FieldHolder::Component {
                    node: node.id,
                    kind,
                },
                field: "camera".into(),
                source: camera_node,
            }),
            None => cx.report(
                DiagnosticKind::UnresolvedReference,
                format!("canvas camera {camera} has no owning node"),
            ),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CANVAS
    }
}
