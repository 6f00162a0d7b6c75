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

//! Output components.
//!
//! Every output component kind the converter knows about is a closed variant of
//! [`ComponentData`] with optional fields, so the same type carries both a full
//! component and a partial override delta. Anything else is kept verbatim in
//! [`ComponentData::Opaque`].

use super::merge::merge_fields;
use scenegraft_core::math::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The key marking a component as an override delta.
pub const OVERRIDE_KEY: &str = "override";

/// UI rect geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RectData {
    /// Width and height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec2>,
    /// Normalized anchor point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Vec2>,
}

/// Marks the root of a UI canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasData {
    /// The camera node rendering the canvas, as `{"ref": id}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Value>,
    /// Scale to fit the design width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_width: Option<bool>,
    /// Scale to fit the design height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_height: Option<bool>,
}

/// A textured or tinted visual.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualData {
    /// The texture resource, as `{"uuid": ...}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<Value>,
    /// Modulation color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    /// How the visual is stretched to the node's rect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_mode: Option<String>,
}

/// A text run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    /// The displayed string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Font size in points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// Font color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
}

/// A user script and its exported properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptData {
    /// The script class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Exported properties, written alongside the class.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// The payload of an output component.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentData {
    /// UI rect geometry.
    Rect(RectData),
    /// Canvas root marker.
    Canvas(CanvasData),
    /// Texture / tint.
    Visual(VisualData),
    /// Text.
    Text(TextData),
    /// User script.
    Script(ScriptData),
    /// A component kind with no typed representation, preserved as written.
    Opaque {
        /// The output type name.
        type_name: String,
        /// Every other field.
        fields: Map<String, Value>,
    },
}

// Serde view of the typed variants.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
enum Typed {
    Rect(RectData),
    Canvas(CanvasData),
    Visual(VisualData),
    Text(TextData),
    Script(ScriptData),
}

const TYPED_KINDS: [&str; 5] = ["Rect", "Canvas", "Visual", "Text", "Script"];

impl ComponentData {
    /// The output type name.
    pub fn kind_name(&self) -> &str {
        match self {
            ComponentData::Rect(_) => "Rect",
            ComponentData::Canvas(_) => "Canvas",
            ComponentData::Visual(_) => "Visual",
            ComponentData::Text(_) => "Text",
            ComponentData::Script(_) => "Script",
            ComponentData::Opaque { type_name, .. } => type_name,
        }
    }

    fn to_typed(&self) -> Option<Typed> {
        Some(match self {
            ComponentData::Rect(d) => Typed::Rect(d.clone()),
            ComponentData::Canvas(d) => Typed::Canvas(d.clone()),
            ComponentData::Visual(d) => Typed::Visual(d.clone()),
            ComponentData::Text(d) => Typed::Text(d.clone()),
            ComponentData::Script(d) => Typed::Script(d.clone()),
            ComponentData::Opaque { .. } => return None,
        })
    }
}

impl From<Typed> for ComponentData {
    fn from(typed: Typed) -> Self {
        match typed {
            Typed::Rect(d) => ComponentData::Rect(d),
            Typed::Canvas(d) => ComponentData::Canvas(d),
            Typed::Visual(d) => ComponentData::Visual(d),
            Typed::Text(d) => ComponentData::Text(d),
            Typed::Script(d) => ComponentData::Script(d),
        }
    }
}

/// A component attached to an output node.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// The component payload.
    pub data: ComponentData,
    /// Set on override deltas; carries the component kind being overridden.
    pub override_marker: Option<String>,
}

impl Component {
    /// Wraps a payload as a regular (non-override) component.
    pub fn new(data: ComponentData) -> Self {
        Self {
            data,
            override_marker: None,
        }
    }

    /// Builds an opaque component from a type name and fields.
    pub fn opaque(type_name: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self::new(ComponentData::Opaque {
            type_name: type_name.into(),
            fields,
        })
    }

    /// The output type name.
    pub fn kind_name(&self) -> &str {
        self.data.kind_name()
    }

    /// Whether this component is an override delta.
    pub fn is_override(&self) -> bool {
        self.override_marker.is_some()
    }

    /// Flattens the component into its output JSON object.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = match self.data.to_typed().map(serde_json::to_value) {
            Some(Ok(Value::Object(map))) => map,
            _ => {
                let mut map = Map::new();
                map.insert("type".into(), Value::String(self.kind_name().to_string()));
                if let ComponentData::Opaque { fields, .. } = &self.data {
                    map.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                map
            }
        };
        if let Some(marker) = &self.override_marker {
            map.insert(OVERRIDE_KEY.into(), Value::String(marker.clone()));
        }
        map
    }

    /// Rebuilds a component from its output JSON object.
    ///
    /// Known kinds that fail to decode fall back to [`ComponentData::Opaque`] so
    /// nothing is lost.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let override_marker = match map.remove(OVERRIDE_KEY) {
            Some(Value::String(marker)) => Some(marker),
            _ => None,
        };
        let type_name = map
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let typed = if TYPED_KINDS.contains(&type_name.as_str()) {
            serde_json::from_value::<Typed>(Value::Object(map.clone())).ok()
        } else {
            None
        };
        let data = match typed {
            Some(typed) => typed.into(),
            None => {
                map.remove("type");
                ComponentData::Opaque {
                    type_name,
                    fields: map,
                }
            }
        };
        Self {
            data,
            override_marker,
        }
    }

    /// Sets a single output field, keeping the override marker.
    pub fn set_field(&mut self, key: &str, value: Value) {
        let mut map = self.to_map();
        map.insert(key.to_string(), value);
        *self = Self::from_map(map);
    }

    /// Merges another component of the same kind into this one, last write wins.
    pub fn merge_from(&mut self, other: &Component) {
        let mut map = self.to_map();
        let mut incoming = other.to_map();
        incoming.remove(OVERRIDE_KEY);
        merge_fields(&mut map, incoming);
        *self = Self::from_map(map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_component_serializes_with_type_tag() {
        let component = Component::new(ComponentData::Text(TextData {
            text: Some("Play".into()),
            font_size: Some(24.0),
            color: None,
        }));
        assert_eq!(
            Value::Object(component.to_map()),
            json!({"type": "Text", "text": "Play", "font_size": 24.0})
        );
    }

    #[test]
    fn unknown_kind_is_preserved_verbatim() {
        let map = json!({"type": "ParticleEmitter", "rate": 30, "loop": true})
            .as_object()
            .cloned()
            .unwrap();
        let component = Component::from_map(map.clone());
        assert_eq!(component.kind_name(), "ParticleEmitter");
        assert!(matches!(component.data, ComponentData::Opaque { .. }));
        assert_eq!(component.to_map(), map);
    }

    #[test]
    fn override_delta_merges_field_by_field() {
        let mut base = Component::new(ComponentData::Text(TextData {
            text: Some("Play".into()),
            ..Default::default()
        }));
        base.override_marker = Some("Text".into());

        let delta = Component::new(ComponentData::Text(TextData {
            font_size: Some(32.0),
            ..Default::default()
        }));
        base.merge_from(&delta);

        assert_eq!(base.override_marker.as_deref(), Some("Text"));
        match &base.data {
            ComponentData::Text(text) => {
                assert_eq!(text.text.as_deref(), Some("Play"));
                assert_eq!(text.font_size, Some(32.0));
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn script_properties_flatten() {
        let map = json!({"type": "Script", "class": "Spinner", "speed": 3})
            .as_object()
            .cloned()
            .unwrap();
        let component = Component::from_map(map.clone());
        match &component.data {
            ComponentData::Script(script) => {
                assert_eq!(script.class.as_deref(), Some("Spinner"));
                assert_eq!(script.properties.get("speed"), Some(&json!(3)));
            }
            other => panic!("expected script, got {other:?}"),
        }
        assert_eq!(component.to_map(), map);
    }
}
