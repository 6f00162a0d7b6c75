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

//! Output nodes and their contextual kind.

use super::component::Component;
use scenegraft_core::asset::AssetUuid;
use scenegraft_core::{ShortId, SpaceMode, TargetId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The output type of a node.
///
/// A node starts as [`NodeKind::UIWidget`], [`NodeKind::Spatial3D`] or
/// [`NodeKind::Scene2DRoot`] depending on its space, and transcoders may
/// rewrite it afterwards. Kinds this crate does not name survive as
/// [`NodeKind::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// A plain UI node.
    UIWidget,
    /// A plain 3D node.
    Spatial3D,
    /// The root of a scene that holds 2D content.
    Scene2DRoot,
    /// A textured UI node.
    Image,
    /// A styled, clipping UI container.
    Panel,
    /// A clickable UI node.
    Button,
    /// A text UI node.
    Label,
    /// Any other output type.
    Custom(String),
}

impl NodeKind {
    /// The initial kind of a regular node in `space`.
    pub fn for_space(space: SpaceMode) -> Self {
        match space {
            SpaceMode::TwoD => NodeKind::UIWidget,
            SpaceMode::ThreeD => NodeKind::Spatial3D,
        }
    }

    /// The output type name.
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::UIWidget => "UIWidget",
            NodeKind::Spatial3D => "Spatial3D",
            NodeKind::Scene2DRoot => "Scene2DRoot",
            NodeKind::Image => "Image",
            NodeKind::Panel => "Panel",
            NodeKind::Button => "Button",
            NodeKind::Label => "Label",
            NodeKind::Custom(name) => name,
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "UIWidget" => NodeKind::UIWidget,
            "Spatial3D" => NodeKind::Spatial3D,
            "Scene2DRoot" => NodeKind::Scene2DRoot,
            "Image" => NodeKind::Image,
            "Panel" => NodeKind::Panel,
            "Button" => NodeKind::Button,
            "Label" => NodeKind::Label,
            _ => NodeKind::Custom(value),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the output tree.
///
/// Children are referenced by id and live in the same [`super::SceneTree`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Batch-unique id.
    pub id: ShortId,
    /// Output type.
    pub kind: NodeKind,
    /// The space convention the node's fields were mapped in. Not serialized.
    pub space: SpaceMode,
    /// Mapped primitive fields (`name`, `position`, `transform`, ...).
    pub fields: Map<String, Value>,
    /// Child ids, in output order.
    pub children: Vec<ShortId>,
    /// Attached components.
    pub components: Vec<Component>,
    /// The template asset this node instantiates.
    pub prefab_link: Option<AssetUuid>,
    /// Set on override placeholders: the template content they patch.
    pub override_marker: Option<TargetId>,
}

impl Node {
    /// Creates an empty node.
    pub fn new(id: ShortId, kind: NodeKind, space: SpaceMode) -> Self {
        Self {
            id,
            kind,
            space,
            fields: Map::new(),
            children: Vec::new(),
            components: Vec::new(),
            prefab_link: None,
            override_marker: None,
        }
    }

    /// The node's `name` field.
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// Reads a mapped field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Writes a mapped field.
    pub fn set_field(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Attaches a regular component.
    pub fn push_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// The first component of output kind `kind`, preferring override deltas.
    pub fn component_mut(&mut self, kind: &str) -> Option<&mut Component> {
        let index = self
            .components
            .iter()
            .position(|c| c.is_override() && c.kind_name() == kind)
            .or_else(|| self.components.iter().position(|c| c.kind_name() == kind))?;
        self.components.get_mut(index)
    }

    /// Merges `delta` into the override-tagged component of the same kind,
    /// creating it when the node has none yet.
    pub fn merge_override_component(&mut self, mut delta: Component) {
        let kind = delta.kind_name().to_string();
        match self
            .components
            .iter_mut()
            .find(|c| c.is_override() && c.kind_name() == kind)
        {
            Some(existing) => existing.merge_from(&delta),
            None => {
                delta.override_marker = Some(kind);
                self.components.push(delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ComponentData, TextData};

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in [NodeKind::UIWidget, NodeKind::Scene2DRoot, NodeKind::Button] {
            assert_eq!(NodeKind::from(String::from(kind.clone())), kind);
        }
        assert_eq!(
            NodeKind::from("ScrollContainer".to_string()),
            NodeKind::Custom("ScrollContainer".into())
        );
    }

    #[test]
    fn override_components_are_created_once_then_merged() {
        let mut node = Node::new(ShortId(1), NodeKind::Label, SpaceMode::TwoD);
        node.push_component(Component::new(ComponentData::Text(TextData {
            text: Some("base".into()),
            ..Default::default()
        })));

        for text in ["first", "second"] {
            node.merge_override_component(Component::new(ComponentData::Text(TextData {
                text: Some(text.into()),
                ..Default::default()
            })));
        }

        assert_eq!(node.components.len(), 2);
        let delta = node.component_mut("Text").unwrap();
        assert!(delta.is_override());
        match &delta.data {
            ComponentData::Text(text) => assert_eq!(text.text.as_deref(), Some("second")),
            other => panic!("expected text, got {other:?}"),
        }
    }
}
