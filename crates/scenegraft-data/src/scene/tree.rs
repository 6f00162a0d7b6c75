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

//! The id-addressed output arena and its document form.

use super::node::Node;
use scenegraft_core::asset::AssetUuid;
use scenegraft_core::{ShortId, TargetId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// The version written to [`SceneDocument::format`].
pub const FORMAT_VERSION: u32 = 1;

/// The output tree of one converted asset.
#[derive(Debug, Clone, Default)]
pub struct SceneTree {
    nodes: HashMap<ShortId, Node>,
    root: Option<ShortId>,
}

impl SceneTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a node, returning its id. A node with the same id is replaced.
    pub fn insert(&mut self, node: Node) -> ShortId {
        let id = node.id;
        if self.nodes.insert(id, node).is_some() {
            log::warn!("Node {id} inserted twice; keeping the latest copy");
        }
        id
    }

    /// Declares the root node.
    pub fn set_root(&mut self, id: ShortId) {
        self.root = Some(id);
    }

    /// The root node id, once set.
    pub fn root(&self) -> Option<ShortId> {
        self.root
    }

    /// Looks up a node.
    pub fn get(&self, id: ShortId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Looks up a node mutably.
    pub fn get_mut(&mut self, id: ShortId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Whether the tree stores `id`.
    pub fn contains(&self, id: ShortId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// The number of stored nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree stores no node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over every stored node in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Finds the override placeholder for `target` among `parent`'s children.
    pub fn find_override_child(&self, parent: ShortId, target: &TargetId) -> Option<ShortId> {
        self.get(parent)?.children.iter().copied().find(|child| {
            self.get(*child)
                .and_then(|node| node.override_marker.as_ref())
                .is_some_and(|marker| marker == target)
        })
    }

    /// Renders the subtree rooted at `id` in the nested output shape.
    ///
    /// Children that are not stored in the tree are skipped.
    pub fn node_to_value(&self, id: ShortId) -> Option<Value> {
        let node = self.get(id)?;
        let mut map = Map::new();
        map.insert("id".into(), json!(node.id));
        map.insert("type".into(), Value::String(node.kind.as_str().to_string()));
        for (key, value) in &node.fields {
            if key != "id" && key != "type" {
                map.insert(key.clone(), value.clone());
            }
        }
        if let Some(link) = &node.prefab_link {
            map.insert("instance".into(), json!(link));
        }
        if let Some(marker) = &node.override_marker {
            map.insert("override".into(), Value::String(marker.to_string()));
        }
        let children: Vec<Value> = node
            .children
            .iter()
            .filter_map(|child| self.node_to_value(*child))
            .collect();
        if !children.is_empty() {
            map.insert("child".into(), Value::Array(children));
        }
        if !node.components.is_empty() {
            let components = node
                .components
                .iter()
                .map(|c| Value::Object(c.to_map()))
                .collect();
            map.insert("comp".into(), Value::Array(components));
        }
        Some(Value::Object(map))
    }

    /// Wraps the whole tree into an output document.
    pub fn to_document(&self, name: &str, source: &AssetUuid) -> SceneDocument {
        SceneDocument {
            format: FORMAT_VERSION,
            name: name.to_string(),
            source: source.clone(),
            root: self
                .root
                .and_then(|root| self.node_to_value(root))
                .unwrap_or(Value::Null),
        }
    }
}

/// A converted asset, ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Output format version.
    pub format: u32,
    /// Display name of the asset.
    pub name: String,
    /// The source asset's uuid.
    pub source: AssetUuid,
    /// The nested root node.
    pub root: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeKind;
    use scenegraft_core::SpaceMode;

    fn tree_with_child() -> SceneTree {
        let mut tree = SceneTree::new();
        let mut child = Node::new(ShortId(2), NodeKind::UIWidget, SpaceMode::TwoD);
        child.set_field("name", json!("child"));
        let mut root = Node::new(ShortId(1), NodeKind::Scene2DRoot, SpaceMode::TwoD);
        root.children.push(ShortId(2));
        tree.insert(child);
        tree.insert(root);
        tree.set_root(ShortId(1));
        tree
    }

    #[test]
    fn empty_children_and_components_are_omitted() {
        let tree = tree_with_child();
        let doc = tree.to_document("menu", &AssetUuid::from("u"));
        assert_eq!(
            doc.root,
            json!({
                "id": 1,
                "type": "Scene2DRoot",
                "child": [{"id": 2, "type": "UIWidget", "name": "child"}]
            })
        );
    }

    #[test]
    fn finds_override_placeholders() {
        let mut tree = tree_with_child();
        let target = TargetId::new(AssetUuid::from("tpl"), "f1");
        tree.get_mut(ShortId(2)).unwrap().override_marker = Some(target.clone());

        assert_eq!(tree.find_override_child(ShortId(1), &target), Some(ShortId(2)));
        let other = TargetId::new(AssetUuid::from("tpl"), "f2");
        assert_eq!(tree.find_override_child(ShortId(1), &other), None);
    }
}
