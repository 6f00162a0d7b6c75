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

//! The completion pass: replays prefab-instance overrides once every template
//! of the batch has been built and registered.

use crate::builder::{BuildEnv, BuiltAsset, NodeBuilder, ParentCx};
use crate::fields::{map_fields, read_vec2, vec2_value, FieldContext};
use crate::reconcile;
use crate::session::{adopt_template_root, Session, TargetEntry};
use scenegraft_core::math::{RectInfo, Vec2};
use scenegraft_core::asset::AssetUuid;
use scenegraft_core::{DiagnosticKind, ShortId, SpaceMode, TargetId};
use scenegraft_data::graph::TYPE_KEY;
use scenegraft_data::scene::merge_fields;
use scenegraft_data::{Component, Node, Record, RecordExt};
use serde_json::{Map, Value};

/// What an override changes on its target.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideProperty {
    /// Appends an already-built subtree under the target.
    ChildSlot {
        /// The subtree's root.
        subtree: ShortId,
    },
    /// Transcodes a mounted component onto the target.
    ComponentSlot {
        /// The raw component record.
        payload: Record,
    },
    /// Sets one source field, addressed by its key path.
    FieldPath {
        /// Source keys, outermost first.
        path: Vec<String>,
        /// The new value.
        value: Value,
    },
    /// Removes the targeted component.
    RemovedComponent,
}

/// One queued change to template content seen through a prefab instance.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideRecord {
    /// The template content being changed.
    pub target: TargetId,
    /// The change.
    pub property: OverrideProperty,
    /// The instance node in the asset holding the override.
    pub instance_node: ShortId,
    /// The instance node's parent.
    pub instance_parent: Option<ShortId>,
    /// The UI rect of the instance node's parent.
    pub instance_parent_rect: Option<RectInfo>,
}

/// Replays the queued overrides of every asset in `built`, in order.
///
/// Returns the number of assets whose tree was patched. Records whose target
/// cannot be resolved are reported once and skipped.
pub fn apply_overrides(
    session: &mut Session,
    env: BuildEnv<'_>,
    built: &mut [BuiltAsset],
) -> usize {
    log::info!(
        "Applying prefab overrides ({} targets registered)",
        session.targets().len()
    );
    let mut patched = 0;
    for asset in built.iter_mut() {
        let records = std::mem::take(&mut asset.pending);
        let tree = std::mem::take(&mut asset.tree);
        let id_map = std::mem::take(&mut asset.id_map);
        let mut builder = NodeBuilder::resume(
            &mut *session,
            env,
            asset.uuid.clone(),
            &asset.graph,
            tree,
            id_map,
        );
        let mut changed = builder.adopt_template_roots();
        if !records.is_empty() {
            log::debug!("Replaying {} overrides into '{}'", records.len(), asset.name);
            builder.replay(records);
            builder.adopt_template_roots();
            builder.drain_fixups();
            changed = true;
        }
        if changed {
            builder.refresh_scene_kind();
        }
        let (tree, id_map, _) = builder.finish();

        asset.tree = tree;
        asset.id_map = id_map;
        if changed {
            asset.patched = true;
            patched += 1;
        }
    }
    log::info!("Override pass patched {} assets", patched);
    patched
}

impl NodeBuilder<'_> {
    fn replay(&mut self, records: Vec<OverrideRecord>) {
        let mut queue = records;
        while !queue.is_empty() {
            for record in queue {
                self.apply_override(record);
            }
            // Transcoders may have built further instances.
            queue = std::mem::take(&mut self.pending);
        }
    }

    /// Gives every instance node of a UI template the template root's space
    /// and kind. Returns `true` when a node changed.
    fn adopt_template_roots(&mut self) -> bool {
        let instances: Vec<(ShortId, AssetUuid)> = self
            .tree
            .iter()
            .filter_map(|node| Some((node.id, node.prefab_link.clone()?)))
            .collect();
        let mut changed = false;
        for (id, template) in instances {
            let Some(root) = self.session.targets.template_root(&template) else {
                continue;
            };
            let Some(node) = self.tree.get_mut(id) else {
                continue;
            };
            if adopt_template_root(&mut node.space, &mut node.kind, root) {
                log::debug!("Instance {} of '{}' is now {}", id, template, node.kind);
                changed = true;
            }
        }
        changed
    }

    /// Applies a single override record to the tree.
    pub(crate) fn apply_override(&mut self, record: OverrideRecord) {
        let Some(mut entry) = self.session.targets.resolve(&record.target).cloned() else {
            self.report(
                DiagnosticKind::MissingOverrideTarget,
                format!("no template content registered for {}", record.target),
            );
            return;
        };
        // A nested instance shows its own template's root.
        if let Some(root) = entry
            .prefab_link
            .as_ref()
            .and_then(|link| self.session.targets.template_root(link))
        {
            adopt_template_root(&mut entry.space, &mut entry.kind, root);
        }
        let Some(entry_node) = self.locate_entry(&record, &entry) else {
            return;
        };

        let (space, parent_rect) = if entry_node == record.instance_node {
            let space = self
                .tree
                .get(entry_node)
                .map_or(entry.space, |node| node.space);
            (space, record.instance_parent_rect)
        } else {
            (entry.space, entry.parent_rect)
        };

        match record.property {
            OverrideProperty::ChildSlot { subtree } => {
                self.splice_child(entry_node, &entry, subtree)
            }
            OverrideProperty::ComponentSlot { payload } => {
                self.apply_component(entry_node, &entry, &payload)
            }
            OverrideProperty::FieldPath { path, value } => match &entry.component_record {
                Some(component) => {
                    let payload = component_payload(component, &path, value);
                    self.apply_component(entry_node, &entry, &payload);
                }
                None => {
                    let cx = FieldContext {
                        space,
                        parent_rect,
                        is_override: true,
                    };
                    self.apply_field(entry_node, &cx, &path, value);
                }
            },
            OverrideProperty::RemovedComponent => self.remove_component(entry_node, &entry),
        }
    }

    /// The node an override lands on: the instance itself for the template
    /// root, otherwise a placeholder child of the instance.
    fn locate_entry(&mut self, record: &OverrideRecord, entry: &TargetEntry) -> Option<ShortId> {
        if !self.tree.contains(record.instance_node) {
            log::warn!(
                "Instance node {} is gone, dropping override of {}",
                record.instance_node,
                record.target
            );
            return None;
        }
        if record.target.is_direct() && entry.is_template_root() {
            return Some(record.instance_node);
        }

        let marker = placeholder_target(&record.target, entry);
        if let Some(existing) = self.tree.find_override_child(record.instance_node, &marker) {
            return Some(existing);
        }

        let id = self.session.next_id();
        let mut placeholder = Node::new(id, entry.kind.clone(), entry.space);
        if let Some(name) = &entry.name {
            placeholder.set_field("name", Value::from(name.as_str()));
        }
        placeholder.override_marker = Some(marker);
        self.tree.insert(placeholder);
        if let Some(instance) = self.tree.get_mut(record.instance_node) {
            instance.children.push(id);
        }
        log::debug!(
            "Created placeholder {} for {} under instance {}",
            id,
            record.target,
            record.instance_node
        );
        Some(id)
    }

    fn splice_child(&mut self, entry_node: ShortId, entry: &TargetEntry, subtree: ShortId) {
        // Mounted children were laid out without a parent rect.
        if let Some(child) = self.tree.get_mut(subtree) {
            if child.space.is_2d() && entry.rect.is_some() {
                let position = child
                    .field("position")
                    .and_then(|value| read_vec2(value, Vec2::ZERO))
                    .unwrap_or(Vec2::ZERO);
                let moved = reconcile::reanchor(position, None, entry.rect);
                if moved.approx_eq(Vec2::ZERO) {
                    child.fields.remove("position");
                } else {
                    child.set_field("position", vec2_value(moved));
                }
            }
        }
        if let Some(parent) = self.tree.get_mut(entry_node) {
            parent.children.push(subtree);
        }
    }

    fn apply_component(&mut self, entry_node: ShortId, entry: &TargetEntry, payload: &Record) {
        let registry = self.env.registry;
        let type_name = payload.type_name().unwrap_or_default();
        let Some(transcoder) = registry.get(type_name) else {
            self.report(
                DiagnosticKind::UnknownComponentType,
                format!("no transcoder for overridden component type '{type_name}'"),
            );
            return;
        };

        let mut delta = Node::new(entry_node, entry.kind.clone(), entry.space);
        let frame = ParentCx {
            node: Some(entry_node),
            space: entry.space,
            rect: entry.rect,
        };
        self.run_transcoder(frame, transcoder, &mut delta, payload, true);

        let Some(target) = self.tree.get_mut(entry_node) else {
            return;
        };
        merge_fields(&mut target.fields, delta.fields);
        if delta.kind != entry.kind {
            target.kind = delta.kind;
        }
        for component in delta.components {
            target.merge_override_component(component);
        }
        target.children.extend(delta.children);
    }

    fn apply_field(
        &mut self,
        entry_node: ShortId,
        cx: &FieldContext,
        path: &[String],
        value: Value,
    ) {
        let mut fields = map_fields(&nest(path, value), cx);
        narrow_to_axis(&mut fields, cx.space, path);
        if fields.is_empty() {
            log::warn!(
                "Override of '{}' on node {} maps to no output field, dropped",
                path.join("."),
                entry_node
            );
            return;
        }
        if let Some(target) = self.tree.get_mut(entry_node) {
            merge_fields(&mut target.fields, fields);
        }
    }

    fn remove_component(&mut self, entry_node: ShortId, entry: &TargetEntry) {
        let Some(component) = &entry.component_record else {
            log::debug!("Removed-component override addresses a node, ignoring");
            return;
        };
        let type_name = component.type_name().unwrap_or("Component");
        let mut fields = Map::new();
        fields.insert("removed".into(), Value::Bool(true));
        if let Some(target) = self.tree.get_mut(entry_node) {
            target.merge_override_component(Component::opaque(type_name, fields));
        }
    }
}

/// The marker of the placeholder an override lands on. Component targets share
/// the placeholder of their owning node when that node is addressable.
fn placeholder_target(target: &TargetId, entry: &TargetEntry) -> TargetId {
    let mut marker = target.clone();
    if let (Some(owner), Some(last)) = (&entry.node_file_id, marker.path.last_mut()) {
        last.clone_from(owner);
    }
    marker
}

/// `["a", "b"]` and `v` become `{"a": {"b": v}}`.
fn nest(path: &[String], value: Value) -> Record {
    let mut record = Record::new();
    let Some((head, rest)) = path.split_first() else {
        return record;
    };
    let nested = rest.iter().rev().fold(value, |inner, key| {
        let mut map = Map::new();
        map.insert(key.clone(), inner);
        Value::Object(map)
    });
    record.insert(head.clone(), nested);
    record
}

fn component_payload(component: &Record, path: &[String], value: Value) -> Record {
    let mut payload = nest(path, value);
    if let Some(type_name) = component.get(TYPE_KEY) {
        payload.insert(TYPE_KEY.into(), type_name.clone());
    }
    payload
}

/// Keeps only the addressed axis of a single-axis vector override, so earlier
/// overrides of the other axes survive the merge.
fn narrow_to_axis(fields: &mut Map<String, Value>, space: SpaceMode, path: &[String]) {
    let [head, axis] = path else {
        return;
    };
    match space {
        SpaceMode::TwoD => match head.as_str() {
            "position" | "scale" => {
                if let Some(Value::Object(vector)) = fields.get_mut(head.as_str()) {
                    vector.retain(|key, _| key == axis);
                }
            }
            "euler" if axis != "z" => {
                fields.remove("rotation");
            }
            _ => {}
        },
        // One Euler axis alone cannot be turned into a quaternion.
        SpaceMode::ThreeD if head == "euler" => {
            let emptied = match fields.get_mut("transform") {
                Some(Value::Object(transform)) => {
                    transform.remove("rotation");
                    transform.is_empty()
                }
                _ => false,
            };
            if emptied {
                fields.remove("transform");
            }
        }
        SpaceMode::ThreeD => {
            if let Some(Value::Object(vector)) = fields
                .get_mut("transform")
                .and_then(|transform| transform.get_mut(head.as_str()))
            {
                vector.retain(|key, _| key == axis);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nest_builds_objects_outward() {
        let path = vec!["position".to_string(), "x".to_string()];
        assert_eq!(
            Value::Object(nest(&path, json!(4))),
            json!({"position": {"x": 4}})
        );
        assert!(nest(&[], json!(1)).is_empty());
    }

    #[test]
    fn component_payload_carries_the_type() {
        let component = json!({"type": "Label", "string": "old"});
        let payload = component_payload(
            component.as_object().unwrap(),
            &["string".to_string()],
            json!("new"),
        );
        assert_eq!(payload.type_name(), Some("Label"));
        assert_eq!(payload["string"], json!("new"));
    }

    #[test]
    fn single_axis_paths_keep_one_axis() {
        let mut fields = json!({"position": {"x": 1.0, "y": 0.0}})
            .as_object()
            .cloned()
            .unwrap();
        let path = ["position".to_string(), "x".to_string()];
        narrow_to_axis(&mut fields, SpaceMode::TwoD, &path);
        assert_eq!(fields["position"], json!({"x": 1.0}));

        let mut spatial = json!({"transform": {"scale": {"x": 2.0, "y": 1.0, "z": 1.0}}})
            .as_object()
            .cloned()
            .unwrap();
        let path = ["scale".to_string(), "x".to_string()];
        narrow_to_axis(&mut spatial, SpaceMode::ThreeD, &path);
        assert_eq!(spatial["transform"]["scale"], json!({"x": 2.0}));
    }

    #[test]
    fn a_single_spatial_euler_axis_is_dropped() {
        let rotation = json!({"x": 0.0, "y": 0.7, "z": 0.0, "w": 0.7});
        let mut spatial = json!({"transform": {"rotation": rotation}})
            .as_object()
            .cloned()
            .unwrap();
        let path = ["euler".to_string(), "y".to_string()];
        narrow_to_axis(&mut spatial, SpaceMode::ThreeD, &path);
        assert!(spatial.is_empty());
    }
}
