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

//! The Node Builder: walks one source graph into an output [`SceneTree`].

use crate::fields::{map_fields, vec2_value, FieldContext};
use crate::fixup::{FieldHolder, Fixup};
use crate::overrides::{OverrideProperty, OverrideRecord};
use crate::reconcile;
use crate::registry::{Capabilities, ComponentTranscoder, TranscoderRegistry};
use crate::session::{Session, TargetEntry};
use scenegraft_core::asset::{AssetResolver, AssetUuid};
use scenegraft_core::math::{RectInfo, Vec2};
use scenegraft_core::{
    ConversionError, DiagnosticKind, ReferenceId, ShortId, SpaceMode, TargetId,
};
use scenegraft_data::graph::uuid_link;
use scenegraft_data::{
    ElementGraph, Node, NodeKind, Record, RecordExt, SceneDocument, SceneTree, SourceAsset,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};

const SCENE_TYPE: &str = "Scene";

/// The read-only collaborators of a batch.
#[derive(Clone, Copy)]
pub struct BuildEnv<'a> {
    /// Component transcoders by source type name.
    pub registry: &'a TranscoderRegistry,
    /// Resolves and remaps cross-asset links.
    pub resolver: &'a dyn AssetResolver,
}

impl<'a> BuildEnv<'a> {
    /// Bundles a registry and a resolver.
    pub fn new(registry: &'a TranscoderRegistry, resolver: &'a dyn AssetResolver) -> Self {
        Self { registry, resolver }
    }
}

/// The parent a node is being built under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentCx {
    /// The parent's output id. `None` for a root.
    pub node: Option<ShortId>,
    /// The parent's space convention.
    pub space: SpaceMode,
    /// The parent's UI rect.
    pub rect: Option<RectInfo>,
}

impl ParentCx {
    /// The context of a root: no parent, 3D, no rect.
    pub const DETACHED: ParentCx = ParentCx {
        node: None,
        space: SpaceMode::ThreeD,
        rect: None,
    };
}

/// The result of the build phase for one asset.
#[derive(Debug)]
pub struct BuiltAsset {
    /// The source asset's uuid.
    pub uuid: AssetUuid,
    /// The output document name.
    pub name: String,
    /// The source graph, kept for the completion pass.
    pub graph: ElementGraph,
    /// The output tree.
    pub tree: SceneTree,
    /// Source element to output node.
    pub id_map: HashMap<ReferenceId, ShortId>,
    /// Overrides waiting for the completion pass.
    pub pending: Vec<OverrideRecord>,
    /// Set once the completion pass has modified the tree.
    pub patched: bool,
}

impl BuiltAsset {
    /// Renders the tree as an output document.
    pub fn to_document(&self) -> SceneDocument {
        self.tree.to_document(&self.name, &self.uuid)
    }
}

struct ResolvedComponent<'a> {
    record: &'a Record,
    transcoder: &'a dyn ComponentTranscoder,
    capabilities: Capabilities,
    file_id: Option<&'a str>,
}

/// Per-asset conversion state, borrowing the batch [`Session`].
///
/// Transcoders receive the builder to build children, queue fixups and report
/// diagnostics against the asset being converted.
pub struct NodeBuilder<'a> {
    pub(crate) session: &'a mut Session,
    pub(crate) env: BuildEnv<'a>,
    pub(crate) asset: AssetUuid,
    pub(crate) graph: &'a ElementGraph,
    pub(crate) tree: SceneTree,
    pub(crate) id_map: HashMap<ReferenceId, ShortId>,
    pub(crate) pending: Vec<OverrideRecord>,
    fixups: Vec<Fixup>,
    removed: HashSet<ReferenceId>,
    frame: ParentCx,
}

impl<'a> NodeBuilder<'a> {
    /// Starts converting `graph`, owned by `asset`, into an empty tree.
    pub fn new(
        session: &'a mut Session,
        env: BuildEnv<'a>,
        asset: AssetUuid,
        graph: &'a ElementGraph,
    ) -> Self {
        Self::resume(session, env, asset, graph, SceneTree::new(), HashMap::new())
    }

    /// Continues working on an already-built tree.
    pub(crate) fn resume(
        session: &'a mut Session,
        env: BuildEnv<'a>,
        asset: AssetUuid,
        graph: &'a ElementGraph,
        tree: SceneTree,
        id_map: HashMap<ReferenceId, ShortId>,
    ) -> Self {
        Self {
            session,
            env,
            asset,
            graph,
            tree,
            id_map,
            pending: Vec::new(),
            fixups: Vec::new(),
            removed: HashSet::new(),
            frame: ParentCx::DETACHED,
        }
    }

    /// The asset being converted.
    pub fn asset(&self) -> &AssetUuid {
        &self.asset
    }

    /// The source graph being converted.
    pub fn graph(&self) -> &'a ElementGraph {
        self.graph
    }

    /// A source record of the current asset.
    pub fn element(&self, id: ReferenceId) -> Option<&'a Record> {
        self.graph.get(id)
    }

    /// The output tree built so far.
    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// The context of the node whose components are being transcoded.
    pub fn frame(&self) -> ParentCx {
        self.frame
    }

    /// Builds the content root and drains the fixups queued along the way.
    pub fn build_root(&mut self) -> Result<ShortId, ConversionError> {
        let label = self.asset.to_string();
        self.graph.root(&label)?;
        let root = self
            .build_node(ParentCx::DETACHED, ReferenceId::ROOT)
            .ok_or_else(|| ConversionError::malformed(label, "content root could not be built"))?;
        self.tree.set_root(root);
        self.drain_fixups();
        Ok(root)
    }

    /// Builds `element` and its subtree under `parent`.
    ///
    /// Every call allocates a fresh id, so an element reached twice yields two
    /// distinct output nodes. Returns `None` when the element is not a record.
    pub fn build_node(&mut self, parent: ParentCx, element: ReferenceId) -> Option<ShortId> {
        let graph = self.graph;
        let Some(record) = graph.get(element) else {
            self.report(
                DiagnosticKind::UnresolvedReference,
                format!("element {element} is missing or not a record"),
            );
            return None;
        };
        let id = self.session.next_id();
        self.id_map.insert(element, id);

        let prefab = record.link("prefab").and_then(|info| graph.get(info));
        if let Some((info, instance)) = prefab.and_then(|info| Some((info, info.link("instance")?)))
        {
            self.build_instance(parent, id, info, instance);
            return Some(id);
        }
        let file_id = prefab.and_then(|info| info.str_field("fileId"));

        let components = self.resolve_components(record);
        let is_scene = record.type_name() == Some(SCENE_TYPE);
        let owns_ui = components
            .iter()
            .any(|c| c.capabilities.ui || c.capabilities.canvas);
        let space = if !is_scene && (parent.space.is_2d() || owns_ui) {
            SpaceMode::TwoD
        } else {
            SpaceMode::ThreeD
        };
        let rect = if space.is_2d() {
            components
                .iter()
                .filter(|c| c.capabilities.ui)
                .find_map(|c| c.transcoder.rect(c.record))
        } else {
            None
        };

        let mut node = Node::new(id, NodeKind::for_space(space), space);
        if is_scene {
            if let Some(name) = record.str_field("name") {
                node.set_field("name", Value::from(name));
            }
        } else {
            node.fields = map_fields(
                record,
                &FieldContext {
                    space,
                    parent_rect: parent.rect,
                    is_override: false,
                },
            );
            // Unpositioned UI nodes sit on the parent's anchor.
            if space.is_2d() && !record.contains_key("position") {
                let offset = reconcile::to_ui_position(Vec2::ZERO, parent.rect);
                if !offset.approx_eq(Vec2::ZERO) {
                    node.set_field("position", vec2_value(offset));
                }
            }
        }

        let frame = ParentCx {
            node: Some(id),
            space,
            rect,
        };
        let (visual, regular): (Vec<_>, Vec<_>) =
            components.iter().partition(|c| c.capabilities.visual);
        for component in regular.iter().chain(&visual) {
            self.run_transcoder(frame, component.transcoder, &mut node, component.record, false);
        }

        for child in record.links("children") {
            if self.removed.contains(&child) {
                log::debug!("Skipping removed element {} under node {}", child, id);
                continue;
            }
            if let Some(child_id) = self.build_node(frame, child) {
                node.children.push(child_id);
            }
        }

        if is_scene {
            node.kind = self.scene_kind(&node.children);
        }

        if let Some(file_id) = file_id {
            let entry = self.snapshot(&node, parent, rect, Some(file_id));
            self.session.targets.register(file_id, entry);
        }
        if parent.node.is_none() {
            let entry = self.snapshot(&node, parent, rect, file_id);
            self.session.targets.register_root(entry);
        }
        for component in &components {
            if let Some(component_file_id) = component.file_id {
                let mut entry = self.snapshot(&node, parent, rect, file_id);
                entry.component_record = Some(component.record.clone());
                self.session.targets.register(component_file_id, entry);
            }
        }

        log::debug!("Built node {} ({}) from element {}", id, node.kind, element);
        self.tree.insert(node);
        Some(id)
    }

    /// Builds `element` as a child of `parent`, the node being transcoded.
    pub fn build_child(&mut self, parent: &mut Node, element: ReferenceId) -> Option<ShortId> {
        let cx = ParentCx {
            node: Some(parent.id),
            ..self.frame
        };
        let id = self.build_node(cx, element)?;
        parent.children.push(id);
        Some(id)
    }

    /// Excludes `element` from the children walk of the current asset.
    pub fn mark_removed(&mut self, element: ReferenceId) {
        self.removed.insert(element);
    }

    /// Queues a fixup, applied once the whole asset has been walked.
    pub fn defer(&mut self, fixup: Fixup) {
        self.fixups.push(fixup);
    }

    /// Resolves a `{"uuid"}` link to another asset through the remap table.
    ///
    /// An unknown asset is reported and yields `None`.
    pub fn asset_link(&mut self, link: &Value) -> Option<Value> {
        let uuid = uuid_link(link)?;
        let remapped = self.env.resolver.remap_uuid(&uuid);
        if self.env.resolver.resolve(&remapped).is_none() {
            self.report(
                DiagnosticKind::UnresolvedReference,
                format!("asset {remapped} is not known"),
            );
            return None;
        }
        Some(json!({ "uuid": remapped }))
    }

    /// Records a diagnostic against the current asset.
    pub fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.session.report(kind, &self.asset, message);
    }

    /// Releases the tree, the id map and any overrides queued for later.
    pub fn finish(
        self,
    ) -> (
        SceneTree,
        HashMap<ReferenceId, ShortId>,
        Vec<OverrideRecord>,
    ) {
        (self.tree, self.id_map, self.pending)
    }

    pub(crate) fn run_transcoder(
        &mut self,
        frame: ParentCx,
        transcoder: &dyn ComponentTranscoder,
        node: &mut Node,
        raw: &Record,
        is_override: bool,
    ) {
        let outer = std::mem::replace(&mut self.frame, frame);
        transcoder.transcode(self, node, raw, is_override);
        self.frame = outer;
    }

    /// `Scene2DRoot` when any of a scene's direct children is 2D.
    fn scene_kind(&self, children: &[ShortId]) -> NodeKind {
        let holds_ui = children
            .iter()
            .filter_map(|child| self.tree.get(*child))
            .any(|child| child.space.is_2d());
        if holds_ui {
            NodeKind::Scene2DRoot
        } else {
            NodeKind::Spatial3D
        }
    }

    /// Re-derives the scene root's kind from its children as they are now.
    pub(crate) fn refresh_scene_kind(&mut self) {
        let is_scene = self
            .graph
            .get(ReferenceId::ROOT)
            .and_then(|record| record.type_name())
            == Some(SCENE_TYPE);
        let Some(root) = self.tree.root().filter(|_| is_scene) else {
            return;
        };
        let children = match self.tree.get(root) {
            Some(node) => node.children.clone(),
            None => return,
        };
        let kind = self.scene_kind(&children);
        if let Some(node) = self.tree.get_mut(root) {
            node.kind = kind;
        }
    }

    pub(crate) fn drain_fixups(&mut self) {
        for fixup in std::mem::take(&mut self.fixups) {
            let Fixup::ResolveRef {
                holder,
                field,
                source,
            } = fixup;
            let Some(target) = self.id_map.get(&source).copied() else {
                self.report(
                    DiagnosticKind::UnresolvedReference,
                    format!("'{field}' points at element {source}, which produced no node"),
                );
                continue;
            };
            let value = json!({ "ref": target });
            let written = match &holder {
                FieldHolder::Node(node) => self
                    .tree
                    .get_mut(*node)
                    .map(|node| node.set_field(field.as_str(), value)),
                FieldHolder::Component { node, kind } => self
                    .tree
                    .get_mut(*node)
                    .and_then(|node| node.component_mut(kind))
                    .map(|component| component.set_field(&field, value)),
            };
            if written.is_none() {
                log::debug!("Fixup holder {:?} disappeared, dropping '{}'", holder, field);
            }
        }
    }

    fn resolve_components(&mut self, record: &'a Record) -> Vec<ResolvedComponent<'a>> {
        let graph = self.graph;
        let registry = self.env.registry;
        let mut resolved = Vec::new();
        for element in record.links("components") {
            if self.removed.contains(&element) {
                continue;
            }
            let Some(component) = graph.get(element) else {
                self.report(
                    DiagnosticKind::UnresolvedReference,
                    format!("component {element} is missing or not a record"),
                );
                continue;
            };
            let type_name = component.type_name().unwrap_or_default();
            let Some(transcoder) = registry.get(type_name) else {
                self.report(
                    DiagnosticKind::UnknownComponentType,
                    format!("no transcoder for component type '{type_name}' ({element})"),
                );
                continue;
            };
            let file_id = component
                .link("prefab")
                .and_then(|info| graph.get(info))
                .and_then(|info| info.str_field("fileId"));
            resolved.push(ResolvedComponent {
                record: component,
                transcoder,
                capabilities: transcoder.capabilities(),
                file_id,
            });
        }
        resolved
    }

    fn snapshot(
        &self,
        node: &Node,
        parent: ParentCx,
        rect: Option<RectInfo>,
        node_file_id: Option<&str>,
    ) -> TargetEntry {
        TargetEntry {
            asset: self.asset.clone(),
            node: node.id,
            parent: parent.node,
            node_file_id: node_file_id.map(str::to_string),
            component_record: None,
            kind: node.kind.clone(),
            name: node.name().map(str::to_string),
            space: node.space,
            rect,
            parent_rect: parent.rect,
            prefab_link: node.prefab_link.clone(),
        }
    }

    fn build_instance(
        &mut self,
        parent: ParentCx,
        id: ShortId,
        info: &'a Record,
        instance: ReferenceId,
    ) {
        let mut node = Node::new(id, NodeKind::for_space(parent.space), parent.space);
        let Some(template) = self.template_link(info) else {
            self.tree.insert(node);
            return;
        };
        node.prefab_link = Some(template.clone());

        let graph = self.graph;
        let instance_record = graph.get(instance);
        // Nested instances are addressed by the instance's own fileId.
        let file_id = instance_record
            .and_then(|r| r.str_field("fileId"))
            .or_else(|| info.str_field("fileId"));
        if let Some(file_id) = file_id {
            let entry = self.snapshot(&node, parent, None, Some(file_id));
            self.session.targets.register(file_id, entry);
        }
        if parent.node.is_none() {
            let entry = self.snapshot(&node, parent, None, file_id);
            self.session.targets.register_root(entry);
        }

        match instance_record {
            Some(record) => self.queue_instance(parent, id, &template, record),
            None => self.report(
                DiagnosticKind::UnresolvedReference,
                format!("prefab instance {instance} of node {id} is missing"),
            ),
        }
        log::debug!("Built instance node {} of template {}", id, template);
        self.tree.insert(node);
    }

    fn template_link(&mut self, info: &Record) -> Option<AssetUuid> {
        let Some(uuid) = info.get("asset").and_then(uuid_link) else {
            self.report(
                DiagnosticKind::UnresolvedReference,
                "prefab instance has no template asset link",
            );
            return None;
        };
        let remapped = self.env.resolver.remap_uuid(&uuid);
        if self.env.resolver.resolve(&remapped).is_none() {
            self.report(
                DiagnosticKind::UnresolvedReference,
                format!("template asset {remapped} is not known, its overrides are skipped"),
            );
            return None;
        }
        Some(remapped)
    }

    fn queue_instance(
        &mut self,
        parent: ParentCx,
        instance_node: ShortId,
        template: &AssetUuid,
        instance: &'a Record,
    ) {
        let frame = ParentCx {
            node: Some(instance_node),
            space: parent.space,
            rect: None,
        };
        let enqueue = move |target: TargetId, property: OverrideProperty| OverrideRecord {
            target,
            property,
            instance_node,
            instance_parent: parent.node,
            instance_parent_rect: parent.rect,
        };

        for element in instance.links("propertyOverrides") {
            let Some(record) = self.lookup(element) else { continue };
            let Some(target) = self.target_of(template, record) else { continue };
            let path = record.strings("propertyPath");
            if path.is_empty() {
                log::debug!("Property override {} has an empty path", element);
                continue;
            }
            let value = record.get("value").cloned().unwrap_or(Value::Null);
            self.pending
                .push(enqueue(target, OverrideProperty::FieldPath { path, value }));
        }

        for element in instance.links("mountedChildren") {
            let Some(record) = self.lookup(element) else { continue };
            let Some(target) = self.target_of(template, record) else { continue };
            for child in record.links("nodes") {
                if let Some(subtree) = self.build_node(frame, child) {
                    self.pending.push(enqueue(
                        target.clone(),
                        OverrideProperty::ChildSlot { subtree },
                    ));
                }
            }
        }

        for element in instance.links("mountedComponents") {
            let Some(record) = self.lookup(element) else { continue };
            let Some(target) = self.target_of(template, record) else { continue };
            for component in record.links("components") {
                let Some(payload) = self.lookup(component) else { continue };
                match payload.type_name() {
                    Some(type_name) if self.env.registry.contains(type_name) => {
                        self.pending.push(enqueue(
                            target.clone(),
                            OverrideProperty::ComponentSlot {
                                payload: payload.clone(),
                            },
                        ));
                    }
                    other => self.report(
                        DiagnosticKind::UnknownComponentType,
                        format!(
                            "mounted component type '{}' has no transcoder",
                            other.unwrap_or_default()
                        ),
                    ),
                }
            }
        }

        for element in instance.links("removedComponents") {
            let Some(info) = self.lookup(element) else { continue };
            match TargetId::from_path(template.clone(), info.strings("localID")) {
                Some(target) => self
                    .pending
                    .push(enqueue(target, OverrideProperty::RemovedComponent)),
                None => self.report(
                    DiagnosticKind::UnresolvedReference,
                    format!("removed component {element} has an empty localID"),
                ),
            }
        }
    }

    fn lookup(&mut self, element: ReferenceId) -> Option<&'a Record> {
        let graph = self.graph;
        let record = graph.get(element);
        if record.is_none() {
            self.report(
                DiagnosticKind::UnresolvedReference,
                format!("override record {element} is missing or not a record"),
            );
        }
        record
    }

    fn target_of(&mut self, template: &AssetUuid, record: &Record) -> Option<TargetId> {
        let graph = self.graph;
        let target = record
            .link("targetInfo")
            .and_then(|info| graph.get(info))
            .and_then(|info| TargetId::from_path(template.clone(), info.strings("localID")));
        if target.is_none() {
            self.report(
                DiagnosticKind::UnresolvedReference,
                "override has no usable targetInfo",
            );
        }
        target
    }
}

/// The build phase for one asset.
///
/// # Errors
/// Returns [`ConversionError::MalformedGraph`] when the graph has no usable
/// content root. Everything else is reported as a diagnostic on `session`.
pub fn build_asset(
    session: &mut Session,
    env: BuildEnv<'_>,
    source: SourceAsset,
) -> Result<BuiltAsset, ConversionError> {
    let SourceAsset { uuid, name, graph } = source;
    let (tree, id_map, pending) = {
        let mut builder = NodeBuilder::new(session, env, uuid.clone(), &graph);
        builder.build_root()?;
        builder.finish()
    };
    log::debug!(
        "Built '{}': {} nodes, {} overrides pending",
        name,
        tree.len(),
        pending.len()
    );
    Ok(BuiltAsset {
        uuid,
        name,
        graph,
        tree,
        id_map,
        pending,
        patched: false,
    })
}
