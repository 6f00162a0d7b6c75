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

//! Batch-scoped state shared by every asset of a conversion run.

use scenegraft_core::asset::AssetUuid;
use scenegraft_core::math::RectInfo;
use scenegraft_core::{
    DiagnosticKind, Diagnostics, IdAllocator, SequentialIds, ShortId, SpaceMode, TargetId,
};
use scenegraft_data::{NodeKind, Record};
use std::collections::{HashMap, HashSet};

/// What the completion pass knows about one piece of template content.
///
/// Entries are snapshots taken when the template was built, so the completion
/// pass never reads another asset's tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEntry {
    /// The template asset owning the content.
    pub asset: AssetUuid,
    /// The template node (the owner, for component targets).
    pub node: ShortId,
    /// The template node's parent. `None` for the template root.
    pub parent: Option<ShortId>,
    /// `fileId` of the owning node, when it is addressable itself.
    pub node_file_id: Option<String>,
    /// The raw component record, for component targets.
    pub component_record: Option<Record>,
    /// The node's final output kind.
    pub kind: NodeKind,
    /// The node's name.
    pub name: Option<String>,
    /// The node's space convention.
    pub space: SpaceMode,
    /// The node's own UI rect.
    pub rect: Option<RectInfo>,
    /// The UI rect of the node's parent.
    pub parent_rect: Option<RectInfo>,
    /// The template instantiated here, for nested prefab instances.
    pub prefab_link: Option<AssetUuid>,
}

impl TargetEntry {
    /// Whether the entry addresses the template's root node or one of its components.
    pub fn is_template_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Template content addressable by prefab overrides, for the whole batch.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    entries: HashMap<(AssetUuid, String), TargetEntry>,
    roots: HashMap<AssetUuid, TargetEntry>,
}

impl TargetRegistry {
    /// Registers `entry` under `(entry.asset, file_id)`.
    pub fn register(&mut self, file_id: impl Into<String>, entry: TargetEntry) {
        let key = (entry.asset.clone(), file_id.into());
        if let Some(previous) = self.entries.insert(key, entry) {
            log::debug!(
                "Target in '{}' re-registered, node {} replaced",
                previous.asset,
                previous.node
            );
        }
    }

    /// The entry for `file_id` directly inside `asset`.
    pub fn get(&self, asset: &AssetUuid, file_id: &str) -> Option<&TargetEntry> {
        self.entries.get(&(asset.clone(), file_id.to_string()))
    }

    /// Resolves a target, following nested instance links for multi-segment paths.
    pub fn resolve(&self, target: &TargetId) -> Option<&TargetEntry> {
        let (last, nested) = target.path.split_last()?;
        let mut asset = target.asset.clone();
        for segment in nested {
            asset = self.get(&asset, segment)?.prefab_link.clone()?;
        }
        self.get(&asset, last)
    }

    /// Records `entry` as the root node of `entry.asset`.
    pub fn register_root(&mut self, entry: TargetEntry) {
        self.roots.insert(entry.asset.clone(), entry);
    }

    /// The root an instance of `template` shows, looking through templates
    /// whose root is itself a prefab instance.
    pub fn template_root(&self, template: &AssetUuid) -> Option<&TargetEntry> {
        let mut root = self.roots.get(template)?;
        let mut seen = HashSet::from([template.clone()]);
        while let Some(link) = &root.prefab_link {
            if !seen.insert(link.clone()) {
                log::warn!("Prefab '{}' instantiates itself through '{}'", template, link);
                return None;
            }
            root = self.roots.get(link)?;
        }
        Some(root)
    }

    /// The number of registered targets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Gives an instance of a UI template the template root's space and kind.
///
/// Returns `true` when `space` or `kind` changed. A kind already rewritten by
/// a transcoder is kept.
pub(crate) fn adopt_template_root(
    space: &mut SpaceMode,
    kind: &mut NodeKind,
    root: &TargetEntry,
) -> bool {
    if !root.space.is_2d() {
        return false;
    }
    let default_kind = *kind == NodeKind::for_space(*space);
    if space.is_2d() && (!default_kind || *kind == root.kind) {
        return false;
    }
    *space = SpaceMode::TwoD;
    if default_kind {
        *kind = root.kind.clone();
    }
    true
}

/// The Session Context: one per batch, threaded through both phases.
pub struct Session {
    pub(crate) targets: TargetRegistry,
    ids: Box<dyn IdAllocator>,
    diagnostics: Diagnostics,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_allocator(Box::new(SequentialIds::default()))
    }
}

impl Session {
    /// Creates a session with a [`SequentialIds`] allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session drawing node ids from `ids`.
    pub fn with_allocator(ids: Box<dyn IdAllocator>) -> Self {
        Self {
            targets: TargetRegistry::default(),
            ids,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Allocates a batch-unique node id.
    pub fn next_id(&mut self) -> ShortId {
        self.ids.next_short_id()
    }

    /// The override target registry.
    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    /// Records a diagnostic against `asset`.
    pub fn report(&mut self, kind: DiagnosticKind, asset: &AssetUuid, message: impl Into<String>) {
        self.diagnostics.report(kind, asset, message);
    }

    /// Diagnostics collected so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Ends the session, keeping only its diagnostics.
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}
