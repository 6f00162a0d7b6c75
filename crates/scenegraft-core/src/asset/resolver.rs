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

use super::{AssetInfo, AssetUuid};
use std::collections::HashMap;

/// Answers cross-asset questions on behalf of the conversion engine.
///
/// Supplied by the stage that walked the source project. The engine only ever
/// calls [`AssetResolver::remap_uuid`] first and then [`AssetResolver::resolve`]
/// on the remapped identifier.
pub trait AssetResolver {
    /// Looks up an asset. Returns `None` when the asset is unknown.
    fn resolve(&self, uuid: &AssetUuid) -> Option<&AssetInfo>;

    /// Maps a source identifier to the identifier used in the output.
    ///
    /// Identifiers without a mapping are returned unchanged.
    fn remap_uuid(&self, uuid: &AssetUuid) -> AssetUuid;
}

/// An in-memory [`AssetResolver`] backed by a uuid index and a remap table.
#[derive(Debug, Default, Clone)]
pub struct IndexResolver {
    /// The internal index mapping asset UUIDs to their metadata.
    index: HashMap<AssetUuid, AssetInfo>,
    remap: HashMap<AssetUuid, AssetUuid>,
}

impl IndexResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the metadata of an asset.
    pub fn insert(&mut self, info: AssetInfo) {
        self.index.insert(info.uuid.clone(), info);
    }

    /// Declares that `from` must be written as `to` in the output.
    pub fn add_remap(&mut self, from: AssetUuid, to: AssetUuid) {
        self.remap.insert(from, to);
    }

    /// The number of indexed assets.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl FromIterator<AssetInfo> for IndexResolver {
    fn from_iter<T: IntoIterator<Item = AssetInfo>>(iter: T) -> Self {
        let mut resolver = Self::new();
        for info in iter {
            resolver.insert(info);
        }
        resolver
    }
}

impl AssetResolver for IndexResolver {
    fn resolve(&self, uuid: &AssetUuid) -> Option<&AssetInfo> {
        self.index.get(uuid)
    }

    fn remap_uuid(&self, uuid: &AssetUuid) -> AssetUuid {
        self.remap.get(uuid).cloned().unwrap_or_else(|| uuid.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remap_then_resolve() {
        let mut resolver: IndexResolver =
            [AssetInfo::new(AssetUuid::from("new"), "button.prefab", "prefab")]
                .into_iter()
                .collect();
        resolver.add_remap(AssetUuid::from("old"), AssetUuid::from("new"));

        let remapped = resolver.remap_uuid(&AssetUuid::from("old"));
        assert_eq!(remapped, AssetUuid::from("new"));
        assert!(resolver.resolve(&remapped).is_some());
        assert_eq!(
            resolver.remap_uuid(&AssetUuid::from("other")),
            AssetUuid::from("other")
        );
        assert!(resolver.resolve(&AssetUuid::from("other")).is_none());
    }
}
