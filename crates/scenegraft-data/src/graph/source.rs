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

use super::{ElementGraph, RecordExt};
use scenegraft_core::asset::AssetUuid;
use scenegraft_core::ConversionError;
use std::path::Path;

/// One source asset of a batch: its identity and its decoded graph.
#[derive(Debug, Clone)]
pub struct SourceAsset {
    /// The asset's uuid, as other assets link to it.
    pub uuid: AssetUuid,
    /// The output document name.
    pub name: String,
    /// The decoded records.
    pub graph: ElementGraph,
}

impl SourceAsset {
    /// Bundles an already-decoded graph.
    pub fn new(uuid: AssetUuid, name: impl Into<String>, graph: ElementGraph) -> Self {
        Self {
            uuid,
            name: name.into(),
            graph,
        }
    }

    /// Loads the graph at `path`.
    ///
    /// The document name is the descriptor's `name` when it has one, the file
    /// stem otherwise.
    pub fn load(uuid: AssetUuid, path: &Path) -> Result<Self, ConversionError> {
        let graph = ElementGraph::load(path)?;
        let name = graph
            .descriptor()
            .and_then(|d| d.str_field("name"))
            .map(str::to_string)
            .or_else(|| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| uuid.to_string());
        Ok(Self { uuid, name, graph })
    }
}
