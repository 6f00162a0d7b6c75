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

use super::uuid::AssetUuid;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What the upstream import stage knows about an asset referenced by uuid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    /// The unique, stable identifier for this asset, after remapping.
    pub uuid: AssetUuid,

    /// The path to the original source file.
    pub source_path: PathBuf,

    /// A string identifier for the asset's type (e.g., "prefab", "scene", "texture").
    pub asset_type_name: String,

    /// Free-form tags carried over from the source metadata.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl AssetInfo {
    /// Creates metadata with no tags.
    pub fn new(
        uuid: AssetUuid,
        source_path: impl Into<PathBuf>,
        asset_type_name: impl Into<String>,
    ) -> Self {
        Self {
            uuid,
            source_path: source_path.into(),
            asset_type_name: asset_type_name.into(),
            tags: Vec::new(),
        }
    }
}
