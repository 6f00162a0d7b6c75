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

use anyhow::{Context, Result};
use scenegraft_core::asset::{AssetInfo, AssetUuid, IndexResolver};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the structure of a conversion manifest.
///
/// ```toml
/// output_dir = "converted"
///
/// [[assets]]
/// path = "scenes/main.json"
///
/// [[assets]]
/// path = "prefabs/button.json"
/// uuid = "0b6f1c0e-..."
///
/// [remap]
/// "old-button-uuid" = "0b6f1c0e-..."
/// ```
#[derive(Deserialize, Debug)]
pub struct ConversionManifest {
    /// Output directory, relative to the manifest.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// The assets of the batch, in conversion order.
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
    /// Template uuids to substitute when resolving prefab links.
    #[serde(default)]
    pub remap: BTreeMap<String, String>,
}

/// One `[[assets]]` entry.
#[derive(Deserialize, Debug)]
pub struct AssetEntry {
    /// Source file, relative to the manifest.
    pub path: PathBuf,
    /// The uuid other assets link to. Derived from `path` when omitted.
    pub uuid: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("converted")
}

impl ConversionManifest {
    /// Reads and parses the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest file at '{}'", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))
    }

    /// Parses manifest text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The batch as `(uuid, absolute path)` pairs, paths joined onto `base`.
    pub fn assets(&self, base: &Path) -> Result<Vec<(AssetUuid, PathBuf)>> {
        self.assets
            .iter()
            .map(|entry| {
                let uuid = match &entry.uuid {
                    Some(uuid) => AssetUuid::from(uuid.as_str()),
                    None => {
                        let path_str = entry.path.to_str().context("Invalid path encoding")?;
                        AssetUuid::new_v5(path_str)
                    }
                };
                Ok((uuid, base.join(&entry.path)))
            })
            .collect()
    }

    /// An index of the batch's assets plus the remap table.
    pub fn resolver(&self, assets: &[(AssetUuid, PathBuf)]) -> IndexResolver {
        let mut resolver: IndexResolver = assets
            .iter()
            .map(|(uuid, path)| {
                let asset_type_name = path
                    .extension()
                    .and_then(|s| s.to_str())
                    .unwrap_or("")
                    .to_string();
                AssetInfo::new(uuid.clone(), path.clone(), asset_type_name)
            })
            .collect();
        for (from, to) in &self.remap {
            resolver.add_remap(AssetUuid::from(from.as_str()), AssetUuid::from(to.as_str()));
        }
        resolver
    }
}
