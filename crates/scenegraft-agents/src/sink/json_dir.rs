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

use super::SceneSink;
use scenegraft_core::asset::AssetUuid;
use scenegraft_core::ConversionError;
use scenegraft_data::SceneDocument;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes one pretty-printed `<name>.scene.json` file per document.
///
/// Each source asset keeps the file it was first written to. When another
/// asset already owns `<name>.scene.json`, the file becomes
/// `<name>.<uuid>.scene.json`.
#[derive(Debug, Clone)]
pub struct JsonDirSink {
    root: PathBuf,
    assigned: HashMap<AssetUuid, PathBuf>,
}

impl JsonDirSink {
    /// Creates a sink writing under `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            assigned: HashMap::new(),
        }
    }

    /// The output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file a document named `name` is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.scene.json"))
    }

    /// The file the document of `source` was written to.
    pub fn written_path(&self, source: &AssetUuid) -> Option<&Path> {
        self.assigned.get(source).map(PathBuf::as_path)
    }

    fn assign(&mut self, document: &SceneDocument) -> PathBuf {
        if let Some(path) = self.assigned.get(&document.source) {
            return path.clone();
        }
        let mut path = self.path_for(&document.name);
        if self.assigned.values().any(|taken| *taken == path) {
            path = self
                .root
                .join(format!("{}.{}.scene.json", document.name, document.source));
            log::warn!(
                "Output name '{}' is taken, writing {} to {:?}",
                document.name,
                document.source,
                path
            );
        }
        self.assigned.insert(document.source.clone(), path.clone());
        path
    }
}

impl SceneSink for JsonDirSink {
    fn write(&mut self, document: &SceneDocument) -> Result<(), ConversionError> {
        fs::create_dir_all(&self.root).map_err(|e| ConversionError::io(&self.root, e))?;
        let path = self.assign(document);
        let file = File::create(&path).map_err(|e| ConversionError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.flush().map_err(|e| ConversionError::io(&path, e))?;
        log::debug!("Wrote {:?}", path);
        Ok(())
    }
}
