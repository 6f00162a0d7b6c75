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

/// Keeps every write in memory, in order.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    writes: Vec<SceneDocument>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write, oldest first.
    pub fn writes(&self) -> &[SceneDocument] {
        &self.writes
    }

    /// The latest document written for `source`.
    pub fn latest(&self, source: &AssetUuid) -> Option<&SceneDocument> {
        self.writes.iter().rev().find(|doc| &doc.source == source)
    }
}

impl SceneSink for MemorySink {
    fn write(&mut self, document: &SceneDocument) -> Result<(), ConversionError> {
        self.writes.push(document.clone());
        Ok(())
    }
}
