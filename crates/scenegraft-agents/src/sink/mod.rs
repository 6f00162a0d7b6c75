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

//! Destinations for converted documents.

mod json_dir;
mod memory;

pub use self::json_dir::JsonDirSink;
pub use self::memory::MemorySink;

use scenegraft_core::ConversionError;
use scenegraft_data::SceneDocument;

/// Receives every document a batch produces.
///
/// A document may be written twice in one batch: once after the build phase and
/// again when the override pass patched its tree. The later write replaces the
/// earlier one.
pub trait SceneSink {
    /// Stores `document`, replacing any earlier write for the same source asset.
    fn write(&mut self, document: &SceneDocument) -> Result<(), ConversionError>;
}
