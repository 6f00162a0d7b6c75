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

//! The Reference Graph Reader.
//!
//! A source asset is a JSON array of records. A record's position in the array is
//! its [`ReferenceId`]; records point at each other with `{"ref": n}` and at other
//! assets with `{"uuid": "..."}`. Position 0 describes the graph, the content
//! root lives at position 1.
//!
//! The reader never mutates the graph and never fails hard on a lookup: a
//! dangling or malformed reference simply yields `None` and the caller decides
//! whether that matters.

mod record;
mod source;

pub use self::record::*;
pub use self::source::SourceAsset;

use scenegraft_core::{ConversionError, ReferenceId};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// An immutable, index-addressed sequence of source records.
#[derive(Debug, Clone, Default)]
pub struct ElementGraph {
    records: Vec<Value>,
}

impl ElementGraph {
    /// Wraps an already-decoded array of records.
    pub fn from_records(records: Vec<Value>) -> Self {
        Self { records }
    }

    /// Decodes a graph from JSON text.
    ///
    /// # Errors
    /// Returns [`ConversionError::MalformedGraph`] when the text is not JSON or
    /// its top level is not an array.
    pub fn parse(label: &str, text: &str) -> Result<Self, ConversionError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ConversionError::malformed(label, e.to_string()))?;
        Self::from_value(label, value)
    }

    /// Decodes a graph from a reader.
    ///
    /// # Errors
    /// Same as [`ElementGraph::parse`]; read failures surface as malformed input.
    pub fn from_reader(label: &str, reader: impl Read) -> Result<Self, ConversionError> {
        let value: Value = serde_json::from_reader(reader)
            .map_err(|e| ConversionError::malformed(label, e.to_string()))?;
        Self::from_value(label, value)
    }

    /// Reads and decodes a graph file.
    ///
    /// # Errors
    /// [`ConversionError::Io`] when the file cannot be read,
    /// [`ConversionError::MalformedGraph`] when its content is not a graph.
    pub fn load(path: &Path) -> Result<Self, ConversionError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConversionError::io(path, e))?;
        Self::parse(&path.display().to_string(), &text)
    }

    fn from_value(label: &str, value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Array(records) => Ok(Self { records }),
            other => Err(ConversionError::malformed(
                label,
                format!("expected a top-level array, found {}", kind_of(&other)),
            )),
        }
    }

    /// Returns the record at `id`, or `None` when the position is out of range
    /// or does not hold an object.
    pub fn get(&self, id: ReferenceId) -> Option<&Record> {
        self.records.get(id.index()).and_then(Value::as_object)
    }

    /// Follows a `{"ref": n}` link.
    pub fn resolve(&self, link: &Value) -> Option<&Record> {
        ref_id(link).and_then(|id| self.get(id))
    }

    /// The graph descriptor at position 0.
    pub fn descriptor(&self) -> Option<&Record> {
        self.get(ReferenceId::DESCRIPTOR)
    }

    /// The content root at position 1.
    ///
    /// # Errors
    /// [`ConversionError::MalformedGraph`] when position 1 is missing or is not
    /// an object.
    pub fn root(&self, label: &str) -> Result<&Record, ConversionError> {
        match self.records.get(ReferenceId::ROOT.index()) {
            None => Err(ConversionError::malformed(label, "content root #1 is missing")),
            Some(Value::Object(record)) => Ok(record),
            Some(other) => Err(ConversionError::malformed(
                label,
                format!("content root #1 is {}, not an object", kind_of(other)),
            )),
        }
    }

    /// The number of records, descriptor included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the graph holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
