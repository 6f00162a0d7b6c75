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

//! Field access helpers for raw source records.

use scenegraft_core::asset::AssetUuid;
use scenegraft_core::ReferenceId;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A raw source record: a JSON object with a `"type"` field.
pub type Record = Map<String, Value>;

/// The key holding a record's type name.
pub const TYPE_KEY: &str = "type";

/// Reads an intra-graph link of the form `{"ref": n}`.
pub fn ref_id(value: &Value) -> Option<ReferenceId> {
    value
        .get("ref")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .map(ReferenceId)
}

/// Reads a cross-asset link of the form `{"uuid": "..."}`.
pub fn uuid_link(value: &Value) -> Option<AssetUuid> {
    value
        .get("uuid")
        .and_then(Value::as_str)
        .map(AssetUuid::from)
}

/// Typed, soft-failing accessors over a [`Record`].
pub trait RecordExt {
    /// The record's `"type"` field.
    fn type_name(&self) -> Option<&str>;
    /// A string field.
    fn str_field(&self, key: &str) -> Option<&str>;
    /// A boolean field.
    fn bool_field(&self, key: &str) -> Option<bool>;
    /// A single `{"ref"}` link.
    fn link(&self, key: &str) -> Option<ReferenceId>;
    /// An array of `{"ref"}` links. Entries that are not links are skipped.
    fn links(&self, key: &str) -> Vec<ReferenceId>;
    /// An array of strings. Non-string entries are skipped.
    fn strings(&self, key: &str) -> Vec<String>;
    /// Decodes a field into `T`, or `None` when absent or mistyped.
    fn decode<T: DeserializeOwned>(&self, key: &str) -> Option<T>;
}

impl RecordExt for Record {
    fn type_name(&self) -> Option<&str> {
        self.str_field(TYPE_KEY)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn bool_field(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    fn link(&self, key: &str) -> Option<ReferenceId> {
        self.get(key).and_then(ref_id)
    }

    fn links(&self, key: &str) -> Vec<ReferenceId> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(ref_id).collect())
            .unwrap_or_default()
    }

    fn strings(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn decode<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenegraft_core::math::Vec3;
    use serde_json::json;

    #[test]
    fn accessors_fail_softly() {
        let record = json!({
            "type": "Node",
            "name": "hero",
            "active": false,
            "position": {"x": 1, "y": 2},
            "children": [{"ref": 3}, "junk", {"ref": 4}],
            "propertyPath": ["position", 7, "x"]
        });
        let record = record.as_object().unwrap();

        assert_eq!(record.type_name(), Some("Node"));
        assert_eq!(record.bool_field("active"), Some(false));
        assert_eq!(record.bool_field("name"), None);
        assert_eq!(record.links("children"), vec![ReferenceId(3), ReferenceId(4)]);
        assert_eq!(record.strings("propertyPath"), vec!["position", "x"]);
        assert_eq!(record.decode::<Vec3>("position"), Some(Vec3::new(1.0, 2.0, 0.0)));
        assert_eq!(record.decode::<Vec3>("name"), None);
    }

    #[test]
    fn link_readers() {
        assert_eq!(ref_id(&json!({"ref": 7})), Some(ReferenceId(7)));
        assert_eq!(ref_id(&json!({"ref": -1})), None);
        assert_eq!(uuid_link(&json!({"uuid": "u-1"})), Some(AssetUuid::from("u-1")));
        assert_eq!(uuid_link(&json!({"ref": 1})), None);
    }
}
