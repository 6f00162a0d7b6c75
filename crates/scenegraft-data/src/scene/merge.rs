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

//! Override merging for field maps.

use serde_json::{Map, Value};

/// Merges `src` into `dst`, last write wins.
///
/// Objects present on both sides are merged key by key; arrays and scalars
/// replace the existing value outright. Vectors are always emitted with every
/// component, so for them merging and replacing give the same result.
pub fn merge_fields(dst: &mut Map<String, Value>, src: Map<String, Value>) {
    for (key, incoming) in src {
        let replacement = match (dst.get_mut(&key), incoming) {
            (Some(Value::Object(existing)), Value::Object(inner)) => {
                merge_fields(existing, inner);
                None
            }
            (_, other) => Some(other),
        };
        if let Some(value) = replacement {
            dst.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn later_writes_win() {
        let mut fields = Map::new();
        merge_fields(&mut fields, map(json!({"x": 1})));
        merge_fields(&mut fields, map(json!({"y": 5})));
        merge_fields(&mut fields, map(json!({"x": 2})));
        assert_eq!(Value::Object(fields), json!({"x": 2, "y": 5}));
    }

    #[test]
    fn objects_merge_and_arrays_replace() {
        let mut fields = map(json!({
            "transform": {"position": {"x": 1, "y": 2, "z": 3}},
            "tags": ["a", "b"]
        }));
        merge_fields(
            &mut fields,
            map(json!({
                "transform": {"scale": {"x": 2, "y": 2, "z": 2}},
                "tags": ["c"]
            })),
        );
        assert_eq!(
            Value::Object(fields),
            json!({
                "transform": {
                    "position": {"x": 1, "y": 2, "z": 3},
                    "scale": {"x": 2, "y": 2, "z": 2}
                },
                "tags": ["c"]
            })
        );
    }

    #[test]
    fn scalar_replaced_by_object() {
        let mut fields = map(json!({"texture": null}));
        merge_fields(&mut fields, map(json!({"texture": {"uuid": "t"}})));
        assert_eq!(Value::Object(fields), json!({"texture": {"uuid": "t"}}));
    }
}
