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

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A persistent identifier for a logical asset.
///
/// Source engines do not agree on a UUID spelling (some compress them), so the
/// identifier is kept as the exact string the source used. Assets that have no
/// identifier of their own get a name-based one through [`AssetUuid::new_v5`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetUuid(String);

impl AssetUuid {
    /// Creates a deterministic (version 5) identifier from a path or name.
    ///
    /// The same input always produces the same identifier, which keeps
    /// manifest-listed assets stable across runs.
    pub fn new_v5(name: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes()).to_string())
    }

    /// Returns the identifier as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetUuid {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AssetUuid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AssetUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
