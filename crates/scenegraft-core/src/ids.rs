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

//! Identifier types used on both sides of the conversion.
//!
//! The source side addresses records by their position ([`ReferenceId`]), the
//! output side addresses nodes by a generated [`ShortId`], and prefab overrides
//! address template content by a [`TargetId`]. None of these is ever converted
//! into another implicitly.

use crate::asset::AssetUuid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The position of a record inside a source element graph.
///
/// Position `0` is the graph descriptor and position `1` the content root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceId(pub u32);

impl ReferenceId {
    /// The graph descriptor record.
    pub const DESCRIPTOR: ReferenceId = ReferenceId(0);
    /// The content root record.
    pub const ROOT: ReferenceId = ReferenceId(1);

    /// Returns the position as a `usize` index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A batch-unique identifier for an output node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortId(pub u64);

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stable address of a node or component inside a template prefab.
///
/// `path` is the chain of `fileId`s recorded by the authoring tool. A single
/// entry addresses content owned by `asset` directly; additional entries walk
/// through nested prefab instances, one template per segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetId {
    /// The template asset the first segment belongs to.
    pub asset: AssetUuid,
    /// The `fileId` chain, outermost first. Never empty.
    pub path: Vec<String>,
}

impl TargetId {
    /// Creates a target addressing `file_id` directly inside `asset`.
    pub fn new(asset: AssetUuid, file_id: impl Into<String>) -> Self {
        Self {
            asset,
            path: vec![file_id.into()],
        }
    }

    /// Creates a target from a full `fileId` chain. Returns `None` for an empty chain.
    pub fn from_path(asset: AssetUuid, path: Vec<String>) -> Option<Self> {
        if path.is_empty() {
            None
        } else {
            Some(Self { asset, path })
        }
    }

    /// Whether this target addresses content of `asset` without crossing a nested instance.
    pub fn is_direct(&self) -> bool {
        self.path.len() == 1
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.asset, self.path.join("/"))
    }
}

impl Serialize for TargetId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_display_joins_the_file_id_chain() {
        let target = TargetId::from_path(
            AssetUuid::from("tpl"),
            vec!["outer".to_string(), "inner".to_string()],
        )
        .unwrap();
        assert_eq!(target.to_string(), "tpl#outer/inner");
        assert!(!target.is_direct());
    }

    #[test]
    fn empty_target_path_is_rejected() {
        assert!(TargetId::from_path(AssetUuid::from("tpl"), Vec::new()).is_none());
    }
}
