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

//! Deferred patches applied once every node of an asset exists.

use scenegraft_core::{ReferenceId, ShortId};

/// The output object a fixup writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldHolder {
    /// A node's own fields.
    Node(ShortId),
    /// The component of output kind `kind` on `node`. Override deltas win over
    /// regular components of the same kind.
    Component {
        /// The owning node.
        node: ShortId,
        /// The component's output kind.
        kind: String,
    },
}

/// A patch that needs the final source-to-output id map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fixup {
    /// Writes `{"ref": <output id of source>}` into `field` of `holder`.
    ResolveRef {
        /// Where to write.
        holder: FieldHolder,
        /// The field name.
        field: String,
        /// The source element whose output node is referenced.
        source: ReferenceId,
    },
}
