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

//! The 2D/3D space convention of a subtree.

use serde::{Deserialize, Serialize};

/// Which coordinate convention applies to a node and, by inheritance, its subtree.
///
/// A node is in [`SpaceMode::TwoD`] when its parent is, or when it owns a
/// UI-capable or canvas component. Everything else is [`SpaceMode::ThreeD`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpaceMode {
    /// Top-left origin, Y-down UI space.
    TwoD,
    /// Right-handed 3D space.
    #[default]
    ThreeD,
}

impl SpaceMode {
    /// Returns `true` for [`SpaceMode::TwoD`].
    #[inline]
    pub fn is_2d(self) -> bool {
        matches!(self, SpaceMode::TwoD)
    }
}
