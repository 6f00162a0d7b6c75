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

//! UI rect geometry of a node.

use super::Vec2;
use serde::{Deserialize, Serialize};

/// The size and anchor of a UI node, as read from its rect component.
///
/// The anchor is normalized: `(0, 0)` is the bottom-left corner of the rect in
/// the source convention and `(1, 1)` the top-right one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectInfo {
    /// Width and height.
    pub size: Vec2,
    /// Normalized anchor point.
    pub anchor: Vec2,
}

impl RectInfo {
    /// Creates a rect from its size and anchor.
    pub const fn new(size: Vec2, anchor: Vec2) -> Self {
        Self { size, anchor }
    }

    /// The offset of the anchor point from the rect's origin: `(ax * w, ay * h)`.
    #[inline]
    pub fn anchor_offset(&self) -> Vec2 {
        self.anchor.mul_elements(self.size)
    }
}
