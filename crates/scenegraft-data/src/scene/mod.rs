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

//! The output scene representation.
//!
//! A converted asset is a [`SceneTree`]: an arena of [`Node`]s addressed by
//! [`scenegraft_core::ShortId`]. Nodes own their [`Component`]s but only refer to
//! their children by id, so overrides can splice subtrees and placeholders into
//! a tree without rebuilding it. The nested JSON shape of the output format is
//! produced only when a [`SceneDocument`] is written.

mod component;
mod merge;
mod node;
mod tree;

pub use self::component::*;
pub use self::merge::merge_fields;
pub use self::node::*;
pub use self::tree::*;
