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

//! # SceneGraft Data
//!
//! Data layouts on both ends of the conversion: the immutable, index-addressed
//! source [`graph::ElementGraph`] and the id-addressed output [`scene::SceneTree`].
//! The two never hold references into each other; only integer ids cross over.

#![warn(missing_docs)]

pub mod graph;
pub mod scene;

pub use graph::{ElementGraph, Record, RecordExt, SourceAsset};
pub use scene::{Component, ComponentData, Node, NodeKind, SceneDocument, SceneTree};
