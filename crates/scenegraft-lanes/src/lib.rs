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

//! # SceneGraft Lanes
//!
//! The conversion pipeline proper. A batch runs in two phases over one
//! [`Session`]:
//!
//! 1. [`build_asset`] walks each source graph into a [`BuiltAsset`], registering
//!    every addressable template node and queuing prefab-instance overrides.
//! 2. [`apply_overrides`] replays the queued overrides once every template of
//!    the batch has been registered, patching the trees that hold the instances.

#![warn(missing_docs)]

pub mod builder;
pub mod builtin;
pub mod fields;
pub mod fixup;
pub mod overrides;
pub mod reconcile;
pub mod registry;
pub mod session;

pub use builder::{build_asset, BuildEnv, BuiltAsset, NodeBuilder, ParentCx};
pub use fixup::{FieldHolder, Fixup};
pub use overrides::{apply_overrides, OverrideProperty, OverrideRecord};
pub use registry::{Capabilities, ComponentTranscoder, TranscoderRegistry};
pub use session::{Session, TargetEntry, TargetRegistry};
