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

//! # SceneGraft Core
//!
//! Foundational crate containing the identifiers, math primitives, and interface
//! contracts shared by every stage of the scene conversion pipeline.
//!
//! Nothing in this crate knows how a source graph is walked or how overrides are
//! replayed; it only defines the vocabulary those stages speak.

#![warn(missing_docs)]

pub mod alloc;
pub mod asset;
pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod math;
pub mod space;

pub use alloc::{IdAllocator, SequentialIds};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::ConversionError;
pub use ids::{ReferenceId, ShortId, TargetId};
pub use space::SpaceMode;
