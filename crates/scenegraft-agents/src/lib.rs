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

//! # SceneGraft Agents
//!
//! Drivers that own a conversion batch from start to finish: loading the
//! sources, running the build and override lanes over one session, and handing
//! every resulting document to a [`sink::SceneSink`].

#![warn(missing_docs)]

pub mod conversion_agent;
pub mod sink;

pub use conversion_agent::{BatchReport, ConversionAgent};
pub use sink::{JsonDirSink, MemorySink, SceneSink};
