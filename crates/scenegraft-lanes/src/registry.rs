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

//! The Component Transcoder Registry.

use crate::builder::NodeBuilder;
use crate::builtin;
use scenegraft_core::math::RectInfo;
use scenegraft_data::{Node, Record};
use std::collections::HashMap;

/// What a transcoder's component means for the node that owns it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// The component defines a UI rect; its owner is laid out in 2D.
    pub ui: bool,
    /// The component roots a canvas; its owner and subtree are 2D.
    pub canvas: bool,
    /// The component draws; it runs after every other component of its node.
    pub visual: bool,
}

impl Capabilities {
    /// No special meaning.
    pub const NONE: Self = Self {
        ui: false,
        canvas: false,
        visual: false,
    };
    /// A UI rect.
    pub const UI: Self = Self {
        ui: true,
        ..Self::NONE
    };
    /// A canvas root.
    pub const CANVAS: Self = Self {
        canvas: true,
        ..Self::NONE
    };
    /// A drawing component.
    pub const VISUAL: Self = Self {
        visual: true,
        ..Self::NONE
    };
}

/// Converts one source component type into output data.
///
/// A transcoder receives the builder of the asset being converted, the node
/// under construction and the raw component record. It may write node fields,
/// rewrite the node kind, attach components, build children through
/// [`NodeBuilder::build_child`], mark source elements as removed and queue
/// fixups.
///
/// With `is_override` set, `raw` is a partial payload coming from a prefab
/// override: only the fields it carries should be written, defaults included.
pub trait ComponentTranscoder: Send + Sync {
    /// Transcodes `raw` onto `node`.
    fn transcode(&self, cx: &mut NodeBuilder<'_>, node: &mut Node, raw: &Record, is_override: bool);

    /// The capabilities of the component type.
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    /// The UI rect the component defines, for components with [`Capabilities::ui`].
    fn rect(&self, _raw: &Record) -> Option<RectInfo> {
        None
    }
}

struct FnTranscoder<F> {
    capabilities: Capabilities,
    transcode: F,
}

impl<F> ComponentTranscoder for FnTranscoder<F>
where
    F: Fn(&mut NodeBuilder<'_>, &mut Node, &Record, bool) + Send + Sync,
{
    fn transcode(
        &self,
        cx: &mut NodeBuilder<'_>,
        node: &mut Node,
        raw: &Record,
        is_override: bool,
    ) {
        (self.transcode)(cx, node, raw, is_override)
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}

/// Maps source component type names to their transcoders.
///
/// Registration happens before a batch starts; the registry is only read while
/// converting.
#[derive(Default)]
pub struct TranscoderRegistry {
    map: HashMap<String, Box<dyn ComponentTranscoder>>,
}

impl TranscoderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in `UITransform` and `Canvas` transcoders.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_builtins(&mut registry);
        registry
    }

    /// Registers `transcoder` for `type_name`, replacing any previous one.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        transcoder: impl ComponentTranscoder + 'static,
    ) {
        let type_name = type_name.into();
        if self
            .map
            .insert(type_name.clone(), Box::new(transcoder))
            .is_some()
        {
            log::debug!("Replaced the transcoder for component type '{}'", type_name);
        }
    }

    /// Registers a closure as the transcoder for `type_name`.
    pub fn register_fn<F>(&mut self, type_name: impl Into<String>, capabilities: Capabilities, f: F)
    where
        F: Fn(&mut NodeBuilder<'_>, &mut Node, &Record, bool) + Send + Sync + 'static,
    {
        self.register(
            type_name,
            FnTranscoder {
                capabilities,
                transcode: f,
            },
        );
    }

    /// The transcoder registered for `type_name`.
    pub fn get(&self, type_name: &str) -> Option<&dyn ComponentTranscoder> {
        self.map.get(type_name).map(Box::as_ref)
    }

    /// Whether a transcoder is registered for `type_name`.
    pub fn contains(&self, type_name: &str) -> bool {
        self.map.contains_key(type_name)
    }

    /// The number of registered types.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
