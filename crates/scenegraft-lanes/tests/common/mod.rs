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

#![allow(dead_code)]

use scenegraft_core::asset::{AssetInfo, AssetUuid, IndexResolver};
use scenegraft_data::scene::TextData;
use scenegraft_data::{Component, ComponentData, ElementGraph, RecordExt, SourceAsset};
use scenegraft_lanes::{
    apply_overrides, build_asset, BuildEnv, BuiltAsset, Capabilities, Session, TranscoderRegistry,
};
use serde_json::Value;

pub fn source(uuid: &str, records: Value) -> SourceAsset {
    let records = records.as_array().cloned().expect("records must be an array");
    SourceAsset::new(
        AssetUuid::from(uuid),
        uuid,
        ElementGraph::from_records(records),
    )
}

/// Built-ins plus a `Label` text transcoder and a no-op `Camera`.
pub fn registry() -> TranscoderRegistry {
    let mut registry = TranscoderRegistry::with_builtins();
    registry.register_fn("Label", Capabilities::NONE, |_, node, raw, _| {
        node.push_component(Component::new(ComponentData::Text(TextData {
            text: raw.str_field("string").map(str::to_string),
            ..TextData::default()
        })));
    });
    registry.register_fn("Camera", Capabilities::NONE, |_, _, _, _| {});
    registry
}

pub fn resolver(uuids: &[&str]) -> IndexResolver {
    uuids
        .iter()
        .map(|uuid| AssetInfo::new(AssetUuid::from(*uuid), format!("{uuid}.json"), "Prefab"))
        .collect()
}

/// Runs both phases over `assets`, in order.
pub fn convert(
    registry: &TranscoderRegistry,
    resolver: &IndexResolver,
    assets: Vec<SourceAsset>,
) -> (Vec<BuiltAsset>, Session) {
    let env = BuildEnv::new(registry, resolver);
    let mut session = Session::new();
    let mut built: Vec<BuiltAsset> = assets
        .into_iter()
        .map(|asset| build_asset(&mut session, env, asset).expect("asset should build"))
        .collect();
    apply_overrides(&mut session, env, &mut built);
    (built, session)
}

pub fn find<'a>(built: &'a [BuiltAsset], uuid: &str) -> &'a BuiltAsset {
    built
        .iter()
        .find(|asset| asset.uuid.as_str() == uuid)
        .expect("asset should be in the batch")
}

pub fn root(asset: &BuiltAsset) -> Value {
    asset.to_document().root
}
