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

mod common;

use common::{convert, find, registry, resolver, root, source};
use scenegraft_core::DiagnosticKind;
use scenegraft_data::SourceAsset;
use serde_json::{json, Value};
use std::collections::HashSet;

/// A 200x100 centered button with a captioned label.
fn button_template() -> SourceAsset {
    source(
        "tpl",
        json!([
            {"type": "Prefab", "name": "button", "data": {"ref": 1}},
            {"type": "Node", "name": "button", "components": [{"ref": 2}],
             "children": [{"ref": 4}], "prefab": {"ref": 3}},
            {"type": "UITransform", "node": {"ref": 1},
             "contentSize": {"width": 200, "height": 100}, "anchorPoint": {"x": 0.5, "y": 0.5}},
            {"type": "PrefabInfo", "fileId": "root"},
            {"type": "Node", "name": "caption", "position": {"x": 0, "y": 0, "z": 0},
             "prefab": {"ref": 5}, "components": [{"ref": 6}]},
            {"type": "PrefabInfo", "fileId": "caption"},
            {"type": "Label", "node": {"ref": 4}, "string": "OK", "prefab": {"ref": 7}},
            {"type": "CompPrefabInfo", "fileId": "caption-label"}
        ]),
    )
}

fn instance_node(scene: &Value) -> &Value {
    &scene["child"][0]["child"][0]
}

#[test]
fn overrides_land_on_the_instance_and_its_placeholders() {
    let scene = source(
        "scene",
        json!([
            {"type": "SceneAsset", "name": "main", "data": {"ref": 1}},
            {"type": "Scene", "name": "main", "children": [{"ref": 2}]},
            {"type": "Node", "name": "canvas", "components": [{"ref": 3}, {"ref": 4}],
             "children": [{"ref": 5}]},
            {"type": "UITransform", "node": {"ref": 2},
             "contentSize": {"width": 960, "height": 640}, "anchorPoint": {"x": 0.5, "y": 0.5}},
            {"type": "Canvas", "node": {"ref": 2}},
            {"type": "Node", "prefab": {"ref": 6}},
            {"type": "PrefabInfo", "fileId": "root", "asset": {"uuid": "tpl"}, "instance": {"ref": 7}},
            {"type": "PrefabInstance", "fileId": "inst-1",
             "propertyOverrides": [{"ref": 8}, {"ref": 10}]},
            {"type": "PropertyOverride", "targetInfo": {"ref": 9},
             "propertyPath": ["position"], "value": {"x": 10, "y": 20, "z": 0}},
            {"type": "TargetInfo", "localID": ["root"]},
            {"type": "PropertyOverride", "targetInfo": {"ref": 11},
             "propertyPath": ["string"], "value": "Cancel"},
            {"type": "TargetInfo", "localID": ["caption-label"]}
        ]),
    );
    // The template comes after the scene: resolution waits for the completion pass.
    let (built, session) = convert(
        &registry(),
        &resolver(&["scene", "tpl"]),
        vec![scene, button_template()],
    );
    assert!(session.diagnostics().is_empty());

    let scene = find(&built, "scene");
    assert!(scene.patched);
    assert!(!find(&built, "tpl").patched);

    let root = root(scene);
    assert_eq!(root["type"], "Scene2DRoot");
    let instance = instance_node(&root);
    assert_eq!(instance["instance"], "tpl");
    assert_eq!(instance["position"], json!({"x": 490.0, "y": 300.0}));

    let placeholder = &instance["child"][0];
    assert_eq!(placeholder["override"], "tpl#caption");
    assert_eq!(placeholder["name"], "caption");
    assert_eq!(placeholder["type"], "UIWidget");
    let label = &placeholder["comp"][0];
    assert_eq!(label["type"], "Text");
    assert_eq!(label["text"], "Cancel");
    assert_eq!(label["override"], "Text");

    // The template itself is untouched.
    let template = common::root(find(&built, "tpl"));
    assert_eq!(template["child"][0]["comp"][0]["text"], "OK");
    assert_eq!(template["child"][0]["position"], json!({"x": 100.0, "y": 50.0}));
}

#[test]
fn later_writes_win_and_missing_targets_are_skipped() {
    let crate_template = source(
        "crate",
        json!([
            {"type": "Prefab", "name": "crate", "data": {"ref": 1}},
            {"type": "Node", "name": "crate", "children": [{"ref": 3}], "prefab": {"ref": 2}},
            {"type": "PrefabInfo", "fileId": "crate-root"},
            {"type": "Node", "name": "lid", "position": {"x": 0, "y": 1, "z": 0}, "prefab": {"ref": 4}},
            {"type": "PrefabInfo", "fileId": "lid"}
        ]),
    );
    let yard = source(
        "yard",
        json!([
            {"type": "SceneAsset", "data": {"ref": 1}},
            {"type": "Scene", "name": "yard", "children": [{"ref": 2}]},
            {"type": "Node", "prefab": {"ref": 3}},
            {"type": "PrefabInfo", "fileId": "crate-root", "asset": {"uuid": "crate"},
             "instance": {"ref": 4}},
            {"type": "PrefabInstance", "fileId": "crate-1",
             "propertyOverrides": [{"ref": 5}, {"ref": 7}, {"ref": 8}]},
            {"type": "PropertyOverride", "targetInfo": {"ref": 6},
             "propertyPath": ["position", "x"], "value": 1},
            {"type": "TargetInfo", "localID": ["lid"]},
            {"type": "PropertyOverride", "targetInfo": {"ref": 6},
             "propertyPath": ["position", "x"], "value": 2},
            {"type": "PropertyOverride", "targetInfo": {"ref": 9},
             "propertyPath": ["name"], "value": "ghost"},
            {"type": "TargetInfo", "localID": ["missing"]}
        ]),
    );
    let (built, session) = convert(
        &registry(),
        &resolver(&["crate", "yard"]),
        vec![crate_template, yard],
    );

    assert_eq!(
        session.diagnostics().count(DiagnosticKind::MissingOverrideTarget),
        1
    );
    assert_eq!(session.diagnostics().len(), 1);

    let root = root(find(&built, "yard"));
    assert_eq!(root["type"], "Spatial3D");
    let instance = &root["child"][0];
    assert_eq!(instance["type"], "Spatial3D");
    let children = instance["child"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["override"], "crate#lid");
    assert_eq!(children[0]["transform"], json!({"position": {"x": 2.0}}));
}

#[test]
fn mounted_content_and_removals() {
    let hud = source(
        "hud",
        json!([
            {"type": "SceneAsset", "data": {"ref": 1}},
            {"type": "Scene", "name": "hud", "children": [{"ref": 2}]},
            {"type": "Node", "name": "canvas", "components": [{"ref": 3}], "children": [{"ref": 4}]},
            {"type": "Canvas", "node": {"ref": 2}},
            {"type": "Node", "prefab": {"ref": 5}},
            {"type": "PrefabInfo", "fileId": "root", "asset": {"uuid": "tpl"}, "instance": {"ref": 6}},
            {"type": "PrefabInstance", "fileId": "inst-2",
             "mountedChildren": [{"ref": 7}],
             "mountedComponents": [{"ref": 10}],
             "removedComponents": [{"ref": 13}]},
            {"type": "MountedChildren", "targetInfo": {"ref": 8}, "nodes": [{"ref": 9}]},
            {"type": "TargetInfo", "localID": ["root"]},
            {"type": "Node", "name": "badge", "position": {"x": 5, "y": 5, "z": 0}},
            {"type": "MountedComponents", "targetInfo": {"ref": 11}, "components": [{"ref": 12}]},
            {"type": "TargetInfo", "localID": ["caption"]},
            {"type": "Label", "node": {"ref": 4}, "string": "New"},
            {"type": "TargetInfo", "localID": ["caption-label"]}
        ]),
    );
    let (built, session) = convert(
        &registry(),
        &resolver(&["hud", "tpl"]),
        vec![button_template(), hud],
    );
    assert!(session.diagnostics().is_empty());

    let root = root(find(&built, "hud"));
    let instance = instance_node(&root);
    let children = instance["child"].as_array().unwrap();
    assert_eq!(children.len(), 2);

    // Re-expressed against the template root's centered 200x100 rect.
    assert_eq!(children[0]["name"], "badge");
    assert_eq!(children[0]["position"], json!({"x": 105.0, "y": 45.0}));

    // Component and removal overrides share the caption placeholder.
    let placeholder = &children[1];
    assert_eq!(placeholder["override"], "tpl#caption");
    let comps = placeholder["comp"].as_array().unwrap();
    assert_eq!(comps.len(), 2);
    assert_eq!(comps[0]["type"], "Text");
    assert_eq!(comps[0]["text"], "New");
    assert_eq!(comps[1], json!({"type": "Label", "removed": true, "override": "Label"}));
}

#[test]
fn nested_targets_resolve_through_inner_instances() {
    let panel = source(
        "panel",
        json!([
            {"type": "Prefab", "name": "panel", "data": {"ref": 1}},
            {"type": "Node", "name": "panel", "components": [{"ref": 2}],
             "children": [{"ref": 4}], "prefab": {"ref": 3}},
            {"type": "UITransform", "node": {"ref": 1}, "contentSize": {"width": 400, "height": 300}},
            {"type": "PrefabInfo", "fileId": "panel-root"},
            {"type": "Node", "prefab": {"ref": 5}},
            {"type": "PrefabInfo", "fileId": "root", "asset": {"uuid": "tpl"}, "instance": {"ref": 6}},
            {"type": "PrefabInstance", "fileId": "inner"}
        ]),
    );
    let menu = source(
        "menu",
        json!([
            {"type": "SceneAsset", "data": {"ref": 1}},
            {"type": "Scene", "name": "menu", "children": [{"ref": 2}]},
            {"type": "Node", "name": "canvas", "components": [{"ref": 3}], "children": [{"ref": 4}]},
            {"type": "Canvas", "node": {"ref": 2}},
            {"type": "Node", "prefab": {"ref": 5}},
            {"type": "PrefabInfo", "fileId": "panel-root", "asset": {"uuid": "panel"},
             "instance": {"ref": 6}},
            {"type": "PrefabInstance", "fileId": "panel-1", "propertyOverrides": [{"ref": 7}]},
            {"type": "PropertyOverride", "targetInfo": {"ref": 8},
             "propertyPath": ["string"], "value": "Deep"},
            {"type": "TargetInfo", "localID": ["inner", "caption-label"]}
        ]),
    );
    let (built, session) = convert(
        &registry(),
        &resolver(&["menu", "panel", "tpl"]),
        vec![menu, panel, button_template()],
    );
    assert!(session.diagnostics().is_empty());
    assert!(!find(&built, "panel").patched);

    let root = root(find(&built, "menu"));
    let placeholder = &instance_node(&root)["child"][0];
    assert_eq!(placeholder["override"], "panel#inner/caption");
    assert_eq!(placeholder["comp"][0]["text"], "Deep");
}

#[test]
fn unknown_template_asset_skips_the_instance_overrides() {
    let scene = source(
        "lost",
        json!([
            {"type": "SceneAsset", "data": {"ref": 1}},
            {"type": "Scene", "name": "lost", "children": [{"ref": 2}]},
            {"type": "Node", "prefab": {"ref": 3}},
            {"type": "PrefabInfo", "fileId": "root", "asset": {"uuid": "nope"}, "instance": {"ref": 4}},
            {"type": "PrefabInstance", "fileId": "inst", "propertyOverrides": [{"ref": 5}]},
            {"type": "PropertyOverride", "targetInfo": {"ref": 6},
             "propertyPath": ["name"], "value": "x"},
            {"type": "TargetInfo", "localID": ["root"]}
        ]),
    );
    let (built, session) = convert(&registry(), &resolver(&["lost"]), vec![scene]);

    assert_eq!(
        session.diagnostics().count(DiagnosticKind::UnresolvedReference),
        1
    );
    let lost = find(&built, "lost");
    assert!(lost.pending.is_empty());
    assert!(!lost.patched);
    assert!(root(lost)["child"][0].get("instance").is_none());
}

#[test]
fn remapped_template_uuids_are_followed() {
    let scene = source(
        "scene",
        json!([
            {"type": "SceneAsset", "data": {"ref": 1}},
            {"type": "Node", "name": "holder", "children": [{"ref": 2}]},
            {"type": "Node", "prefab": {"ref": 3}},
            {"type": "PrefabInfo", "fileId": "root", "asset": {"uuid": "old-tpl"}, "instance": {"ref": 4}},
            {"type": "PrefabInstance", "fileId": "inst"}
        ]),
    );
    let mut resolver = resolver(&["scene", "tpl"]);
    resolver.add_remap("old-tpl".into(), "tpl".into());
    let (built, session) = convert(&registry(), &resolver, vec![scene, button_template()]);

    assert!(session.diagnostics().is_empty());
    assert_eq!(root(find(&built, "scene"))["child"][0]["instance"], "tpl");
}

#[test]
fn ui_prefabs_under_a_scene_take_the_template_space() {
    let hud = source(
        "hud",
        json!([
            {"type": "Prefab", "name": "hud", "data": {"ref": 1}},
            {"type": "Node", "name": "hud", "components": [{"ref": 2}, {"ref": 3}],
             "prefab": {"ref": 4}},
            {"type": "UITransform", "node": {"ref": 1},
             "contentSize": {"width": 960, "height": 640}, "anchorPoint": {"x": 0.5, "y": 0.5}},
            {"type": "Canvas", "node": {"ref": 1}},
            {"type": "PrefabInfo", "fileId": "hud-root"}
        ]),
    );
    let scene = source(
        "level",
        json!([
            {"type": "SceneAsset", "data": {"ref": 1}},
            {"type": "Scene", "name": "level", "children": [{"ref": 2}, {"ref": 7}]},
            {"type": "Node", "prefab": {"ref": 3}},
            {"type": "PrefabInfo", "fileId": "hud-root", "asset": {"uuid": "hud"},
             "instance": {"ref": 4}},
            {"type": "PrefabInstance", "fileId": "hud-1", "propertyOverrides": [{"ref": 5}]},
            {"type": "PropertyOverride", "targetInfo": {"ref": 6},
             "propertyPath": ["position"], "value": {"x": 10, "y": 20, "z": 0}},
            {"type": "TargetInfo", "localID": ["hud-root"]},
            {"type": "Node", "prefab": {"ref": 8}},
            {"type": "PrefabInfo", "fileId": "hud-root", "asset": {"uuid": "hud"},
             "instance": {"ref": 9}},
            {"type": "PrefabInstance", "fileId": "hud-2"}
        ]),
    );
    let (built, session) = convert(
        &registry(),
        &resolver(&["level", "hud"]),
        vec![scene, hud],
    );
    assert!(session.diagnostics().is_empty());

    let level = find(&built, "level");
    assert!(level.patched);
    let root = root(level);
    assert_eq!(root["type"], "Scene2DRoot");

    let placed = &root["child"][0];
    assert_eq!(placed["type"], "UIWidget");
    assert_eq!(placed["position"], json!({"x": 10.0, "y": 20.0}));
    assert!(placed.get("transform").is_none());

    // No override at all: the instance still shows a UI root.
    let bare = &root["child"][1];
    assert_eq!(bare["instance"], "hud");
    assert_eq!(bare["type"], "UIWidget");
}

#[test]
fn ids_are_unique_across_the_batch() {
    let scene = source(
        "scene",
        json!([
            {"type": "SceneAsset", "data": {"ref": 1}},
            {"type": "Scene", "name": "main", "children": [{"ref": 2}, {"ref": 2}]},
            {"type": "Node", "prefab": {"ref": 3}},
            {"type": "PrefabInfo", "fileId": "root", "asset": {"uuid": "tpl"}, "instance": {"ref": 4}},
            {"type": "PrefabInstance", "fileId": "inst", "propertyOverrides": [{"ref": 5}]},
            {"type": "PropertyOverride", "targetInfo": {"ref": 6},
             "propertyPath": ["active"], "value": false},
            {"type": "TargetInfo", "localID": ["caption"]}
        ]),
    );
    let (built, _) = convert(
        &registry(),
        &resolver(&["scene", "tpl"]),
        vec![scene, button_template()],
    );

    let mut seen = HashSet::new();
    let mut total = 0;
    for asset in &built {
        for node in asset.tree.iter() {
            seen.insert(node.id);
            total += 1;
        }
    }
    assert_eq!(seen.len(), total);

    // The instance was reached twice: two instance nodes, two placeholders.
    let root = root(find(&built, "scene"));
    let first = &root["child"][0];
    let second = &root["child"][1];
    assert_ne!(first["id"], second["id"]);
    assert_eq!(first["child"][0]["visible"], json!(false));
    assert_eq!(second["child"][0]["visible"], json!(false));
    assert_ne!(first["child"][0]["id"], second["child"][0]["id"]);
}
