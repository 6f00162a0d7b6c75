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

//! The agent driving a whole conversion batch.
//!
//! A batch runs both lanes over a single [`Session`]: every asset is built and
//! written, then the override pass patches the trees holding prefab instances
//! and those are written again. An asset whose graph is malformed is logged and
//! skipped; I/O failures abort the batch.

use scenegraft_core::asset::{AssetResolver, AssetUuid};
use scenegraft_core::{ConversionError, Diagnostic};
use scenegraft_data::SourceAsset;
use scenegraft_lanes::{apply_overrides, build_asset, BuildEnv, Session, TranscoderRegistry};
use std::path::PathBuf;

use crate::sink::SceneSink;

/// The outcome of a batch.
#[derive(Debug, Default, Clone)]
pub struct BatchReport {
    /// Assets whose document was written, in batch order.
    pub converted: Vec<AssetUuid>,
    /// Assets skipped because their graph was malformed.
    pub failed: Vec<AssetUuid>,
    /// Assets rewritten after the override pass.
    pub patched: Vec<AssetUuid>,
    /// Every non-fatal problem met along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl BatchReport {
    /// Whether every asset converted without a single diagnostic.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.diagnostics.is_empty()
    }
}

/// Owns the transcoder registry and the asset resolver used by every batch.
pub struct ConversionAgent {
    registry: TranscoderRegistry,
    resolver: Box<dyn AssetResolver>,
}

impl ConversionAgent {
    /// Creates an agent with the built-in transcoders.
    pub fn new(resolver: Box<dyn AssetResolver>) -> Self {
        Self::with_registry(TranscoderRegistry::with_builtins(), resolver)
    }

    /// Creates an agent with a custom registry.
    pub fn with_registry(registry: TranscoderRegistry, resolver: Box<dyn AssetResolver>) -> Self {
        Self { registry, resolver }
    }

    /// The registry, for registering project-specific transcoders.
    pub fn registry_mut(&mut self) -> &mut TranscoderRegistry {
        &mut self.registry
    }

    /// Converts already-loaded assets.
    ///
    /// # Errors
    /// Only I/O and serialization failures of the sink abort the batch.
    pub fn convert_batch(
        &self,
        assets: Vec<SourceAsset>,
        sink: &mut dyn SceneSink,
    ) -> Result<BatchReport, ConversionError> {
        log::info!("Converting a batch of {} assets", assets.len());
        let env = BuildEnv::new(&self.registry, &*self.resolver);
        let mut session = Session::new();
        let mut report = BatchReport::default();
        let mut built = Vec::with_capacity(assets.len());

        for asset in assets {
            let uuid = asset.uuid.clone();
            match build_asset(&mut session, env, asset) {
                Ok(asset) => {
                    sink.write(&asset.to_document())?;
                    report.converted.push(uuid);
                    built.push(asset);
                }
                Err(e) if e.is_per_asset() => {
                    log::error!("Skipping asset {}: {}", uuid, e);
                    report.failed.push(uuid);
                }
                Err(e) => return Err(e),
            }
        }

        apply_overrides(&mut session, env, &mut built);
        for asset in built.iter().filter(|asset| asset.patched) {
            sink.write(&asset.to_document())?;
            report.patched.push(asset.uuid.clone());
        }

        report.diagnostics = session.into_diagnostics().into_vec();
        log::info!(
            "Batch done: {} converted, {} patched, {} failed, {} diagnostics",
            report.converted.len(),
            report.patched.len(),
            report.failed.len(),
            report.diagnostics.len()
        );
        Ok(report)
    }

    /// Loads each `(uuid, path)` pair and converts the lot as one batch.
    ///
    /// # Errors
    /// A file that cannot be read aborts the batch; a file that is not a valid
    /// graph is reported in [`BatchReport::failed`].
    pub fn convert_paths(
        &self,
        assets: &[(AssetUuid, PathBuf)],
        sink: &mut dyn SceneSink,
    ) -> Result<BatchReport, ConversionError> {
        let mut sources = Vec::with_capacity(assets.len());
        let mut failed = Vec::new();
        for (uuid, path) in assets {
            match SourceAsset::load(uuid.clone(), path) {
                Ok(source) => sources.push(source),
                Err(e) if e.is_per_asset() => {
                    log::error!("Skipping {:?}: {}", path, e);
                    failed.push(uuid.clone());
                }
                Err(e) => return Err(e),
            }
        }

        let mut report = self.convert_batch(sources, sink)?;
        failed.append(&mut report.failed);
        report.failed = failed;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use scenegraft_core::asset::IndexResolver;
    use scenegraft_data::ElementGraph;
    use serde_json::json;

    fn asset(uuid: &str, records: serde_json::Value) -> SourceAsset {
        let records = records.as_array().cloned().unwrap();
        SourceAsset::new(uuid.into(), uuid, ElementGraph::from_records(records))
    }

    #[test]
    fn malformed_assets_do_not_stop_the_batch() {
        let agent = ConversionAgent::new(Box::new(IndexResolver::new()));
        let mut sink = MemorySink::new();
        let report = agent
            .convert_batch(
                vec![
                    asset("broken", json!([{"type": "Prefab"}, "not a record"])),
                    asset("fine", json!([{"type": "Prefab"}, {"type": "Node", "name": "fine"}])),
                ],
                &mut sink,
            )
            .unwrap();

        assert_eq!(report.failed, vec![AssetUuid::from("broken")]);
        assert_eq!(report.converted, vec![AssetUuid::from("fine")]);
        assert!(report.patched.is_empty());
        assert_eq!(sink.writes().len(), 1);
        assert_eq!(sink.writes()[0].root["name"], "fine");
    }
}
