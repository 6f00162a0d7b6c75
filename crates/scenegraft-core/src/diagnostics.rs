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

//! Non-fatal problems found while converting a batch.
//!
//! A diagnostic never stops the conversion: the offending field, component, or
//! override is dropped and the walk continues. Each occurrence is reported
//! exactly once and logged at `warn` level.

use crate::asset::AssetUuid;
use std::fmt;

/// The category of a non-fatal problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A `{ref}` or `{uuid}` link points at nothing; the field is left unset.
    UnresolvedReference,
    /// No transcoder is registered for a component type; the component is dropped.
    UnknownComponentType,
    /// The completion pass could not find an override's target; the override is dropped.
    MissingOverrideTarget,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnresolvedReference => write!(f, "unresolved reference"),
            DiagnosticKind::UnknownComponentType => write!(f, "unknown component type"),
            DiagnosticKind::MissingOverrideTarget => write!(f, "missing override target"),
        }
    }
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// The asset being converted when the problem was found.
    pub asset: AssetUuid,
    /// Human-readable details.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.asset, self.kind, self.message)
    }
}

/// An append-only collection of diagnostics.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records and logs a diagnostic.
    pub fn report(&mut self, kind: DiagnosticKind, asset: &AssetUuid, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            asset: asset.clone(),
            message: message.into(),
        };
        log::warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    /// How many diagnostics of `kind` were reported.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Iterates over every diagnostic in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// The total number of diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the collection.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
