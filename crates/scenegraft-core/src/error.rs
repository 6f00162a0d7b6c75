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

//! The error type for failures that stop the conversion of an asset or a batch.

use std::path::PathBuf;
use thiserror::Error;

/// A failure that cannot be downgraded to a [`crate::Diagnostic`].
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The source graph has no usable content root, or is not a graph at all.
    ///
    /// Fatal for the affected asset only; the batch loop logs it and moves on.
    #[error("malformed element graph in '{asset}': {reason}")]
    MalformedGraph {
        /// A label for the asset (its uuid or path).
        asset: String,
        /// What is wrong with it.
        reason: String,
    },
    /// Reading a source file or writing an output file failed.
    ///
    /// Propagated to the caller of the batch.
    #[error("I/O failure on {path:?}: {source}")]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Encoding an output document failed.
    #[error("failed to encode output document: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConversionError {
    /// Convenience constructor for [`ConversionError::MalformedGraph`].
    pub fn malformed(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        ConversionError::MalformedGraph {
            asset: asset.into(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`ConversionError::Io`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConversionError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is confined to a single asset.
    ///
    /// Everything except [`ConversionError::Io`] is.
    pub fn is_per_asset(&self) -> bool {
        !matches!(self, ConversionError::Io { .. })
    }
}
