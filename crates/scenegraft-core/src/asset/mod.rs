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

//! Cross-asset vocabulary: stable asset identities and the resolver contract.
//!
//! The conversion engine never opens other files itself. Whenever a record links
//! to another asset through `{uuid}`, the link is remapped and checked through
//! an [`AssetResolver`] supplied by the upstream import stage.

mod metadata;
mod resolver;
mod uuid;

pub use self::metadata::*;
pub use self::resolver::*;
pub use self::uuid::*;
