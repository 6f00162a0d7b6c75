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

//! Output node id allocation.

use crate::ids::ShortId;

/// Hands out batch-unique [`ShortId`]s.
///
/// Implementations must never return the same id twice for the lifetime of the
/// allocator. No ordering between ids is implied.
pub trait IdAllocator: Send {
    /// Returns a fresh id.
    fn next_short_id(&mut self) -> ShortId;
}

/// The default allocator: a monotonically increasing counter.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Creates an allocator whose first id is `start`.
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdAllocator for SequentialIds {
    fn next_short_id(&mut self) -> ShortId {
        let id = ShortId(self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sequential_ids_never_repeat() {
        let mut ids = SequentialIds::default();
        let seen: HashSet<ShortId> = (0..1000).map(|_| ids.next_short_id()).collect();
        assert_eq!(seen.len(), 1000);
    }
}
