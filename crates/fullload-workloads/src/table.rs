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

//! The tiered problem-size table.

use fullload_core::{ComplexityTier, TierSizes, WorkloadKind};
use std::collections::HashMap;

/// Per-kind [`TierSizes`].
///
/// What a size means depends on the kind: an iteration count for most
/// workloads, the matrix side for [`WorkloadKind::MatrixOperations`], the
/// exclusive upper bound for [`WorkloadKind::PrimeNumbers`], and the number of
/// 1 MiB chunks for [`WorkloadKind::DiskIo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexityTable {
    sizes: HashMap<WorkloadKind, TierSizes>,
}

impl ComplexityTable {
    /// Built-in size for `kind`.
    pub const fn builtin(kind: WorkloadKind) -> TierSizes {
        match kind {
            WorkloadKind::Basic | WorkloadKind::HashCalculation | WorkloadKind::NeuralSimulation => {
                TierSizes::new(100_000, 1_000_000, 10_000_000)
            }
            WorkloadKind::NonceSearch => TierSizes::new(100_000, 500_000, 2_000_000),
            WorkloadKind::MatrixOperations => TierSizes::new(100, 500, 1_000),
            WorkloadKind::PrimeNumbers => TierSizes::new(100_000, 1_000_000, 5_000_000),
            WorkloadKind::Transcendental => TierSizes::new(1_000_000, 10_000_000, 100_000_000),
            WorkloadKind::MemoryChurn => TierSizes::new(2_000, 10_000, 50_000),
            WorkloadKind::DiskIo => TierSizes::new(64, 512, 2_048),
            WorkloadKind::Composite => TierSizes::new(500, 5_000, 20_000),
        }
    }

    /// Returns the sizes configured for `kind`.
    pub fn sizes(&self, kind: WorkloadKind) -> TierSizes {
        self.sizes
            .get(&kind)
            .copied()
            .unwrap_or_else(|| Self::builtin(kind))
    }

    /// Returns the single size selected by `kind` and `tier`.
    pub fn size(&self, kind: WorkloadKind, tier: ComplexityTier) -> u64 {
        self.sizes(kind).for_tier(tier)
    }

    /// Overrides the sizes for `kind`.
    pub fn set(&mut self, kind: WorkloadKind, sizes: TierSizes) {
        log::debug!("Complexity override for {kind}: {sizes:?}");
        self.sizes.insert(kind, sizes);
    }
}

impl Default for ComplexityTable {
    fn default() -> Self {
        let sizes = WorkloadKind::ALL
            .into_iter()
            .map(|kind| (kind, Self::builtin(kind)))
            .collect();
        Self { sizes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_builtin_table() {
        let table = ComplexityTable::default();
        assert_eq!(
            table.size(WorkloadKind::NonceSearch, ComplexityTier::Medium),
            500_000
        );
        assert_eq!(
            table.size(WorkloadKind::MatrixOperations, ComplexityTier::Hard),
            1_000
        );
        assert_eq!(
            table.size(WorkloadKind::PrimeNumbers, ComplexityTier::Easy),
            100_000
        );
    }

    #[test]
    fn override_replaces_one_kind() {
        let mut table = ComplexityTable::default();
        table.set(WorkloadKind::Basic, TierSizes::uniform(42));
        assert_eq!(table.size(WorkloadKind::Basic, ComplexityTier::Hard), 42);
        assert_eq!(
            table.size(WorkloadKind::HashCalculation, ComplexityTier::Hard),
            10_000_000
        );
    }
}
