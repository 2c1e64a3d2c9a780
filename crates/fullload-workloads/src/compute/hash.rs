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

use std::fmt::Write as _;

use fullload_core::{
    keys, CancellationSignal, ComplexityTier, TierSizes, Workload, WorkloadCounters,
    WorkloadExit, WorkloadKind, WorkloadResult,
};
use rand::Rng;
use sha2::{Digest, Sha256};

use super::seeded_rng;
use crate::progress::ProgressMeter;

/// SHA-256 over `test_data_{i}_{random}` payloads.
#[derive(Debug, Clone)]
pub struct HashCalculation {
    sizes: TierSizes,
    seed: Option<u64>,
}

impl HashCalculation {
    pub fn new(sizes: TierSizes) -> Self {
        Self { sizes, seed: None }
    }

    /// Makes the random payload suffixes reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Workload for HashCalculation {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::HashCalculation
    }

    fn run(
        &mut self,
        tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        let iterations = self.sizes.for_tier(tier);
        let mut rng = seeded_rng(self.seed);
        let mut progress = ProgressMeter::new("Hash", iterations);
        let mut payload = String::with_capacity(48);
        counters.declare(keys::HASHES_CALCULATED);

        for i in 0..iterations {
            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            payload.clear();
            let _ = write!(payload, "test_data_{}_{}", i, rng.gen_range(1..=1_000_000u32));
            let digest = Sha256::digest(payload.as_bytes());

            counters.increment(keys::HASHES_CALCULATED);
            counters.increment(keys::ITERATIONS_COMPLETED);
            if progress.tick(i) {
                log::debug!("Hash {}: {}...", i, &hex::encode(digest)[..16]);
            }
        }
        Ok(WorkloadExit::Completed)
    }
}
