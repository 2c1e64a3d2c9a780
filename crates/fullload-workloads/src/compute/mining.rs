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

//! Proof-of-work style nonce search.
//!
//! Each step hashes `block_data_{header:016x}_{nonce}` with SHA-256, where
//! `header` is drawn once per run from the (optionally seeded) generator. A
//! block is found when the digest starts with `difficulty` zero nibbles, i.e.
//! its hex form starts with that many `'0'` characters.

use std::fmt::Write as _;

use fullload_core::{
    keys, CancellationSignal, ComplexityTier, TierSizes, Workload, WorkloadCounters,
    WorkloadExit, WorkloadKind, WorkloadResult,
};
use rand::Rng;
use sha2::{Digest, Sha256};

use super::seeded_rng;
use crate::progress::ProgressMeter;

/// Default number of leading zero nibbles a digest needs to count as a block.
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Counts the leading zero hex digits of `digest`.
pub fn leading_zero_nibbles(digest: &[u8]) -> u32 {
    let mut nibbles = 0;
    for byte in digest {
        if *byte == 0 {
            nibbles += 2;
            continue;
        }
        if byte >> 4 == 0 {
            nibbles += 1;
        }
        break;
    }
    nibbles
}

/// Simulated block mining.
#[derive(Debug, Clone)]
pub struct NonceSearch {
    sizes: TierSizes,
    seed: Option<u64>,
    difficulty: u32,
}

impl NonceSearch {
    pub fn new(sizes: TierSizes) -> Self {
        Self {
            sizes,
            seed: None,
            difficulty: DEFAULT_DIFFICULTY,
        }
    }

    /// Fixes the block header so the search is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets how many leading zero nibbles a block needs.
    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }
}

impl Workload for NonceSearch {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::NonceSearch
    }

    fn run(
        &mut self,
        tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        let iterations = self.sizes.for_tier(tier);
        let header: u64 = seeded_rng(self.seed).gen();
        let mut progress = ProgressMeter::new("Mining", iterations);
        let mut payload = String::with_capacity(48);
        counters.declare(keys::HASHES_CALCULATED);
        counters.declare(keys::BLOCKS_FOUND);

        for nonce in 0..iterations {
            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            payload.clear();
            let _ = write!(payload, "block_data_{header:016x}_{nonce}");
            let digest = Sha256::digest(payload.as_bytes());
            counters.increment(keys::HASHES_CALCULATED);

            if leading_zero_nibbles(&digest) >= self.difficulty {
                counters.increment(keys::BLOCKS_FOUND);
                log::debug!(
                    "Block found! Nonce: {}, Hash: {}...",
                    nonce,
                    &hex::encode(digest)[..16]
                );
            }

            counters.increment(keys::ITERATIONS_COMPLETED);
            progress.tick(nonce);
        }
        Ok(WorkloadExit::Completed)
    }
}
