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


//! Allocation churn over a bounded working set.

use std::collections::VecDeque;
use std::hint::black_box;

use fullload_core::{
    keys, CancellationSignal, ComplexityTier, TierSizes, Workload, WorkloadCounters,
    WorkloadExit, WorkloadKind, WorkloadResult,
};

use crate::progress::ProgressMeter;

const MIB: u64 = 1024 * 1024;
const PAGE: usize = 4096;

/// Default size of one allocated block.
pub const DEFAULT_BLOCK_SIZE: usize = MIB as usize;

/// Default resident limit per tier: 64, 256 and 1024 MiB.
pub const DEFAULT_WORKING_SET: TierSizes = TierSizes::new(64 * MIB, 256 * MIB, 1024 * MIB);

/// The resident blocks of a churn loop.
///
/// Each step allocates one block, writes every page of it, folds a checksum
/// across it, and evicts the oldest blocks once the resident size exceeds the
/// working set.
#[derive(Debug)]
pub(crate) struct ChurnState {
    blocks: VecDeque<Vec<u8>>,
    block_size: usize,
    max_blocks: usize,
}

impl ChurnState {
    pub(crate) fn new(block_size: usize, working_set: u64) -> Self {
        let block_size = block_size.max(1);
        let max_blocks = (working_set / block_size as u64).max(1) as usize;
        Self {
            blocks: VecDeque::with_capacity(max_blocks.min(1024)),
            block_size,
            max_blocks,
        }
    }

    pub(crate) fn resident_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub(crate) fn step(&mut self, step: u64, counters: &mut WorkloadCounters) -> u64 {
        let mut block = vec![0u8; self.block_size];
        let fill = (step % 251) as u8;
        for page in block.chunks_mut(PAGE) {
            page[0] = fill;
            if let Some(last) = page.last_mut() {
                *last = fill.wrapping_add(1);
            }
        }
        let checksum = block
            .chunks(PAGE)
            .map(|page| page[0] as u64 + page[page.len() - 1] as u64)
            .sum::<u64>();

        self.blocks.push_back(block);
        counters.increment(keys::BLOCKS_ALLOCATED);
        counters.add(keys::BYTES_ALLOCATED, self.block_size as u64);

        while self.blocks.len() > self.max_blocks {
            self.blocks.pop_front();
            counters.increment(keys::BLOCKS_EVICTED);
        }
        black_box(checksum)
    }
}

/// Memory pressure through repeated allocation and eviction.
#[derive(Debug, Clone)]
pub struct MemoryChurn {
    sizes: TierSizes,
    block_size: usize,
    working_set: TierSizes,
}

impl MemoryChurn {
    pub fn new(sizes: TierSizes) -> Self {
        Self {
            sizes,
            block_size: DEFAULT_BLOCK_SIZE,
            working_set: DEFAULT_WORKING_SET,
        }
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Sets the resident byte limit per tier.
    pub fn with_working_set(mut self, working_set: TierSizes) -> Self {
        self.working_set = working_set;
        self
    }
}

impl Workload for MemoryChurn {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::MemoryChurn
    }

    fn run(
        &mut self,
        tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        let iterations = self.sizes.for_tier(tier);
        let mut state = ChurnState::new(self.block_size, self.working_set.for_tier(tier));
        let mut progress = ProgressMeter::new("Memory", iterations);
        counters.declare(keys::BLOCKS_ALLOCATED);
        counters.declare(keys::BLOCKS_EVICTED);
        counters.declare(keys::BYTES_ALLOCATED);

        for i in 0..iterations {
            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            state.step(i, counters);
            counters.increment(keys::ITERATIONS_COMPLETED);
            if progress.tick(i) {
                log::debug!("Resident blocks: {}", state.resident_blocks());
            }
        }
        Ok(WorkloadExit::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_set_bounds_residency() {
        let mut state = ChurnState::new(1024, 4 * 1024);
        let mut counters = WorkloadCounters::new();
        for i in 0..10 {
            state.step(i, &mut counters);
        }
        assert_eq!(state.resident_blocks(), 4);
        assert_eq!(counters.get(keys::BLOCKS_ALLOCATED), 10);
        assert_eq!(counters.get(keys::BLOCKS_EVICTED), 6);
        assert_eq!(counters.get(keys::BYTES_ALLOCATED), 10 * 1024);
    }

    #[test]
    fn run_reports_every_counter() {
        let mut workload = MemoryChurn::new(TierSizes::uniform(8))
            .with_block_size(64 * 1024)
            .with_working_set(TierSizes::uniform(128 * 1024));
        let mut counters = WorkloadCounters::new();
        let exit = workload
            .run(ComplexityTier::Easy, &CancellationSignal::new(), &mut counters)
            .unwrap();

        assert_eq!(exit, WorkloadExit::Completed);
        assert_eq!(counters.get(keys::ITERATIONS_COMPLETED), 8);
        assert_eq!(counters.get(keys::BLOCKS_EVICTED), 6);
    }
}
