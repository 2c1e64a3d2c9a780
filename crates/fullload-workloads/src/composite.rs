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


use std::path::PathBuf;

use fullload_core::{
    keys, CancellationSignal, ComplexityTier, TierSizes, Workload, WorkloadCounters,
    WorkloadExit, WorkloadKind, WorkloadResult,
};

use crate::compute::transcendental_step;
use crate::disk::{ScratchFile, DEFAULT_CHUNK_SIZE};
use crate::memory::{ChurnState, DEFAULT_BLOCK_SIZE, DEFAULT_WORKING_SET};
use crate::progress::ProgressMeter;

/// Transcendental evaluations per composite step.
const CPU_BATCH: u64 = 1_000;

/// CPU, memory and disk load interleaved in one loop.
///
/// Every step runs a batch of floating-point work, one allocation churn step
/// and one scratch-file chunk.
#[derive(Debug, Clone)]
pub struct Composite {
    sizes: TierSizes,
    directory: Option<PathBuf>,
    block_size: usize,
    chunk_size: usize,
    working_set: TierSizes,
}

impl Composite {
    pub fn new(sizes: TierSizes) -> Self {
        Self {
            sizes,
            directory: None,
            block_size: DEFAULT_BLOCK_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            working_set: DEFAULT_WORKING_SET,
        }
    }

    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_working_set(mut self, working_set: TierSizes) -> Self {
        self.working_set = working_set;
        self
    }
}

impl Workload for Composite {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Composite
    }

    fn run(
        &mut self,
        tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        let iterations = self.sizes.for_tier(tier);
        let mut memory = ChurnState::new(self.block_size, self.working_set.for_tier(tier));
        let mut scratch = ScratchFile::open(self.directory.as_deref(), self.chunk_size)?;
        let mut progress = ProgressMeter::new("Full load", iterations);
        for key in [
            keys::CALCULATIONS_PERFORMED,
            keys::BLOCKS_ALLOCATED,
            keys::BLOCKS_EVICTED,
            keys::BYTES_ALLOCATED,
            keys::BYTES_WRITTEN,
            keys::BYTES_READ,
        ] {
            counters.declare(key);
        }

        for i in 0..iterations {
            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            let base = i * CPU_BATCH;
            for j in base..base + CPU_BATCH {
                transcendental_step(j, counters)?;
            }
            memory.step(i, counters);
            scratch.step(i, counters)?;

            counters.increment(keys::ITERATIONS_COMPLETED);
            progress.tick(i);
        }
        Ok(WorkloadExit::Completed)
    }
}
