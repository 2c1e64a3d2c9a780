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

use std::hint::black_box;

use fullload_core::{
    keys, CancellationSignal, ComplexityTier, TierSizes, Workload, WorkloadCounters,
    WorkloadExit, WorkloadKind, WorkloadResult,
};

use crate::progress::ProgressMeter;

/// Plain integer arithmetic: `((i * 2 + 1)^2) mod 1_000_000`.
#[derive(Debug, Clone)]
pub struct Basic {
    sizes: TierSizes,
}

impl Basic {
    pub fn new(sizes: TierSizes) -> Self {
        Self { sizes }
    }
}

impl Workload for Basic {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Basic
    }

    fn run(
        &mut self,
        tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        let iterations = self.sizes.for_tier(tier);
        let mut progress = ProgressMeter::new("Basic test", iterations);
        counters.declare(keys::ITERATIONS_COMPLETED);

        for i in 0..iterations {
            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            let mut result = i.wrapping_mul(2).wrapping_add(1);
            result = result.wrapping_mul(result);
            result %= 1_000_000;
            black_box(result);

            counters.increment(keys::ITERATIONS_COMPLETED);
            counters.add(keys::CALCULATIONS_PERFORMED, 3);
            progress.tick(i);
        }
        Ok(WorkloadExit::Completed)
    }
}
