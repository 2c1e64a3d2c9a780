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
    WorkloadError, WorkloadExit, WorkloadKind, WorkloadResult,
};

use crate::progress::ProgressMeter;

/// Floating-point operations per step.
const OPS_PER_STEP: u64 = 5;

/// One mixed sin/cos/ln/sqrt/exp evaluation for step `i`.
pub(crate) fn transcendental_step(i: u64, counters: &mut WorkloadCounters) -> WorkloadResult<f64> {
    let x = (i % 10_000) as f64 * 1e-3 + 1.0;
    let value = x.sin() * x.cos() + x.ln() + x.sqrt() - (x * 1e-2).exp();
    if !value.is_finite() {
        return Err(WorkloadError::NonFinite {
            stage: "transcendental step",
        });
    }
    counters.add(keys::CALCULATIONS_PERFORMED, OPS_PER_STEP);
    Ok(black_box(value))
}

/// Sustained floating-point load from transcendental functions.
#[derive(Debug, Clone)]
pub struct Transcendental {
    sizes: TierSizes,
}

impl Transcendental {
    pub fn new(sizes: TierSizes) -> Self {
        Self { sizes }
    }
}

impl Workload for Transcendental {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Transcendental
    }

    fn run(
        &mut self,
        tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        let iterations = self.sizes.for_tier(tier);
        let mut progress = ProgressMeter::new("CPU stress", iterations);
        counters.declare(keys::CALCULATIONS_PERFORMED);

        for i in 0..iterations {
            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            transcendental_step(i, counters)?;
            counters.increment(keys::ITERATIONS_COMPLETED);
            progress.tick(i);
        }
        Ok(WorkloadExit::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_step_counts_five_operations() {
        let mut workload = Transcendental::new(TierSizes::uniform(20));
        let mut counters = WorkloadCounters::new();
        workload
            .run(ComplexityTier::Hard, &CancellationSignal::new(), &mut counters)
            .unwrap();
        assert_eq!(counters.get(keys::CALCULATIONS_PERFORMED), 100);
        assert_eq!(counters.get(keys::ITERATIONS_COMPLETED), 20);
    }
}
