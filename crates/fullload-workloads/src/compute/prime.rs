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


use fullload_core::{
    keys, CancellationSignal, ComplexityTier, TierSizes, Workload, WorkloadCounters,
    WorkloadExit, WorkloadKind, WorkloadResult,
};

use crate::progress::ProgressMeter;

/// Trial-division primality test.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut divisor = 3;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Counts the primes in `[2, max)`, where `max` is the tier size.
#[derive(Debug, Clone)]
pub struct PrimeNumbers {
    sizes: TierSizes,
}

impl PrimeNumbers {
    pub fn new(sizes: TierSizes) -> Self {
        Self { sizes }
    }
}

impl Workload for PrimeNumbers {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::PrimeNumbers
    }

    fn run(
        &mut self,
        tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        let max = self.sizes.for_tier(tier);
        let mut progress = ProgressMeter::new("Primes", max);
        counters.declare(keys::NUMBERS_TESTED);
        counters.declare(keys::PRIMES_FOUND);

        for n in 2..max {
            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            if is_prime(n) {
                counters.increment(keys::PRIMES_FOUND);
            }
            counters.increment(keys::NUMBERS_TESTED);
            counters.increment(keys::ITERATIONS_COMPLETED);
            if progress.tick(n) {
                log::debug!("Primes found so far: {}", counters.get(keys::PRIMES_FOUND));
            }
        }
        Ok(WorkloadExit::Completed)
    }
}
