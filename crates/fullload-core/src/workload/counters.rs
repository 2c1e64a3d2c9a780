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

//! Named progress counters reported by a running workload.

use serde::Serialize;
use std::collections::BTreeMap;

/// Well-known counter names.
pub mod keys {
    /// Steps fully completed; maintained by every workload.
    pub const ITERATIONS_COMPLETED: &str = "iterations_completed";
    /// Arithmetic operations performed.
    pub const CALCULATIONS_PERFORMED: &str = "calculations_performed";
    /// Digests computed.
    pub const HASHES_CALCULATED: &str = "hashes_calculated";
    /// Digests meeting the nonce-search difficulty.
    pub const BLOCKS_FOUND: &str = "blocks_found";
    /// Matrix products computed.
    pub const MATRICES_MULTIPLIED: &str = "matrices_multiplied";
    /// Matrix inversions computed.
    pub const MATRICES_INVERTED: &str = "matrices_inverted";
    /// Matrices found to be singular.
    pub const SINGULAR_MATRICES: &str = "singular_matrices";
    /// Power-iteration eigenvalue passes completed.
    pub const EIGENVALUE_PASSES: &str = "eigenvalue_passes";
    /// Candidates checked for primality.
    pub const NUMBERS_TESTED: &str = "numbers_tested";
    /// Primes found.
    pub const PRIMES_FOUND: &str = "primes_found";
    /// Forward passes through the toy network.
    pub const FORWARD_PASSES: &str = "forward_passes";
    /// Back-propagation passes through the toy network.
    pub const BACKWARD_PASSES: &str = "backward_passes";
    /// Memory blocks allocated.
    pub const BLOCKS_ALLOCATED: &str = "blocks_allocated";
    /// Memory blocks released from the working set.
    pub const BLOCKS_EVICTED: &str = "blocks_evicted";
    /// Bytes allocated.
    pub const BYTES_ALLOCATED: &str = "bytes_allocated";
    /// Bytes written to disk.
    pub const BYTES_WRITTEN: &str = "bytes_written";
    /// Bytes read back from disk.
    pub const BYTES_READ: &str = "bytes_read";
}

/// A map of named `u64` counters.
///
/// Owned exclusively by the running workload through `&mut`, then read-only
/// once the workload returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkloadCounters {
    values: BTreeMap<String, u64>,
}

impl WorkloadCounters {
    /// Creates an empty counter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the named counter, creating it at zero first.
    pub fn add(&mut self, key: &str, amount: u64) {
        match self.values.get_mut(key) {
            Some(value) => *value = value.saturating_add(amount),
            None => {
                self.values.insert(key.to_owned(), amount);
            }
        }
    }

    /// Adds one to the named counter.
    #[inline]
    pub fn increment(&mut self, key: &str) {
        self.add(key, 1);
    }

    /// Makes sure the named counter exists, so it is reported even at zero.
    pub fn declare(&mut self, key: &str) {
        self.add(key, 0);
    }

    /// Returns the value of the named counter, zero if it was never touched.
    pub fn get(&self, key: &str) -> u64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    /// Returns `true` if no counter was ever declared.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over counters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
