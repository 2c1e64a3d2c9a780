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

//! The workload contract: a cancellable unit of synthetic load.
//!
//! Every workload advances in small steps, checks the run's
//! [`CancellationSignal`] between steps and records progress in a
//! [`WorkloadCounters`] map. Workloads never raise the signal themselves; natural
//! completion is reported through [`WorkloadExit::Completed`] and the
//! orchestrator decides what that means for the run.

pub mod complexity;
pub mod counters;
pub mod error;

pub use self::complexity::{ComplexityTier, TierSizes};
pub use self::counters::WorkloadCounters;
pub use self::error::{WorkloadError, WorkloadResult};

use crate::signal::CancellationSignal;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

/// How a workload's `run` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadExit {
    /// The planned problem size was fully processed.
    Completed,
    /// The cancellation signal was observed before the plan finished.
    Cancelled,
}

/// The core trait for a unit of synthetic load.
pub trait Workload: Send + Debug {
    /// Returns the kind this workload implements.
    fn kind(&self) -> WorkloadKind;

    /// Runs the workload on the calling thread.
    ///
    /// Implementations must check `signal.is_raised()` at least once per step
    /// and return [`WorkloadExit::Cancelled`] promptly once it is raised.
    fn run(
        &mut self,
        tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit>;
}

/// The closed set of built-in workload variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadKind {
    /// Simple integer arithmetic.
    Basic,
    /// SHA-256 over randomized payloads.
    HashCalculation,
    /// Proof-of-work style nonce search.
    #[serde(rename = "bitcoin_mining")]
    NonceSearch,
    /// Dense matrix multiply / inverse / eigenvalue rounds.
    MatrixOperations,
    /// Trial-division prime search.
    PrimeNumbers,
    /// Small feed-forward / back-propagation pass.
    NeuralSimulation,
    /// Transcendental-function CPU loop.
    #[serde(rename = "cpu_stress")]
    Transcendental,
    /// Allocate / aggregate / evict memory loop.
    #[serde(rename = "memory_stress")]
    MemoryChurn,
    /// Disk write-then-read loop.
    #[serde(rename = "disk_stress")]
    DiskIo,
    /// Interleaved CPU, memory and disk steps.
    #[serde(rename = "full_load")]
    Composite,
}

impl WorkloadKind {
    /// Every built-in kind, in presentation order.
    pub const ALL: [WorkloadKind; 10] = [
        WorkloadKind::Basic,
        WorkloadKind::HashCalculation,
        WorkloadKind::NonceSearch,
        WorkloadKind::MatrixOperations,
        WorkloadKind::PrimeNumbers,
        WorkloadKind::NeuralSimulation,
        WorkloadKind::Transcendental,
        WorkloadKind::MemoryChurn,
        WorkloadKind::DiskIo,
        WorkloadKind::Composite,
    ];

    /// Returns the stable string key used in configuration and file names.
    pub fn key(&self) -> &'static str {
        match self {
            WorkloadKind::Basic => "basic",
            WorkloadKind::HashCalculation => "hash_calculation",
            WorkloadKind::NonceSearch => "bitcoin_mining",
            WorkloadKind::MatrixOperations => "matrix_operations",
            WorkloadKind::PrimeNumbers => "prime_numbers",
            WorkloadKind::NeuralSimulation => "neural_simulation",
            WorkloadKind::Transcendental => "cpu_stress",
            WorkloadKind::MemoryChurn => "memory_stress",
            WorkloadKind::DiskIo => "disk_stress",
            WorkloadKind::Composite => "full_load",
        }
    }

    /// Returns a one-line, human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            WorkloadKind::Basic => "Basic performance test",
            WorkloadKind::HashCalculation => "SHA-256 hash calculation",
            WorkloadKind::NonceSearch => "Bitcoin mining simulation",
            WorkloadKind::MatrixOperations => "Matrix operations",
            WorkloadKind::PrimeNumbers => "Prime number search",
            WorkloadKind::NeuralSimulation => "Neural network simulation",
            WorkloadKind::Transcendental => "Transcendental math CPU stress",
            WorkloadKind::MemoryChurn => "Memory allocation churn",
            WorkloadKind::DiskIo => "Disk write/read loop",
            WorkloadKind::Composite => "Combined CPU, memory and disk load",
        }
    }
}

impl Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string does not name a known key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey {
    /// What kind of key was being parsed (e.g. "workload kind").
    pub what: &'static str,
    /// The rejected input.
    pub key: String,
}

impl Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {}: '{}'", self.what, self.key)
    }
}

impl std::error::Error for UnknownKey {}

impl FromStr for WorkloadKind {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        WorkloadKind::ALL
            .into_iter()
            .find(|kind| kind.key() == needle)
            .ok_or_else(|| UnknownKey {
                what: "workload kind",
                key: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_str() {
        for kind in WorkloadKind::ALL {
            assert_eq!(kind.key().parse::<WorkloadKind>(), Ok(kind));
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(
            "Bitcoin_Mining".parse::<WorkloadKind>(),
            Ok(WorkloadKind::NonceSearch)
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "quantum_annealing".parse::<WorkloadKind>().unwrap_err();
        assert_eq!(err.what, "workload kind");
        assert_eq!(err.to_string(), "Unknown workload kind: 'quantum_annealing'");
    }
}
