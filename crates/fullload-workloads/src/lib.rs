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

//! # Fullload Workloads
//!
//! The built-in [`Workload`](fullload_core::Workload) implementations, the
//! tiered [`ComplexityTable`] that sizes them, and the [`WorkloadRegistry`]
//! that builds them by [`WorkloadKind`](fullload_core::WorkloadKind).
//!
//! Every workload follows the same loop shape: check the cancellation signal,
//! perform one small step, bump counters, log progress every tenth of the plan.

pub mod composite;
pub mod compute;
pub mod disk;
pub mod memory;
pub mod registry;
pub mod table;

mod progress;

pub use composite::Composite;
pub use compute::{
    Basic, HashCalculation, MatrixOperations, NeuralSimulation, NonceSearch, PrimeNumbers,
    Transcendental,
};
pub use disk::DiskIo;
pub use memory::MemoryChurn;
pub use registry::{WorkloadFactory, WorkloadOptions, WorkloadRegistry};
pub use table::ComplexityTable;
