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

//! # Fullload Core
//!
//! Foundational crate containing the traits, core types, and interface
//! contracts shared by every part of a load test run: the cancellation
//! signal, the metrics probe and sample buffer, the workload contract, and the
//! run configuration, result and error types.

#![warn(missing_docs)]

pub mod error;
pub mod run;
pub mod signal;
pub mod telemetry;
pub mod workload;

pub use error::{RunError, RunResult};
pub use run::{LoadProfile, RunMode, RunOutcome, TestRunConfig, TestRunResult};
pub use signal::{CancellationSignal, StopReason};
pub use telemetry::{MetricsProbe, ProbeError, ResourceSample, SampleBuffer, SensorReadout};
pub use workload::{
    counters::keys, ComplexityTier, TierSizes, UnknownKey, Workload, WorkloadCounters,
    WorkloadError, WorkloadExit, WorkloadKind, WorkloadResult,
};
