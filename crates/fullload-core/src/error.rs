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

//! Run-level error conditions.
//!
//! Sensor failures never appear here: they are absorbed by the sampler and
//! surface only as absent readings. An operator interrupt is not an error
//! either; it yields a result marked [`RunOutcome::Interrupted`].
//!
//! [`RunOutcome::Interrupted`]: crate::run::RunOutcome::Interrupted

use crate::workload::{UnknownKey, WorkloadCounters, WorkloadError};
use std::fmt::{self, Display};
use std::time::Duration;

/// A specialized `Result` type for run entry points.
pub type RunResult<T> = Result<T, RunError>;

/// An error that prevents a run from producing a [`TestRunResult`].
///
/// [`TestRunResult`]: crate::run::TestRunResult
#[derive(Debug)]
pub enum RunError {
    /// The configuration named something unknown or out of range.
    /// The run never started.
    Configuration(String),
    /// The sampler produced no tick at all.
    EmptyMonitoringData {
        /// Wall-clock duration of the run.
        actual_duration: Duration,
        /// Counters reported by the workload.
        counters: WorkloadCounters,
    },
    /// A workload step failed; the run was aborted.
    WorkloadFault {
        /// The underlying workload error.
        source: WorkloadError,
        /// Counters accumulated up to the failure.
        counters: WorkloadCounters,
    },
}

impl RunError {
    /// Creates a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        RunError::Configuration(msg.into())
    }

    /// Returns the partial counters carried by this error, if the run started.
    pub fn counters(&self) -> Option<&WorkloadCounters> {
        match self {
            RunError::Configuration(_) => None,
            RunError::EmptyMonitoringData { counters, .. } => Some(counters),
            RunError::WorkloadFault { counters, .. } => Some(counters),
        }
    }
}

impl Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            RunError::EmptyMonitoringData {
                actual_duration, ..
            } => write!(
                f,
                "No monitoring data collected during {:.2}s run",
                actual_duration.as_secs_f64()
            ),
            RunError::WorkloadFault { source, .. } => write!(f, "Workload fault: {source}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::WorkloadFault { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<UnknownKey> for RunError {
    fn from(err: UnknownKey) -> Self {
        RunError::Configuration(err.to_string())
    }
}
