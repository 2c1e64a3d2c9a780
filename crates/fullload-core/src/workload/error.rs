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

//! Unrecoverable workload step failures.

use std::fmt;
use std::io;

/// A specialized `Result` type for workload execution.
pub type WorkloadResult<T> = Result<T, WorkloadError>;

/// An unrecoverable error raised inside a workload step.
#[derive(Debug)]
pub enum WorkloadError {
    /// A computation produced NaN or infinity.
    NonFinite {
        /// The computation stage that produced the value.
        stage: &'static str,
    },
    /// An I/O operation failed.
    Io {
        /// What the workload was doing.
        context: String,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// Data read back from disk did not match what was written.
    Corruption {
        /// Byte offset of the corrupted chunk.
        offset: u64,
    },
}

impl WorkloadError {
    /// Wraps an I/O error with a short description of the failed operation.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        WorkloadError::Io {
            context: context.into(),
            source,
        }
    }
}

impl fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadError::NonFinite { stage } => {
                write!(f, "Non-finite numeric state during {stage}")
            }
            WorkloadError::Io { context, source } => write!(f, "I/O failure while {context}: {source}"),
            WorkloadError::Corruption { offset } => {
                write!(f, "Read-back mismatch at byte offset {offset}")
            }
        }
    }
}

impl std::error::Error for WorkloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkloadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
