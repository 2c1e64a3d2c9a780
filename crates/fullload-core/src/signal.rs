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

//! The per-run, one-shot cancellation signal.
//!
//! A [`CancellationSignal`] starts in the "running" state and flips exactly once
//! to "stopped". Every clone shares the same state, so the sampler, the workload,
//! the duration governor and an external interrupt handler all observe the same
//! transition. The first writer also records a [`StopReason`]; later raises are
//! no-ops and never overwrite it.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const RUNNING: u8 = 0;

/// Why a run's cancellation signal was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StopReason {
    /// The timed-mode duration budget elapsed.
    DeadlineReached = 1,
    /// The workload ran to natural completion (performance mode).
    WorkloadCompleted = 2,
    /// The workload failed with an unrecoverable error.
    WorkloadFault = 3,
    /// An operator aborted the run from outside the orchestrator.
    ExternalInterrupt = 4,
}

impl StopReason {
    fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(StopReason::DeadlineReached),
            2 => Some(StopReason::WorkloadCompleted),
            3 => Some(StopReason::WorkloadFault),
            4 => Some(StopReason::ExternalInterrupt),
            _ => None,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StopReason::DeadlineReached => "deadline reached",
            StopReason::WorkloadCompleted => "workload completed",
            StopReason::WorkloadFault => "workload fault",
            StopReason::ExternalInterrupt => "external interrupt",
        };
        f.write_str(label)
    }
}

/// A shared, monotonic stop flag for a single test run.
///
/// Raising uses release ordering and reading uses acquire ordering, so any
/// thread that observes the raised state also observes everything the raising
/// thread wrote before it.
#[derive(Clone, Default)]
pub struct CancellationSignal {
    state: Arc<AtomicU8>,
}

impl CancellationSignal {
    /// Creates a fresh signal in the running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal with the given reason.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// signal had already been raised (in which case nothing changes).
    pub fn raise(&self, reason: StopReason) -> bool {
        let raised = self
            .state
            .compare_exchange(RUNNING, reason as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if raised {
            log::debug!("Cancellation signal raised: {reason}");
        }
        raised
    }

    /// Returns `true` once the signal has been raised.
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.state.load(Ordering::Acquire) != RUNNING
    }

    /// Returns the reason recorded by the first raise, if any.
    pub fn reason(&self) -> Option<StopReason> {
        StopReason::from_raw(self.state.load(Ordering::Acquire))
    }
}

impl fmt::Debug for CancellationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSignal")
            .field("reason", &self.reason())
            .finish()
    }
}
