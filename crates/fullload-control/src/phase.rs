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


use std::fmt;

/// The lifecycle of one test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunPhase {
    /// The run has a validated configuration and nothing is running yet.
    #[default]
    Configured,
    /// The sampler (and the governor, in timed mode) is running.
    SamplerStarted,
    /// The workload is executing on the calling thread.
    WorkloadRunning,
    /// The workload returned.
    WorkloadDone,
    /// The cancellation signal is raised.
    SignalRaised,
    /// The sampler thread has exited and handed over its buffer.
    SamplerJoined,
    /// The result has been produced. Terminal.
    Aggregated,
}

impl RunPhase {
    /// Returns `true` if moving from `self` to `next` is allowed.
    ///
    /// The run advances strictly forward one phase at a time.
    pub fn can_transition_to(self, next: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (self, next),
            (Configured, SamplerStarted)
                | (SamplerStarted, WorkloadRunning)
                | (WorkloadRunning, WorkloadDone)
                | (WorkloadDone, SignalRaised)
                | (SignalRaised, SamplerJoined)
                | (SamplerJoined, Aggregated)
        )
    }

    /// Returns `true` for the terminal phase.
    pub fn is_terminal(self) -> bool {
        self == RunPhase::Aggregated
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Tracks the current [`RunPhase`] and logs every transition.
#[derive(Debug, Default)]
pub(crate) struct PhaseTracker {
    phase: RunPhase,
}

impl PhaseTracker {
    #[cfg(test)]
    pub(crate) fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Moves to `next`. Invalid transitions are logged and still applied,
    /// since the orchestrator drives them in a fixed order.
    pub(crate) fn advance(&mut self, next: RunPhase) {
        if self.phase.can_transition_to(next) {
            log::debug!("Run phase: {} → {}", self.phase, next);
        } else {
            log::warn!("Run phase: invalid transition {} → {}", self.phase, next);
        }
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: [RunPhase; 7] = [
        RunPhase::Configured,
        RunPhase::SamplerStarted,
        RunPhase::WorkloadRunning,
        RunPhase::WorkloadDone,
        RunPhase::SignalRaised,
        RunPhase::SamplerJoined,
        RunPhase::Aggregated,
    ];

    #[test]
    fn test_forward_chain_is_valid() {
        for pair in ORDER.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} → {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_skips_and_reversals_are_rejected() {
        assert!(!RunPhase::Configured.can_transition_to(RunPhase::WorkloadRunning));
        assert!(!RunPhase::SamplerJoined.can_transition_to(RunPhase::SignalRaised));
        assert!(!RunPhase::Aggregated.can_transition_to(RunPhase::Configured));
        assert!(RunPhase::Aggregated.is_terminal());
    }

    #[test]
    fn test_tracker_follows_advances() {
        let mut tracker = PhaseTracker::default();
        for phase in &ORDER[1..] {
            tracker.advance(*phase);
        }
        assert_eq!(tracker.phase(), RunPhase::Aggregated);
    }
}
