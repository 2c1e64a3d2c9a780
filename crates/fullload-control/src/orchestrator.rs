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


//! Wiring of sampler, governor and workload for one test run.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use fullload_core::{
    CancellationSignal, MetricsProbe, RunError, RunMode, RunOutcome, RunResult, StopReason,
    TestRunConfig, TestRunResult, WorkloadCounters, WorkloadExit,
};
use fullload_infra::SysinfoProbe;
use fullload_telemetry::{aggregate, ResourceSampler, SamplerConfig};
use fullload_workloads::WorkloadRegistry;

use crate::governor::DurationGovernor;
use crate::interrupt::InterruptHandle;
use crate::phase::{PhaseTracker, RunPhase};

/// Builds the metrics probe for one run.
pub type ProbeFactory = Box<dyn Fn() -> Box<dyn MetricsProbe> + Send + Sync>;

/// Configuration for the [`Orchestrator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Sampling cadence and ceiling.
    pub sampler: SamplerConfig,
}

/// Runs load tests, one at a time.
///
/// Each call to [`run_test`](Self::run_test) gets a fresh
/// [`CancellationSignal`] and fresh counters; nothing leaks from one run into
/// the next. A call made while another run is in flight on the same
/// orchestrator is rejected, so the [`InterruptHandle`] always targets exactly
/// one run.
pub struct Orchestrator {
    registry: WorkloadRegistry,
    probe_factory: ProbeFactory,
    config: OrchestratorConfig,
    interrupt: InterruptHandle,
}

impl Orchestrator {
    /// Creates an orchestrator drawing workloads from `registry` and a new
    /// probe from `probe_factory` for every run.
    pub fn new<F>(registry: WorkloadRegistry, probe_factory: F, config: OrchestratorConfig) -> Self
    where
        F: Fn() -> Box<dyn MetricsProbe> + Send + Sync + 'static,
    {
        Self {
            registry,
            probe_factory: Box::new(probe_factory),
            config,
            interrupt: InterruptHandle::new(),
        }
    }

    /// Creates an orchestrator sampling the host through sysinfo.
    pub fn with_sysinfo(registry: WorkloadRegistry, config: OrchestratorConfig) -> Self {
        Self::new(
            registry,
            || Box::new(SysinfoProbe::new()) as Box<dyn MetricsProbe>,
            config,
        )
    }

    /// Returns a handle that aborts the run in flight.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    /// Checks `config` against the registry and the sampler ceiling.
    pub fn validate(&self, config: &TestRunConfig) -> RunResult<()> {
        if !self.registry.contains(config.workload) {
            return Err(RunError::configuration(format!(
                "No workload registered for '{}'",
                config.workload
            )));
        }
        if config.mode == RunMode::Timed {
            let ceiling = self.config.sampler.max_test_duration;
            if config.duration.is_zero() {
                return Err(RunError::configuration(
                    "Timed runs need a duration greater than zero",
                ));
            }
            if config.duration > ceiling {
                return Err(RunError::configuration(format!(
                    "Duration {:.1}s exceeds the maximum of {:.1}s",
                    config.duration.as_secs_f64(),
                    ceiling.as_secs_f64()
                )));
            }
        }
        Ok(())
    }

    /// Runs one test to completion.
    ///
    /// Returns the aggregated result, which is marked interrupted if the
    /// [`InterruptHandle`] stopped it. Fails with
    /// [`RunError::Configuration`] before anything starts (including when
    /// another run is already in flight), with
    /// [`RunError::WorkloadFault`] if a workload step failed, or with
    /// [`RunError::EmptyMonitoringData`] if the sampler never captured a tick.
    pub fn run_test(&self, config: &TestRunConfig) -> RunResult<TestRunResult> {
        self.validate(config)?;
        let mut workload = self.registry.create(config.workload)?;
        let mut phase = PhaseTracker::default();

        let signal = CancellationSignal::new();
        let Some(_attached) = self.interrupt.attach(signal.clone()) else {
            return Err(RunError::configuration(
                "Another test is already running on this orchestrator",
            ));
        };
        log::info!(
            "Starting {} test: mode={}, complexity={}, load={}{}",
            config.workload,
            config.mode,
            config.complexity,
            config.load_profile,
            match config.mode {
                RunMode::Timed => format!(", duration={:.1}s", config.duration.as_secs_f64()),
                RunMode::Performance => String::new(),
            }
        );

        // 1. Background units.
        let started = Instant::now();
        let probe = (self.probe_factory)();
        log::debug!("Sampling through probe '{}'", probe.probe_id());
        let sampler = ResourceSampler::new(probe, self.config.sampler).spawn(signal.clone());
        let mut governor = match config.mode {
            RunMode::Timed => match DurationGovernor::timed(config.duration, signal.clone()) {
                Ok(governor) => Some(governor),
                Err(e) => {
                    log::error!("Failed to start duration governor: {}", e);
                    None
                }
            },
            RunMode::Performance => None,
        };
        phase.advance(RunPhase::SamplerStarted);

        // 2-3. The workload, on this thread.
        phase.advance(RunPhase::WorkloadRunning);
        let mut counters = WorkloadCounters::new();
        let ran = workload.run(config.complexity, &signal, &mut counters);
        phase.advance(RunPhase::WorkloadDone);

        // 4. Make sure the signal is raised.
        let fault = match ran {
            Ok(exit) => {
                match exit {
                    WorkloadExit::Completed => log::info!("Workload {} completed.", config.workload),
                    WorkloadExit::Cancelled => log::info!(
                        "Workload {} cancelled ({}).",
                        config.workload,
                        signal
                            .reason()
                            .map_or_else(|| "unknown".to_owned(), |r| r.to_string())
                    ),
                }
                match config.mode {
                    RunMode::Performance => {
                        signal.raise(StopReason::WorkloadCompleted);
                    }
                    RunMode::Timed => {
                        match governor.take() {
                            Some(governor) => governor.wait(),
                            None => wait_until(started + config.duration, &signal),
                        }
                        // No-op unless the fallback wait ran out the clock.
                        signal.raise(StopReason::DeadlineReached);
                    }
                }
                None
            }
            Err(e) => {
                log::error!("Workload {} failed: {}", config.workload, e);
                signal.raise(StopReason::WorkloadFault);
                Some(e)
            }
        };
        phase.advance(RunPhase::SignalRaised);

        // 5. Collect the sampler's buffer.
        let buffer = sampler.join();
        if let Some(governor) = governor.take() {
            governor.dismiss();
        }
        let actual_duration = started.elapsed();
        phase.advance(RunPhase::SamplerJoined);

        if let Some(source) = fault {
            return Err(RunError::WorkloadFault { source, counters });
        }

        // 6. Aggregate.
        let outcome = match signal.reason() {
            Some(StopReason::ExternalInterrupt) => RunOutcome::Interrupted,
            _ => RunOutcome::Completed,
        };
        if buffer.missed_ticks() > 0 {
            log::warn!("{} sampler ticks were skipped", buffer.missed_ticks());
        }
        let result = aggregate(config, &buffer, counters, actual_duration, outcome);
        phase.advance(RunPhase::Aggregated);

        match &result {
            Ok(result) => log::info!(
                "Test finished in {:.2}s: CPU avg {:.1}% / peak {:.1}%, memory avg {:.1}% / peak {:.1}%, {} samples",
                result.actual_duration.as_secs_f64(),
                result.cpu_avg,
                result.cpu_peak,
                result.mem_avg,
                result.mem_peak,
                result.sample_count
            ),
            Err(e) => log::warn!("{}", e),
        }
        result
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Sleeps until `deadline` unless `signal` is raised first.
fn wait_until(deadline: Instant, signal: &CancellationSignal) {
    const SLICE: Duration = Duration::from_millis(50);
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() || signal.is_raised() {
            return;
        }
        thread::sleep(remaining.min(SLICE));
    }
}
