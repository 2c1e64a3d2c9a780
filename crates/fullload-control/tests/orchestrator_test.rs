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


use std::borrow::Cow;
use std::thread;
use std::time::{Duration, Instant};

use fullload_control::{Orchestrator, OrchestratorConfig};
use fullload_core::{
    keys, CancellationSignal, ComplexityTier, MetricsProbe, ProbeError, RunError, RunMode,
    RunOutcome, SensorReadout, TestRunConfig, Workload, WorkloadCounters, WorkloadError,
    WorkloadExit, WorkloadKind, WorkloadResult,
};
use fullload_telemetry::SamplerConfig;
use fullload_workloads::WorkloadRegistry;

// --- TEST DOUBLES ---

/// A host with steady readings and no temperature sensors.
#[derive(Debug, Default)]
struct SensorlessProbe;

impl MetricsProbe for SensorlessProbe {
    fn probe_id(&self) -> Cow<'static, str> {
        Cow::Borrowed("sensorless")
    }

    fn cpu_percent(&mut self) -> Result<f64, ProbeError> {
        Ok(75.0)
    }

    fn memory_percent(&mut self) -> Result<f64, ProbeError> {
        Ok(30.0)
    }

    fn temperatures(&mut self) -> SensorReadout {
        SensorReadout::Unavailable
    }
}

/// A host whose metrics backend never answers.
#[derive(Debug, Default)]
struct BrokenProbe;

impl MetricsProbe for BrokenProbe {
    fn probe_id(&self) -> Cow<'static, str> {
        Cow::Borrowed("broken")
    }

    fn cpu_percent(&mut self) -> Result<f64, ProbeError> {
        Err(ProbeError::Unsupported("cpu"))
    }

    fn memory_percent(&mut self) -> Result<f64, ProbeError> {
        Err(ProbeError::Unsupported("memory"))
    }

    fn temperatures(&mut self) -> SensorReadout {
        SensorReadout::Unavailable
    }
}

/// Completes after exactly `steps` counted iterations.
#[derive(Debug)]
struct Counting {
    steps: u64,
}

impl Workload for Counting {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Basic
    }

    fn run(
        &mut self,
        _tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        for _ in 0..self.steps {
            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            counters.increment(keys::ITERATIONS_COMPLETED);
        }
        Ok(WorkloadExit::Completed)
    }
}

/// Runs until cancelled.
#[derive(Debug)]
struct Endless;

impl Workload for Endless {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Basic
    }

    fn run(
        &mut self,
        _tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        while !signal.is_raised() {
            counters.increment(keys::ITERATIONS_COMPLETED);
            thread::yield_now();
        }
        Ok(WorkloadExit::Cancelled)
    }
}

/// Fails on its sixth step.
#[derive(Debug)]
struct Faulty;

impl Workload for Faulty {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Basic
    }

    fn run(
        &mut self,
        _tier: ComplexityTier,
        _signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        for step in 0.. {
            if step == 5 {
                return Err(WorkloadError::NonFinite { stage: "test step" });
            }
            counters.increment(keys::ITERATIONS_COMPLETED);
        }
        Ok(WorkloadExit::Completed)
    }
}

// --- HELPERS ---

fn sampler(interval_ms: u64) -> OrchestratorConfig {
    OrchestratorConfig {
        sampler: SamplerConfig {
            interval: Duration::from_millis(interval_ms),
            ..SamplerConfig::default()
        },
    }
}

fn orchestrator_with<W, F>(build: F, config: OrchestratorConfig) -> Orchestrator
where
    W: Workload + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    let mut registry = WorkloadRegistry::new();
    registry.register(WorkloadKind::Basic, move || Box::new(build()) as Box<dyn Workload>);
    Orchestrator::new(
        registry,
        || Box::new(SensorlessProbe) as Box<dyn MetricsProbe>,
        config,
    )
}

// --- TESTS ---

#[test]
fn test_timed_run_lasts_at_least_its_duration() {
    let orchestrator = orchestrator_with(|| Counting { steps: 10 }, sampler(500));
    let config = TestRunConfig::timed(WorkloadKind::Basic, Duration::from_secs(2));

    let result = orchestrator.run_test(&config).unwrap();

    assert!(result.actual_duration >= Duration::from_secs(2));
    assert!(
        (3..=5).contains(&result.sample_count),
        "unexpected tick count {}",
        result.sample_count
    );
    assert_eq!(result.outcome, RunOutcome::Completed);
    assert_eq!(result.mode, RunMode::Timed);
}

#[test]
fn test_performance_run_terminates_on_workload_completion() {
    let orchestrator = orchestrator_with(|| Counting { steps: 1000 }, sampler(50));
    let config = TestRunConfig::performance(WorkloadKind::Basic);

    let started = Instant::now();
    let result = orchestrator.run_test(&config).unwrap();

    // Far below the sampler's 60 s ceiling.
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(result.counters.get(keys::ITERATIONS_COMPLETED), 1000);
    assert_eq!(result.outcome, RunOutcome::Completed);
    assert!(result.sample_count >= 1);
}

#[test]
fn test_missing_sensors_yield_absent_temperatures() {
    let orchestrator = orchestrator_with(|| Counting { steps: 100 }, sampler(50));
    let config = TestRunConfig::performance(WorkloadKind::Basic);

    let result = orchestrator.run_test(&config).unwrap();

    assert_eq!(result.cpu_temp_avg, None);
    assert_eq!(result.gpu_temp_avg, None);
    assert_eq!(result.cpu_avg, 75.0);
    assert_eq!(result.mem_peak, 30.0);
}

#[test]
fn test_workload_fault_returns_partial_counters() {
    let orchestrator = orchestrator_with(|| Faulty, sampler(50));
    let config = TestRunConfig::timed(WorkloadKind::Basic, Duration::from_secs(30));

    let started = Instant::now();
    let err = orchestrator.run_test(&config).unwrap_err();

    // The sampler and governor shut down without waiting out the budget.
    assert!(started.elapsed() < Duration::from_secs(5));
    match err {
        RunError::WorkloadFault { source, counters } => {
            assert!(matches!(source, WorkloadError::NonFinite { .. }));
            assert_eq!(counters.get(keys::ITERATIONS_COMPLETED), 5);
        }
        other => panic!("expected a workload fault, got {other}"),
    }
}

#[test]
fn test_external_interrupt_marks_result_interrupted() {
    let orchestrator = orchestrator_with(|| Endless, sampler(50));
    let handle = orchestrator.interrupt_handle();
    let interrupter = thread::spawn(move || {
        // Wait for the run to attach before interrupting it.
        while !handle.is_attached() {
            thread::sleep(Duration::from_millis(10));
        }
        thread::sleep(Duration::from_millis(200));
        handle.interrupt()
    });

    let result = orchestrator
        .run_test(&TestRunConfig::performance(WorkloadKind::Basic))
        .unwrap();

    assert!(interrupter.join().unwrap());
    assert!(result.is_interrupted());
    assert!(result.counters.get(keys::ITERATIONS_COMPLETED) > 0);
}

#[test]
fn test_concurrent_run_on_same_orchestrator_is_rejected() {
    // --- 1. ARRANGE ---
    let orchestrator = orchestrator_with(|| Endless, sampler(50));
    let handle = orchestrator.interrupt_handle();
    let config = TestRunConfig::performance(WorkloadKind::Basic);

    thread::scope(|scope| {
        let first = scope.spawn(|| orchestrator.run_test(&config));
        while !handle.is_attached() {
            thread::sleep(Duration::from_millis(10));
        }

        // --- 2. ACT ---
        let second = orchestrator.run_test(&config);
        let interrupted = handle.interrupt();

        // --- 3. ASSERT ---
        assert!(matches!(second, Err(RunError::Configuration(_))));
        assert!(interrupted);
        let first = first.join().unwrap().unwrap();
        assert!(first.is_interrupted());
    });
    assert!(!handle.is_attached());
}

#[test]
fn test_runs_do_not_share_a_signal() {
    let orchestrator = orchestrator_with(|| Counting { steps: 50 }, sampler(20));
    let config = TestRunConfig::performance(WorkloadKind::Basic);

    let first = orchestrator.run_test(&config).unwrap();
    let second = orchestrator.run_test(&config).unwrap();

    assert_eq!(first.counters.get(keys::ITERATIONS_COMPLETED), 50);
    assert_eq!(second.counters.get(keys::ITERATIONS_COMPLETED), 50);
}

#[test]
fn test_invalid_configuration_is_rejected_before_start() {
    let orchestrator = orchestrator_with(|| Counting { steps: 1 }, sampler(50));

    let unregistered = TestRunConfig::performance(WorkloadKind::PrimeNumbers);
    assert!(matches!(
        orchestrator.run_test(&unregistered),
        Err(RunError::Configuration(_))
    ));

    let zero = TestRunConfig::timed(WorkloadKind::Basic, Duration::ZERO);
    assert!(matches!(
        orchestrator.run_test(&zero),
        Err(RunError::Configuration(_))
    ));

    let too_long = TestRunConfig::timed(WorkloadKind::Basic, Duration::from_secs(61));
    assert!(matches!(
        orchestrator.run_test(&too_long),
        Err(RunError::Configuration(_))
    ));
}

#[test]
fn test_no_samples_is_empty_monitoring_data() {
    let mut registry = WorkloadRegistry::new();
    registry.register(WorkloadKind::Basic, || {
        Box::new(Counting { steps: 20 }) as Box<dyn Workload>
    });
    let orchestrator = Orchestrator::new(
        registry,
        || Box::new(BrokenProbe) as Box<dyn MetricsProbe>,
        sampler(20),
    );

    let err = orchestrator
        .run_test(&TestRunConfig::performance(WorkloadKind::Basic))
        .unwrap_err();

    match err {
        RunError::EmptyMonitoringData { counters, .. } => {
            assert_eq!(counters.get(keys::ITERATIONS_COMPLETED), 20);
        }
        other => panic!("expected empty monitoring data, got {other}"),
    }
}
