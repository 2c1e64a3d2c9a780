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

//! Run configuration and the immutable result record of a finished run.

use crate::workload::{ComplexityTier, UnknownKey, WorkloadCounters, WorkloadKind};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::Duration;

/// The termination policy of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Stop after a fixed wall-clock budget.
    #[default]
    Timed,
    /// Stop when the workload completes or an operator interrupts.
    Performance,
}

impl Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Timed => f.write_str("timed"),
            RunMode::Performance => f.write_str("performance"),
        }
    }
}

impl FromStr for RunMode {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timed" => Ok(RunMode::Timed),
            "performance" => Ok(RunMode::Performance),
            _ => Err(UnknownKey {
                what: "run mode",
                key: s.to_owned(),
            }),
        }
    }
}

/// The kind of load a run is meant to place on the host.
///
/// This is descriptive: it is carried into the report but does not change
/// which workload runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoadProfile {
    /// Processor only.
    #[default]
    Cpu,
    /// Graphics card only, if available.
    Gpu,
    /// Processor and graphics card.
    Both,
    /// Simulated neural computation.
    Neural,
}

impl LoadProfile {
    /// Every profile, in presentation order.
    pub const ALL: [LoadProfile; 4] = [
        LoadProfile::Cpu,
        LoadProfile::Gpu,
        LoadProfile::Both,
        LoadProfile::Neural,
    ];

    /// Returns the uppercase key of this profile.
    pub fn key(&self) -> &'static str {
        match self {
            LoadProfile::Cpu => "CPU",
            LoadProfile::Gpu => "GPU",
            LoadProfile::Both => "BOTH",
            LoadProfile::Neural => "NEURAL",
        }
    }

    /// Returns a one-line, human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            LoadProfile::Cpu => "Processor only",
            LoadProfile::Gpu => "Graphics card only (if available)",
            LoadProfile::Both => "Processor and graphics card",
            LoadProfile::Neural => "Neural computation (simulated)",
        }
    }
}

impl Display for LoadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LoadProfile {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_uppercase();
        LoadProfile::ALL
            .into_iter()
            .find(|profile| profile.key() == needle)
            .ok_or_else(|| UnknownKey {
                what: "load type",
                key: s.to_owned(),
            })
    }
}

/// Everything needed to start one run. Immutable for the lifetime of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRunConfig {
    /// Which workload to run.
    pub workload: WorkloadKind,
    /// Which problem size tier to use.
    pub complexity: ComplexityTier,
    /// The wall-clock budget; only meaningful in [`RunMode::Timed`].
    pub duration: Duration,
    /// The termination policy.
    pub mode: RunMode,
    /// The descriptive load profile.
    pub load_profile: LoadProfile,
}

impl TestRunConfig {
    /// A timed run of `workload` for `duration`.
    pub fn timed(workload: WorkloadKind, duration: Duration) -> Self {
        Self {
            workload,
            complexity: ComplexityTier::default(),
            duration,
            mode: RunMode::Timed,
            load_profile: LoadProfile::default(),
        }
    }

    /// A run-to-completion performance run of `workload`.
    pub fn performance(workload: WorkloadKind) -> Self {
        Self {
            workload,
            complexity: ComplexityTier::default(),
            duration: Duration::ZERO,
            mode: RunMode::Performance,
            load_profile: LoadProfile::default(),
        }
    }

    /// Sets the complexity tier.
    pub fn with_complexity(mut self, complexity: ComplexityTier) -> Self {
        self.complexity = complexity;
        self
    }

    /// Sets the descriptive load profile.
    pub fn with_load_profile(mut self, load_profile: LoadProfile) -> Self {
        self.load_profile = load_profile;
        self
    }
}

/// Whether a run stopped on its own terms or was aborted by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    /// The run stopped through its termination policy.
    Completed,
    /// An external interrupt stopped the run; data is partial.
    Interrupted,
}

/// The summary record of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRunResult {
    /// The workload that ran.
    pub workload: WorkloadKind,
    /// The termination policy used.
    pub mode: RunMode,
    /// The complexity tier used.
    pub complexity: ComplexityTier,
    /// The descriptive load profile.
    pub load_profile: LoadProfile,
    /// Wall-clock time from sampler start to sampler join.
    #[serde(rename = "actual_duration_secs", serialize_with = "serialize_secs")]
    pub actual_duration: Duration,
    /// Mean CPU utilization, in percent.
    pub cpu_avg: f64,
    /// Peak CPU utilization, in percent.
    pub cpu_peak: f64,
    /// Mean memory utilization, in percent.
    pub mem_avg: f64,
    /// Peak memory utilization, in percent.
    pub mem_peak: f64,
    /// Mean CPU temperature, absent if no sensor ever reported.
    pub cpu_temp_avg: Option<f64>,
    /// Mean GPU temperature, absent if no sensor ever reported.
    pub gpu_temp_avg: Option<f64>,
    /// Number of sampling ticks aggregated.
    pub sample_count: usize,
    /// Counters reported by the workload.
    pub counters: WorkloadCounters,
    /// How the run ended.
    pub outcome: RunOutcome,
}

impl TestRunResult {
    /// Returns `true` if an operator interrupted the run.
    pub fn is_interrupted(&self) -> bool {
        self.outcome == RunOutcome::Interrupted
    }
}

fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}
