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


//! Reduction of a sample buffer into summary statistics.

use std::time::Duration;

use fullload_core::{
    RunError, RunOutcome, RunResult, SampleBuffer, TestRunConfig, TestRunResult, WorkloadCounters,
};

/// Mean and peak statistics over one [`SampleBuffer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSummary {
    /// Mean CPU utilization, in percent.
    pub cpu_avg: f64,
    /// Peak CPU utilization, in percent.
    pub cpu_peak: f64,
    /// Mean memory utilization, in percent.
    pub mem_avg: f64,
    /// Peak memory utilization, in percent.
    pub mem_peak: f64,
    /// Mean of the reported CPU temperatures.
    pub cpu_temp_avg: Option<f64>,
    /// Mean of the reported GPU temperatures.
    pub gpu_temp_avg: Option<f64>,
    /// Number of samples reduced.
    pub sample_count: usize,
}

impl SampleSummary {
    /// Summarizes `buffer`, or returns `None` if it holds no samples.
    pub fn from_buffer(buffer: &SampleBuffer) -> Option<Self> {
        if buffer.is_empty() {
            return None;
        }
        let n = buffer.len() as f64;
        let mut summary = Self {
            cpu_avg: 0.0,
            cpu_peak: f64::MIN,
            mem_avg: 0.0,
            mem_peak: f64::MIN,
            cpu_temp_avg: None,
            gpu_temp_avg: None,
            sample_count: buffer.len(),
        };
        let mut cpu_temps = MeanOf::default();
        let mut gpu_temps = MeanOf::default();

        for sample in buffer {
            summary.cpu_avg += sample.cpu_percent;
            summary.mem_avg += sample.mem_percent;
            summary.cpu_peak = summary.cpu_peak.max(sample.cpu_percent);
            summary.mem_peak = summary.mem_peak.max(sample.mem_percent);
            cpu_temps.add(sample.cpu_temp);
            gpu_temps.add(sample.gpu_temp);
        }
        summary.cpu_avg /= n;
        summary.mem_avg /= n;
        summary.cpu_temp_avg = cpu_temps.mean();
        summary.gpu_temp_avg = gpu_temps.mean();
        Some(summary)
    }
}

/// Running mean over the present values of an optional series.
#[derive(Debug, Default)]
struct MeanOf {
    sum: f64,
    count: u32,
}

impl MeanOf {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Merges `buffer` statistics and the workload's `counters` into the result
/// of a run.
///
/// An empty buffer is reported as [`RunError::EmptyMonitoringData`] rather
/// than as a result with zeroed statistics.
pub fn aggregate(
    config: &TestRunConfig,
    buffer: &SampleBuffer,
    counters: WorkloadCounters,
    actual_duration: Duration,
    outcome: RunOutcome,
) -> RunResult<TestRunResult> {
    let Some(summary) = SampleSummary::from_buffer(buffer) else {
        return Err(RunError::EmptyMonitoringData {
            actual_duration,
            counters,
        });
    };
    Ok(TestRunResult {
        workload: config.workload,
        mode: config.mode,
        complexity: config.complexity,
        load_profile: config.load_profile,
        actual_duration,
        cpu_avg: summary.cpu_avg,
        cpu_peak: summary.cpu_peak,
        mem_avg: summary.mem_avg,
        mem_peak: summary.mem_peak,
        cpu_temp_avg: summary.cpu_temp_avg,
        gpu_temp_avg: summary.gpu_temp_avg,
        sample_count: summary.sample_count,
        counters,
        outcome,
    })
}
