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

//! Per-tick resource samples and the append-only buffer that holds them.

use std::time::Duration;

/// A single sampling tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSample {
    /// Time since the sampler started when this tick was captured.
    pub elapsed: Duration,
    /// Overall CPU utilization, in percent.
    pub cpu_percent: f64,
    /// System memory utilization, in percent.
    pub mem_percent: f64,
    /// CPU temperature in degrees Celsius, if a sensor reported.
    pub cpu_temp: Option<f64>,
    /// GPU temperature in degrees Celsius, if a sensor reported.
    pub gpu_temp: Option<f64>,
}

/// An ordered, append-only sequence of [`ResourceSample`]s.
///
/// There is no way to remove or rewrite a sample once pushed.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    samples: Vec<ResourceSample>,
    missed_ticks: u64,
}

impl SampleBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one sample.
    pub fn push(&mut self, sample: ResourceSample) {
        self.samples.push(sample);
    }

    /// Records a tick on which CPU or memory capture failed.
    pub fn record_missed_tick(&mut self) {
        self.missed_ticks += 1;
    }

    /// Returns the number of recorded samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no sample was ever recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the number of ticks that produced no sample.
    pub fn missed_ticks(&self) -> u64 {
        self.missed_ticks
    }

    /// Iterates over samples in capture order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResourceSample> {
        self.samples.iter()
    }
}

impl<'a> IntoIterator for &'a SampleBuffer {
    type Item = &'a ResourceSample;
    type IntoIter = std::slice::Iter<'a, ResourceSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ResourceSample> for SampleBuffer {
    fn from_iter<I: IntoIterator<Item = ResourceSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
            missed_ticks: 0,
        }
    }
}
