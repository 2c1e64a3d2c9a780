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


//! The periodic resource sampling loop.

use fullload_core::{CancellationSignal, MetricsProbe, ResourceSample, SampleBuffer};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::{Duration, Instant};

/// Configuration for the [`ResourceSampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Sleep between two ticks.
    pub interval: Duration,
    /// Absolute ceiling on how long the sampler runs, even if it is never
    /// told to stop.
    pub max_test_duration: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_test_duration: Duration::from_secs(60),
        }
    }
}

/// Captures CPU, memory and temperature readings at a fixed cadence.
#[derive(Debug)]
pub struct ResourceSampler {
    probe: Box<dyn MetricsProbe>,
    config: SamplerConfig,
}

impl ResourceSampler {
    /// Creates a sampler reading from `probe`.
    pub fn new(probe: Box<dyn MetricsProbe>, config: SamplerConfig) -> Self {
        Self { probe, config }
    }

    /// Captures one tick into `buffer`.
    ///
    /// A failed CPU or memory reading skips the tick. Missing temperatures
    /// are recorded as absent.
    fn capture(&mut self, started: Instant, buffer: &mut SampleBuffer) {
        self.probe.refresh();
        let cpu = self.probe.cpu_percent();
        let mem = self.probe.memory_percent();
        let (cpu_percent, mem_percent) = match (cpu, mem) {
            (Ok(cpu), Ok(mem)) => (cpu, mem),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("Sampler tick skipped ({}): {}", self.probe.probe_id(), e);
                buffer.record_missed_tick();
                return;
            }
        };
        let temps = self.probe.temperatures();

        let sample = ResourceSample {
            elapsed: started.elapsed(),
            cpu_percent,
            mem_percent,
            cpu_temp: temps.cpu_celsius(),
            gpu_temp: temps.gpu_celsius(),
        };
        log::debug!(
            "CPU: {:.1}%, Memory: {:.1}%, CPU temp: {:?}, GPU temp: {:?}",
            sample.cpu_percent,
            sample.mem_percent,
            sample.cpu_temp,
            sample.gpu_temp
        );
        buffer.push(sample);
    }

    /// Runs the sampling loop on the calling thread.
    ///
    /// Each iteration captures one tick, sleeps for the interval, then stops
    /// if `stop` returns `true` or the duration ceiling has been exceeded.
    pub fn run(&mut self, mut stop: impl FnMut() -> bool) -> SampleBuffer {
        let started = Instant::now();
        let mut buffer = SampleBuffer::new();

        loop {
            self.capture(started, &mut buffer);
            thread::sleep(self.config.interval);

            if stop() {
                break;
            }
            if started.elapsed() >= self.config.max_test_duration {
                log::warn!(
                    "Sampler reached its {:?} ceiling before being stopped",
                    self.config.max_test_duration
                );
                break;
            }
        }

        log::debug!(
            "Sampler stopped after {} samples ({} missed ticks)",
            buffer.len(),
            buffer.missed_ticks()
        );
        buffer
    }

    /// Runs the sampling loop on a named background thread until `signal` is
    /// raised.
    ///
    /// If the thread cannot be spawned the returned handle yields an empty
    /// buffer.
    pub fn spawn(mut self, signal: CancellationSignal) -> SamplerHandle {
        let spawned = thread::Builder::new()
            .name("fullload-sampler".to_owned())
            .spawn(move || {
                log::info!("Sampler thread started.");
                self.run(|| signal.is_raised())
            });
        match spawned {
            Ok(handle) => SamplerHandle {
                handle: Some(handle),
            },
            Err(e) => {
                log::error!("Failed to spawn sampler thread: {}", e);
                SamplerHandle { handle: None }
            }
        }
    }
}

/// A running background sampler.
#[derive(Debug)]
pub struct SamplerHandle {
    handle: Option<thread::JoinHandle<SampleBuffer>>,
}

impl SamplerHandle {
    /// Blocks until the sampler thread exits and returns its buffer.
    ///
    /// A sampler that panicked or never started yields an empty buffer.
    pub fn join(self) -> SampleBuffer {
        let Some(handle) = self.handle else {
            return SampleBuffer::new();
        };
        match handle.join() {
            Ok(buffer) => buffer,
            Err(_) => {
                log::error!("Sampler thread panicked; its samples are lost.");
                SampleBuffer::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fullload_core::{ProbeError, SensorReadout, StopReason};
    use std::borrow::Cow;

    /// Replays scripted CPU readings; `None` entries fail the tick.
    #[derive(Debug)]
    struct ScriptedProbe {
        cpu: Vec<Option<f64>>,
        tick: usize,
    }

    impl MetricsProbe for ScriptedProbe {
        fn probe_id(&self) -> Cow<'static, str> {
            Cow::Borrowed("scripted")
        }

        fn refresh(&mut self) {
            self.tick += 1;
        }

        fn cpu_percent(&mut self) -> Result<f64, ProbeError> {
            self.cpu
                .get(self.tick - 1)
                .copied()
                .flatten()
                .ok_or_else(|| ProbeError::Backend("scripted failure".into()))
        }

        fn memory_percent(&mut self) -> Result<f64, ProbeError> {
            Ok(40.0)
        }

        fn temperatures(&mut self) -> SensorReadout {
            SensorReadout::Unavailable
        }
    }

    fn config(interval_ms: u64, ceiling_ms: u64) -> SamplerConfig {
        SamplerConfig {
            interval: Duration::from_millis(interval_ms),
            max_test_duration: Duration::from_millis(ceiling_ms),
        }
    }

    #[test]
    fn failed_reads_are_counted_as_missed_ticks() {
        let probe = ScriptedProbe {
            cpu: vec![Some(10.0), None, Some(30.0)],
            tick: 0,
        };
        let mut sampler = ResourceSampler::new(Box::new(probe), config(1, 10_000));
        let mut ticks = 0;
        let buffer = sampler.run(|| {
            ticks += 1;
            ticks == 3
        });

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.missed_ticks(), 1);
        let cpu: Vec<f64> = buffer.iter().map(|s| s.cpu_percent).collect();
        assert_eq!(cpu, vec![10.0, 30.0]);
        assert!(buffer.iter().all(|s| s.cpu_temp.is_none()));
    }

    #[test]
    fn ceiling_bounds_an_unstopped_sampler() {
        let probe = ScriptedProbe {
            cpu: vec![Some(50.0); 1000],
            tick: 0,
        };
        let mut sampler = ResourceSampler::new(Box::new(probe), config(10, 100));
        let started = Instant::now();
        let buffer = sampler.run(|| false);

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(!buffer.is_empty());
    }

    #[test]
    fn spawned_sampler_stops_on_signal() {
        let probe = ScriptedProbe {
            cpu: vec![Some(20.0); 1000],
            tick: 0,
        };
        let signal = CancellationSignal::new();
        let handle = ResourceSampler::new(Box::new(probe), config(10, 10_000)).spawn(signal.clone());

        thread::sleep(Duration::from_millis(100));
        signal.raise(StopReason::ExternalInterrupt);
        let buffer = handle.join();

        assert!(buffer.len() >= 2);
    }
}
