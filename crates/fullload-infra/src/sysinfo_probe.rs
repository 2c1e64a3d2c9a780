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

//! sysinfo-based implementation of the MetricsProbe trait.

use std::borrow::Cow;

use fullload_core::telemetry::{MetricsProbe, ProbeError, SensorReadout};
use sysinfo::{Components, System};

/// Which sensor family a hardware component belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SensorClass {
    Cpu,
    Gpu,
}

/// Classifies a component by its label. GPU markers are checked first since
/// some GPU drivers label their die sensor "core".
fn classify(label: &str) -> Option<SensorClass> {
    const GPU_MARKERS: [&str; 5] = ["gpu", "amdgpu", "nvidia", "radeon", "nouveau"];
    const CPU_MARKERS: [&str; 6] = ["coretemp", "cpu", "core", "k10temp", "package", "tctl"];

    let label = label.to_lowercase();
    if GPU_MARKERS.iter().any(|m| label.contains(m)) {
        Some(SensorClass::Gpu)
    } else if CPU_MARKERS.iter().any(|m| label.contains(m)) {
        Some(SensorClass::Cpu)
    } else {
        None
    }
}

/// Averages the readings of each sensor class.
///
/// Components that report no temperature, or a non-positive one (how some
/// drivers signal "unknown"), are skipped.
fn summarize<'a>(readings: impl IntoIterator<Item = (&'a str, Option<f32>)>) -> SensorReadout {
    let (mut cpu_sum, mut cpu_n) = (0.0_f64, 0_u32);
    let (mut gpu_sum, mut gpu_n) = (0.0_f64, 0_u32);

    for (label, temperature) in readings {
        let Some(temp) = temperature.filter(|t| t.is_finite() && *t > 0.0) else {
            continue;
        };
        match classify(label) {
            Some(SensorClass::Cpu) => {
                cpu_sum += f64::from(temp);
                cpu_n += 1;
            }
            Some(SensorClass::Gpu) => {
                gpu_sum += f64::from(temp);
                gpu_n += 1;
            }
            None => {}
        }
    }

    let mean = |sum: f64, n: u32| (n > 0).then(|| sum / f64::from(n));
    SensorReadout::from_parts(mean(cpu_sum, cpu_n), mean(gpu_sum, gpu_n))
}

/// A metrics probe that uses the `sysinfo` crate.
#[derive(Debug)]
pub struct SysinfoProbe {
    system: System,
    sensors_seen: bool,
}

impl SysinfoProbe {
    /// Creates a new probe and primes the CPU usage baseline.
    ///
    /// sysinfo computes CPU usage as a delta between two refreshes, so the
    /// first reading after construction is only meaningful once at least
    /// `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL` has passed.
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        system.refresh_memory();
        Self {
            system,
            sensors_seen: false,
        }
    }
}

impl MetricsProbe for SysinfoProbe {
    fn probe_id(&self) -> Cow<'static, str> {
        Cow::Borrowed("sysinfo")
    }

    fn refresh(&mut self) {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();
    }

    fn cpu_percent(&mut self) -> Result<f64, ProbeError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProbeError::Unsupported("cpu_percent"));
        }
        Ok(f64::from(self.system.global_cpu_usage()).clamp(0.0, 100.0))
    }

    fn memory_percent(&mut self) -> Result<f64, ProbeError> {
        let total = self.system.total_memory();
        if total == 0 {
            return Err(ProbeError::Backend("total memory reported as zero".into()));
        }
        let used = self.system.used_memory();
        Ok((used as f64 / total as f64 * 100.0).clamp(0.0, 100.0))
    }

    fn temperatures(&mut self) -> SensorReadout {
        let components = Components::new_with_refreshed_list();
        let readout = summarize(
            components
                .iter()
                .map(|component| (component.label(), component.temperature())),
        );

        if !readout.is_unavailable() && !self.sensors_seen {
            log::debug!("Temperature sensors detected: {readout:?}");
            self.sensors_seen = true;
        }
        readout
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_labels() {
        assert_eq!(classify("coretemp Package id 0"), Some(SensorClass::Cpu));
        assert_eq!(classify("cpu_thermal temp1"), Some(SensorClass::Cpu));
        assert_eq!(classify("k10temp Tctl"), Some(SensorClass::Cpu));
        assert_eq!(classify("amdgpu edge"), Some(SensorClass::Gpu));
        assert_eq!(classify("NVIDIA GeForce RTX"), Some(SensorClass::Gpu));
        assert_eq!(classify("nvme Composite"), None);
    }

    #[test]
    fn summarize_averages_per_class() {
        let readout = summarize([
            ("coretemp Core 0", Some(50.0)),
            ("coretemp Core 1", Some(60.0)),
            ("amdgpu edge", Some(70.0)),
            ("acpitz temp1", Some(99.0)),
        ]);
        assert_eq!(readout.cpu_celsius(), Some(55.0));
        assert_eq!(readout.gpu_celsius(), Some(70.0));
    }

    #[test]
    fn summarize_without_sensors_is_unavailable() {
        let readout = summarize(std::iter::empty());
        assert!(readout.is_unavailable());
    }

    #[test]
    fn summarize_skips_missing_and_bogus_values() {
        let readout = summarize([
            ("coretemp Core 0", None),
            ("coretemp Core 1", Some(0.0)),
            ("coretemp Core 2", Some(f32::NAN)),
            ("amdgpu edge", Some(65.0)),
        ]);
        assert_eq!(readout.cpu_celsius(), None);
        assert_eq!(readout.gpu_celsius(), Some(65.0));
    }

    #[test]
    fn live_probe_reports_percentages_in_range() {
        let mut probe = SysinfoProbe::new();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        probe.refresh();

        if let Ok(cpu) = probe.cpu_percent() {
            assert!((0.0..=100.0).contains(&cpu));
        }
        if let Ok(mem) = probe.memory_percent() {
            assert!((0.0..=100.0).contains(&mem));
        }
        // Must never panic, with or without sensors.
        let _ = probe.temperatures();
    }
}
