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

//! The metrics-capture capability consumed by the resource sampler.

use std::borrow::Cow;
use std::fmt::{self, Debug, Display};

/// A source of host resource readings.
///
/// A `MetricsProbe` is a stateful object, typically living in the
/// `fullload-infra` crate, that knows how to query the operating system. The
/// sampler owns one probe for the lifetime of a run and calls [`refresh`]
/// once per tick before reading values from it.
///
/// [`refresh`]: MetricsProbe::refresh
pub trait MetricsProbe: Send + Debug + 'static {
    /// Returns a human-readable identifier for this probe.
    fn probe_id(&self) -> Cow<'static, str>;

    /// Polls the underlying host so the following reads reflect the current
    /// tick. The default implementation does nothing, for probes that read
    /// live values directly.
    fn refresh(&mut self) {}

    /// Returns the current overall CPU utilization, in percent (0.0 to 100.0).
    fn cpu_percent(&mut self) -> Result<f64, ProbeError>;

    /// Returns the current system memory utilization, in percent (0.0 to 100.0).
    fn memory_percent(&mut self) -> Result<f64, ProbeError>;

    /// Returns the current temperature readings.
    ///
    /// Missing sensors are not an error: hosts without sensor support return
    /// [`SensorReadout::Unavailable`].
    fn temperatures(&mut self) -> SensorReadout;
}

/// The outcome of a temperature capture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SensorReadout {
    /// The host exposes no usable temperature sensors.
    #[default]
    Unavailable,
    /// At least one sensor class reported; the other may still be absent.
    Readings {
        /// Mean CPU temperature across CPU sensors, in degrees Celsius.
        cpu_celsius: Option<f64>,
        /// Mean GPU temperature across GPU sensors, in degrees Celsius.
        gpu_celsius: Option<f64>,
    },
}

impl SensorReadout {
    /// Builds a readout from per-class readings, collapsing to
    /// [`SensorReadout::Unavailable`] when neither class reported.
    pub fn from_parts(cpu_celsius: Option<f64>, gpu_celsius: Option<f64>) -> Self {
        if cpu_celsius.is_none() && gpu_celsius.is_none() {
            SensorReadout::Unavailable
        } else {
            SensorReadout::Readings {
                cpu_celsius,
                gpu_celsius,
            }
        }
    }

    /// Returns the CPU temperature, if reported.
    pub fn cpu_celsius(&self) -> Option<f64> {
        match self {
            SensorReadout::Readings { cpu_celsius, .. } => *cpu_celsius,
            SensorReadout::Unavailable => None,
        }
    }

    /// Returns the GPU temperature, if reported.
    pub fn gpu_celsius(&self) -> Option<f64> {
        match self {
            SensorReadout::Readings { gpu_celsius, .. } => *gpu_celsius,
            SensorReadout::Unavailable => None,
        }
    }

    /// Returns `true` if no sensor reported anything.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SensorReadout::Unavailable)
    }
}

/// An error raised while capturing CPU or memory utilization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The host does not support this metric.
    Unsupported(&'static str),
    /// The backend failed to produce a reading.
    Backend(String),
}

impl Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Unsupported(metric) => write!(f, "Metric not supported on this host: {metric}"),
            ProbeError::Backend(msg) => write!(f, "Probe backend error: {msg}"),
        }
    }
}

impl std::error::Error for ProbeError {}
