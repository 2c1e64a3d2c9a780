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

//! Contracts and data structures for resource monitoring during a run.
//!
//! This module defines the abstract "what" of monitoring: the [`MetricsProbe`]
//! capability a host backend must provide, and the [`SampleBuffer`] a sampler
//! fills with one [`ResourceSample`] per tick. `fullload-infra` provides the
//! concrete probes and `fullload-telemetry` drives them.

pub mod probe;
pub mod sample;

pub use self::probe::{MetricsProbe, ProbeError, SensorReadout};
pub use self::sample::{ResourceSample, SampleBuffer};
