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


//! Orchestration of a load test run.
//!
//! The [`Orchestrator`] runs the workload on the calling thread while a
//! background sampler records resource usage; in timed mode a
//! [`DurationGovernor`] raises the run's cancellation signal at the deadline.

pub mod governor;
pub mod interrupt;
pub mod orchestrator;
pub mod phase;

pub use governor::DurationGovernor;
pub use interrupt::InterruptHandle;
pub use orchestrator::{Orchestrator, OrchestratorConfig, ProbeFactory};
pub use phase::RunPhase;
