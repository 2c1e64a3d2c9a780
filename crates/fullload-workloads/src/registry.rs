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


//! Maps each [`WorkloadKind`] to a factory producing a fresh workload.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use fullload_core::{RunError, RunResult, Workload, WorkloadKind};

use crate::compute::{
    Basic, HashCalculation, MatrixOperations, NeuralSimulation, NonceSearch, PrimeNumbers,
    Transcendental, DEFAULT_DIFFICULTY,
};
use crate::{Composite, ComplexityTable, DiskIo, MemoryChurn};

/// Builds a new workload instance for one run.
pub type WorkloadFactory = Box<dyn Fn() -> Box<dyn Workload> + Send + Sync>;

fn boxed<W, F>(build: F) -> WorkloadFactory
where
    W: Workload + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    Box::new(move || -> Box<dyn Workload> { Box::new(build()) })
}

/// Knobs shared by the built-in workloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadOptions {
    /// Fixes every pseudo-random input when set.
    pub seed: Option<u64>,
    /// Directory for disk scratch files; the system temp dir when `None`.
    pub scratch_dir: Option<PathBuf>,
    /// Leading zero nibbles required by the nonce search.
    pub difficulty: u32,
}

impl Default for WorkloadOptions {
    fn default() -> Self {
        Self {
            seed: None,
            scratch_dir: None,
            difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

/// A registry of workload factories keyed by kind.
#[derive(Default)]
pub struct WorkloadRegistry {
    factories: HashMap<WorkloadKind, WorkloadFactory>,
}

impl WorkloadRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in kind, sized by `table`.
    pub fn with_builtin(table: &ComplexityTable, options: &WorkloadOptions) -> Self {
        let mut registry = Self::new();
        for kind in WorkloadKind::ALL {
            let sizes = table.sizes(kind);
            let options = options.clone();
            let factory = match kind {
                WorkloadKind::Basic => boxed(move || Basic::new(sizes)),
                WorkloadKind::HashCalculation => boxed(move || {
                    let workload = HashCalculation::new(sizes);
                    match options.seed {
                        Some(seed) => workload.with_seed(seed),
                        None => workload,
                    }
                }),
                WorkloadKind::NonceSearch => boxed(move || {
                    let workload = NonceSearch::new(sizes).with_difficulty(options.difficulty);
                    match options.seed {
                        Some(seed) => workload.with_seed(seed),
                        None => workload,
                    }
                }),
                WorkloadKind::MatrixOperations => boxed(move || {
                    let workload = MatrixOperations::new(sizes);
                    match options.seed {
                        Some(seed) => workload.with_seed(seed),
                        None => workload,
                    }
                }),
                WorkloadKind::PrimeNumbers => boxed(move || PrimeNumbers::new(sizes)),
                WorkloadKind::NeuralSimulation => boxed(move || {
                    let workload = NeuralSimulation::new(sizes);
                    match options.seed {
                        Some(seed) => workload.with_seed(seed),
                        None => workload,
                    }
                }),
                WorkloadKind::Transcendental => boxed(move || Transcendental::new(sizes)),
                WorkloadKind::MemoryChurn => boxed(move || MemoryChurn::new(sizes)),
                WorkloadKind::DiskIo => boxed(move || {
                    let workload = DiskIo::new(sizes);
                    match &options.scratch_dir {
                        Some(dir) => workload.with_directory(dir.clone()),
                        None => workload,
                    }
                }),
                WorkloadKind::Composite => boxed(move || {
                    let workload = Composite::new(sizes);
                    match &options.scratch_dir {
                        Some(dir) => workload.with_directory(dir.clone()),
                        None => workload,
                    }
                }),
            };
            registry.factories.insert(kind, factory);
        }
        registry
    }

    /// Registers `factory` for `kind`, replacing any previous one.
    pub fn register<F>(&mut self, kind: WorkloadKind, factory: F)
    where
        F: Fn() -> Box<dyn Workload> + Send + Sync + 'static,
    {
        if self.factories.insert(kind, Box::new(factory)).is_some() {
            log::debug!("Replaced workload factory for '{}'", kind);
        }
    }

    /// Returns `true` if a factory is registered for `kind`.
    pub fn contains(&self, kind: WorkloadKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Returns the registered kinds in declaration order.
    pub fn kinds(&self) -> Vec<WorkloadKind> {
        let mut kinds: Vec<_> = self.factories.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Builds a fresh workload for `kind`.
    pub fn create(&self, kind: WorkloadKind) -> RunResult<Box<dyn Workload>> {
        self.factories
            .get(&kind)
            .map(|factory| factory())
            .ok_or_else(|| RunError::configuration(format!("No workload registered for '{kind}'")))
    }
}

impl fmt::Debug for WorkloadRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkloadRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_covers_every_kind() {
        let registry =
            WorkloadRegistry::with_builtin(&ComplexityTable::default(), &WorkloadOptions::default());
        assert_eq!(registry.kinds(), WorkloadKind::ALL.to_vec());
        for kind in WorkloadKind::ALL {
            assert_eq!(registry.create(kind).unwrap().kind(), kind);
        }
    }

    #[test]
    fn missing_kind_is_a_configuration_error() {
        let registry = WorkloadRegistry::new();
        let err = registry.create(WorkloadKind::Basic).unwrap_err();
        assert!(matches!(err, RunError::Configuration(_)));
    }
}
