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

//! Dense matrix rounds: multiply, invert, estimate the dominant eigenvalue.

use fullload_core::{
    keys, CancellationSignal, ComplexityTier, TierSizes, Workload, WorkloadCounters,
    WorkloadError, WorkloadExit, WorkloadKind, WorkloadResult,
};
use rand::Rng;

use super::seeded_rng;

/// Rounds per run. One round is the signal-check granularity together with
/// its three phases.
const DEFAULT_ROUNDS: u64 = 10;
/// Pivot magnitude under which a matrix is treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;
const POWER_ITERATIONS: usize = 32;

/// A square, row-major `f64` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// An `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self { n, data }
    }

    /// An `n × n` matrix with entries uniformly drawn from `[0, 1)`.
    pub fn random(n: usize, rng: &mut impl Rng) -> Self {
        let data = (0..n * n).map(|_| rng.gen::<f64>()).collect();
        Self { n, data }
    }

    /// Builds a matrix from row-major values. Returns `None` unless
    /// `values.len() == n * n`.
    pub fn from_rows(n: usize, values: Vec<f64>) -> Option<Self> {
        (values.len() == n * n).then_some(Self { n, data: values })
    }

    /// The side length.
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    /// Returns `true` if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Matrix product `self · rhs`.
    pub fn multiply(&self, rhs: &DenseMatrix) -> DenseMatrix {
        debug_assert_eq!(self.n, rhs.n);
        let n = self.n;
        let mut out = vec![0.0; n * n];
        // i-k-j order keeps the inner loop on contiguous rows of both sides.
        for i in 0..n {
            let out_row = &mut out[i * n..(i + 1) * n];
            for k in 0..n {
                let a = self.data[i * n + k];
                let rhs_row = &rhs.data[k * n..(k + 1) * n];
                for (o, b) in out_row.iter_mut().zip(rhs_row) {
                    *o += a * b;
                }
            }
        }
        DenseMatrix { n, data: out }
    }

    /// Gauss-Jordan inverse with partial pivoting; `None` if singular.
    pub fn inverse(&self) -> Option<DenseMatrix> {
        let n = self.n;
        let mut work = self.data.clone();
        let mut inv = DenseMatrix::identity(n).data;

        for col in 0..n {
            let pivot_row = (col..n).max_by(|&a, &b| {
                work[a * n + col]
                    .abs()
                    .partial_cmp(&work[b * n + col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;
            let pivot = work[pivot_row * n + col];
            if !(pivot.abs() > SINGULAR_EPSILON) {
                return None;
            }
            if pivot_row != col {
                for j in 0..n {
                    work.swap(col * n + j, pivot_row * n + j);
                    inv.swap(col * n + j, pivot_row * n + j);
                }
            }

            let scale = 1.0 / pivot;
            for j in 0..n {
                work[col * n + j] *= scale;
                inv[col * n + j] *= scale;
            }

            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = work[row * n + col];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..n {
                    work[row * n + j] -= factor * work[col * n + j];
                    inv[row * n + j] -= factor * inv[col * n + j];
                }
            }
        }
        Some(DenseMatrix { n, data: inv })
    }

    /// Estimates the dominant eigenvalue by power iteration, returning the
    /// Rayleigh quotient of the final vector.
    pub fn dominant_eigenvalue(&self, iterations: usize) -> f64 {
        let n = self.n;
        if n == 0 {
            return 0.0;
        }
        let mut v = vec![1.0 / (n as f64).sqrt(); n];
        let mut w = vec![0.0; n];
        let mut lambda = 0.0;

        for _ in 0..iterations {
            for (i, wi) in w.iter_mut().enumerate() {
                let row = &self.data[i * n..(i + 1) * n];
                *wi = row.iter().zip(&v).map(|(a, b)| a * b).sum();
            }
            lambda = v.iter().zip(&w).map(|(a, b)| a * b).sum();
            let norm = w.iter().map(|x| x * x).sum::<f64>().sqrt();
            if !(norm > 0.0) {
                return lambda;
            }
            for (vi, wi) in v.iter_mut().zip(&w) {
                *vi = wi / norm;
            }
        }
        lambda
    }
}

/// Repeated dense linear algebra on random `n × n` matrices.
#[derive(Debug, Clone)]
pub struct MatrixOperations {
    sizes: TierSizes,
    rounds: u64,
    seed: Option<u64>,
}

impl MatrixOperations {
    pub fn new(sizes: TierSizes) -> Self {
        Self {
            sizes,
            rounds: DEFAULT_ROUNDS,
            seed: None,
        }
    }

    pub fn with_rounds(mut self, rounds: u64) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Workload for MatrixOperations {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::MatrixOperations
    }

    fn run(
        &mut self,
        tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        let n = self.sizes.for_tier(tier) as usize;
        let mut rng = seeded_rng(self.seed);
        counters.declare(keys::MATRICES_MULTIPLIED);
        counters.declare(keys::MATRICES_INVERTED);
        counters.declare(keys::EIGENVALUE_PASSES);

        for round in 0..self.rounds {
            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            let a = DenseMatrix::random(n, &mut rng);
            let b = DenseMatrix::random(n, &mut rng);

            let product = a.multiply(&b);
            if !product.is_finite() {
                return Err(WorkloadError::NonFinite {
                    stage: "matrix multiply",
                });
            }
            counters.increment(keys::MATRICES_MULTIPLIED);

            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            let inverse = match a.inverse() {
                Some(inverse) => {
                    counters.increment(keys::MATRICES_INVERTED);
                    inverse
                }
                None => {
                    counters.increment(keys::SINGULAR_MATRICES);
                    DenseMatrix::identity(n)
                }
            };
            if !inverse.is_finite() {
                return Err(WorkloadError::NonFinite {
                    stage: "matrix inverse",
                });
            }

            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            let eigenvalue = a.dominant_eigenvalue(POWER_ITERATIONS);
            if !eigenvalue.is_finite() {
                return Err(WorkloadError::NonFinite {
                    stage: "eigenvalue estimate",
                });
            }
            counters.increment(keys::EIGENVALUE_PASSES);
            counters.increment(keys::ITERATIONS_COMPLETED);

            log::debug!(
                "Matrices: {}/{}, size {}x{}, dominant eigenvalue {:.3}",
                round + 1,
                self.rounds,
                n,
                n,
                eigenvalue
            );
        }
        Ok(WorkloadExit::Completed)
    }
}
