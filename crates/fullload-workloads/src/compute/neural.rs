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


//! A toy fully connected network driven with random inputs.

use fullload_core::{
    keys, CancellationSignal, ComplexityTier, TierSizes, Workload, WorkloadCounters,
    WorkloadError, WorkloadExit, WorkloadKind, WorkloadResult,
};
use rand::rngs::StdRng;
use rand::Rng;

use super::seeded_rng;
use crate::progress::ProgressMeter;

const INPUT: usize = 100;
const HIDDEN: usize = 50;
const OUTPUT: usize = 10;
const WEIGHT_SCALE: f64 = 0.01;
const LEARNING_RATE: f64 = 0.001;

/// Row-major `rows × cols` weights with small random values.
fn random_weights(rows: usize, cols: usize, rng: &mut StdRng) -> Vec<f64> {
    (0..rows * cols)
        .map(|_| rng.gen_range(-1.0..1.0f64) * WEIGHT_SCALE)
        .collect()
}

/// `out[j] = tanh(sum_i input[i] * weights[i][j])`.
fn forward_layer(input: &[f64], weights: &[f64], out: &mut [f64]) {
    let cols = out.len();
    out.iter_mut().for_each(|o| *o = 0.0);
    for (i, x) in input.iter().enumerate() {
        let row = &weights[i * cols..(i + 1) * cols];
        for (o, w) in out.iter_mut().zip(row) {
            *o += x * w;
        }
    }
    out.iter_mut().for_each(|o| *o = o.tanh());
}

/// 100 → 50 → 10 tanh network with a simplified back-propagation step that
/// only updates the output weights.
#[derive(Debug, Clone)]
pub struct NeuralSimulation {
    sizes: TierSizes,
    seed: Option<u64>,
}

impl NeuralSimulation {
    pub fn new(sizes: TierSizes) -> Self {
        Self { sizes, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Workload for NeuralSimulation {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::NeuralSimulation
    }

    fn run(
        &mut self,
        tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        let iterations = self.sizes.for_tier(tier);
        let mut rng = seeded_rng(self.seed);
        let mut progress = ProgressMeter::new("Neural network", iterations);

        let w1 = random_weights(INPUT, HIDDEN, &mut rng);
        let mut w2 = random_weights(HIDDEN, OUTPUT, &mut rng);
        let mut inputs = [0.0; INPUT];
        let mut hidden = [0.0; HIDDEN];
        let mut outputs = [0.0; OUTPUT];
        let mut output_error = [0.0; OUTPUT];
        let mut hidden_error = [0.0; HIDDEN];
        counters.declare(keys::FORWARD_PASSES);
        counters.declare(keys::BACKWARD_PASSES);

        for i in 0..iterations {
            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            inputs.iter_mut().for_each(|x| *x = rng.gen_range(-1.0..1.0f64));

            forward_layer(&inputs, &w1, &mut hidden);
            forward_layer(&hidden, &w2, &mut outputs);
            counters.increment(keys::FORWARD_PASSES);

            for (e, o) in output_error.iter_mut().zip(&outputs) {
                *e = *o - rng.gen_range(-1.0..1.0f64);
            }
            for (h, he) in hidden_error.iter_mut().enumerate() {
                let row = &w2[h * OUTPUT..(h + 1) * OUTPUT];
                *he = row.iter().zip(&output_error).map(|(w, e)| w * e).sum();
            }
            for (h, activation) in hidden.iter().enumerate() {
                let row = &mut w2[h * OUTPUT..(h + 1) * OUTPUT];
                for (w, e) in row.iter_mut().zip(&output_error) {
                    *w -= LEARNING_RATE * e * activation;
                }
            }
            counters.increment(keys::BACKWARD_PASSES);

            if !hidden_error.iter().chain(&outputs).all(|v| v.is_finite()) {
                return Err(WorkloadError::NonFinite {
                    stage: "back-propagation",
                });
            }
            counters.increment(keys::ITERATIONS_COMPLETED);
            progress.tick(i);
        }
        Ok(WorkloadExit::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_layer_applies_tanh() {
        let input = [1.0, 2.0];
        let weights = [0.5, 0.0, 0.25, 1.0];
        let mut out = [0.0; 2];
        forward_layer(&input, &weights, &mut out);
        assert!((out[0] - 1.0f64.tanh()).abs() < 1e-12);
        assert!((out[1] - 2.0f64.tanh()).abs() < 1e-12);
    }

    #[test]
    fn one_forward_and_backward_pass_per_step() {
        let mut workload = NeuralSimulation::new(TierSizes::uniform(50)).with_seed(5);
        let mut counters = WorkloadCounters::new();
        let exit = workload
            .run(ComplexityTier::Easy, &CancellationSignal::new(), &mut counters)
            .unwrap();
        assert_eq!(exit, WorkloadExit::Completed);
        assert_eq!(counters.get(keys::FORWARD_PASSES), 50);
        assert_eq!(counters.get(keys::BACKWARD_PASSES), 50);
    }
}
