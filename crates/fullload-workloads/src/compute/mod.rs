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

//! CPU-bound workloads.

mod basic;
mod hash;
mod matrix;
mod mining;
mod neural;
mod prime;
mod transcendental;

pub use basic::Basic;
pub use hash::HashCalculation;
pub use matrix::{DenseMatrix, MatrixOperations};
pub use mining::{leading_zero_nibbles, NonceSearch, DEFAULT_DIFFICULTY};
pub use neural::NeuralSimulation;
pub use prime::{is_prime, PrimeNumbers};
pub use transcendental::Transcendental;

pub(crate) use transcendental::transcendental_step;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// A deterministic generator when `seed` is set, an entropy-seeded one otherwise.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
