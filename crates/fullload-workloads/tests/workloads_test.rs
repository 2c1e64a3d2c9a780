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


use std::thread;
use std::time::{Duration, Instant};

use fullload_core::{
    keys, CancellationSignal, ComplexityTier, StopReason, TierSizes, Workload, WorkloadCounters,
    WorkloadExit, WorkloadKind,
};
use fullload_workloads::{
    ComplexityTable, MatrixOperations, NonceSearch, Transcendental, WorkloadOptions,
    WorkloadRegistry,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

#[test]
fn test_nonce_search_matches_reference_count() {
    // --- 1. ARRANGE ---
    const SEED: u64 = 42;
    const NONCES: u64 = 5_000;
    let header: u64 = StdRng::seed_from_u64(SEED).gen();
    let expected = (0..NONCES)
        .filter(|nonce| {
            let digest = Sha256::digest(format!("block_data_{header:016x}_{nonce}").as_bytes());
            hex::encode(digest).starts_with("00")
        })
        .count() as u64;

    let mut workload = NonceSearch::new(TierSizes::uniform(NONCES)).with_seed(SEED);
    let mut counters = WorkloadCounters::new();

    // --- 2. ACT ---
    let exit = workload
        .run(ComplexityTier::Medium, &CancellationSignal::new(), &mut counters)
        .unwrap();

    // --- 3. ASSERT ---
    assert_eq!(exit, WorkloadExit::Completed);
    assert_eq!(counters.get(keys::HASHES_CALCULATED), NONCES);
    assert_eq!(counters.get(keys::BLOCKS_FOUND), expected);
}

#[test]
fn test_pre_raised_signal_stops_every_kind_before_first_step() {
    // --- 1. ARRANGE ---
    let dir = tempfile::tempdir().unwrap();
    let signal = CancellationSignal::new();
    signal.raise(StopReason::ExternalInterrupt);
    let options = WorkloadOptions {
        scratch_dir: Some(dir.path().to_path_buf()),
        ..WorkloadOptions::default()
    };
    let registry = WorkloadRegistry::with_builtin(&ComplexityTable::default(), &options);

    for kind in WorkloadKind::ALL {
        let mut workload = registry.create(kind).unwrap();
        let mut counters = WorkloadCounters::new();

        // --- 2. ACT ---
        let exit = workload
            .run(ComplexityTier::Hard, &signal, &mut counters)
            .unwrap();

        // --- 3. ASSERT ---
        assert_eq!(exit, WorkloadExit::Cancelled, "{kind} ignored the signal");
        assert_eq!(
            counters.get(keys::ITERATIONS_COMPLETED),
            0,
            "{kind} ran a step"
        );
    }
}

#[test]
fn test_matrix_rounds_stop_when_signal_is_raised_mid_run() {
    // --- 1. ARRANGE ---
    // Each round is a few dense 300x300 phases; the run would never end.
    let signal = CancellationSignal::new();
    let worker_signal = signal.clone();
    let worker = thread::spawn(move || {
        let mut workload = MatrixOperations::new(TierSizes::uniform(300))
            .with_rounds(u64::MAX)
            .with_seed(9);
        let mut counters = WorkloadCounters::new();
        let exit = workload.run(ComplexityTier::Medium, &worker_signal, &mut counters);
        (exit, counters)
    });

    // --- 2. ACT ---
    thread::sleep(Duration::from_millis(50));
    let raised_at = Instant::now();
    signal.raise(StopReason::ExternalInterrupt);
    let (exit, counters) = worker.join().unwrap();

    // --- 3. ASSERT ---
    assert_eq!(exit.unwrap(), WorkloadExit::Cancelled);
    assert!(raised_at.elapsed() < Duration::from_secs(5));
    assert!(counters.get(keys::ITERATIONS_COMPLETED) < u64::MAX);
}

#[test]
fn test_raising_signal_cancels_a_running_workload_promptly() {
    // --- 1. ARRANGE ---
    // Far more work than the test will ever wait for.
    let signal = CancellationSignal::new();
    let worker_signal = signal.clone();
    let worker = thread::spawn(move || {
        let mut workload = Transcendental::new(TierSizes::uniform(u64::MAX));
        let mut counters = WorkloadCounters::new();
        let exit = workload.run(ComplexityTier::Hard, &worker_signal, &mut counters);
        (exit, counters)
    });

    // --- 2. ACT ---
    thread::sleep(Duration::from_millis(100));
    let raised_at = Instant::now();
    signal.raise(StopReason::DeadlineReached);
    let (exit, counters) = worker.join().unwrap();

    // --- 3. ASSERT ---
    assert!(raised_at.elapsed() < Duration::from_secs(2));
    assert_eq!(exit.unwrap(), WorkloadExit::Cancelled);
    assert!(counters.get(keys::ITERATIONS_COMPLETED) > 0);
}

#[test]
fn test_disk_workload_honours_scratch_dir_option() {
    let dir = tempfile::tempdir().unwrap();
    let mut table = ComplexityTable::default();
    table.set(WorkloadKind::DiskIo, TierSizes::uniform(4));
    let options = WorkloadOptions {
        scratch_dir: Some(dir.path().to_path_buf()),
        ..WorkloadOptions::default()
    };

    let registry = WorkloadRegistry::with_builtin(&table, &options);
    let mut workload = registry.create(WorkloadKind::DiskIo).unwrap();
    let mut counters = WorkloadCounters::new();
    let exit = workload
        .run(ComplexityTier::Easy, &CancellationSignal::new(), &mut counters)
        .unwrap();

    assert_eq!(exit, WorkloadExit::Completed);
    assert_eq!(counters.get(keys::BYTES_READ), 4 * 1024 * 1024);
    // The scratch file is unlinked, so nothing is left behind.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
