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


//! Write, read back and verify chunks of an anonymous scratch file.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fullload_core::{
    keys, CancellationSignal, ComplexityTier, TierSizes, Workload, WorkloadCounters,
    WorkloadError, WorkloadExit, WorkloadKind, WorkloadResult,
};

use crate::progress::ProgressMeter;

/// Default bytes per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;
/// Chunks in the file before writes wrap back to the start.
const FILE_SPAN_CHUNKS: u64 = 64;
/// Steps between `sync_data` calls.
const SYNC_EVERY: u64 = 16;

/// An unlinked temporary file and the buffers used to exercise it.
///
/// The file is removed by the OS once dropped.
#[derive(Debug)]
pub(crate) struct ScratchFile {
    file: File,
    write_buf: Vec<u8>,
    read_buf: Vec<u8>,
}

impl ScratchFile {
    pub(crate) fn open(dir: Option<&Path>, chunk_size: usize) -> WorkloadResult<Self> {
        let file = match dir {
            Some(dir) => tempfile::tempfile_in(dir),
            None => tempfile::tempfile(),
        }
        .map_err(|e| WorkloadError::io("creating scratch file", e))?;
        let chunk_size = chunk_size.max(1);
        Ok(Self {
            file,
            write_buf: vec![0; chunk_size],
            read_buf: vec![0; chunk_size],
        })
    }

    fn chunk_size(&self) -> u64 {
        self.write_buf.len() as u64
    }

    /// Writes chunk `step`, reads it back and compares.
    pub(crate) fn step(&mut self, step: u64, counters: &mut WorkloadCounters) -> WorkloadResult<()> {
        let offset = (step % FILE_SPAN_CHUNKS) * self.chunk_size();
        let seed = step.to_le_bytes();
        for (i, byte) in self.write_buf.iter_mut().enumerate() {
            *byte = seed[i % seed.len()] ^ (i as u8);
        }

        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|e| WorkloadError::io("seeking for write", e))?;
        self.file
            .write_all(&self.write_buf)
            .map_err(|e| WorkloadError::io("writing chunk", e))?;
        counters.add(keys::BYTES_WRITTEN, self.chunk_size());

        if (step + 1) % SYNC_EVERY == 0 {
            self.file
                .sync_data()
                .map_err(|e| WorkloadError::io("syncing scratch file", e))?;
        }

        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|e| WorkloadError::io("seeking for read", e))?;
        self.file
            .read_exact(&mut self.read_buf)
            .map_err(|e| WorkloadError::io("reading chunk back", e))?;
        counters.add(keys::BYTES_READ, self.chunk_size());

        if self.read_buf != self.write_buf {
            return Err(WorkloadError::Corruption { offset });
        }
        Ok(())
    }
}

/// Sequential disk traffic against a scratch file.
#[derive(Debug, Clone)]
pub struct DiskIo {
    sizes: TierSizes,
    directory: Option<PathBuf>,
    chunk_size: usize,
}

impl DiskIo {
    pub fn new(sizes: TierSizes) -> Self {
        Self {
            sizes,
            directory: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Places the scratch file in `dir` instead of the system temp directory.
    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

impl Workload for DiskIo {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::DiskIo
    }

    fn run(
        &mut self,
        tier: ComplexityTier,
        signal: &CancellationSignal,
        counters: &mut WorkloadCounters,
    ) -> WorkloadResult<WorkloadExit> {
        let chunks = self.sizes.for_tier(tier);
        let mut scratch = ScratchFile::open(self.directory.as_deref(), self.chunk_size)?;
        let mut progress = ProgressMeter::new("Disk", chunks);
        counters.declare(keys::BYTES_WRITTEN);
        counters.declare(keys::BYTES_READ);

        for i in 0..chunks {
            if signal.is_raised() {
                return Ok(WorkloadExit::Cancelled);
            }
            scratch.step(i, counters)?;
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
    fn chunks_round_trip_through_scratch_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut workload = DiskIo::new(TierSizes::uniform(80))
            .with_directory(dir.path())
            .with_chunk_size(4096);
        let mut counters = WorkloadCounters::new();
        let exit = workload
            .run(ComplexityTier::Medium, &CancellationSignal::new(), &mut counters)
            .unwrap();

        assert_eq!(exit, WorkloadExit::Completed);
        assert_eq!(counters.get(keys::BYTES_WRITTEN), 80 * 4096);
        assert_eq!(counters.get(keys::BYTES_READ), 80 * 4096);
    }

    #[test]
    fn missing_directory_is_an_io_fault() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let mut workload = DiskIo::new(TierSizes::uniform(1)).with_directory(missing);
        let err = workload
            .run(
                ComplexityTier::Easy,
                &CancellationSignal::new(),
                &mut WorkloadCounters::new(),
            )
            .unwrap_err();
        assert!(matches!(err, WorkloadError::Io { .. }));
    }
}
