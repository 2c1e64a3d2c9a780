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

/// Emits a `debug` progress line every tenth of a planned step count.
#[derive(Debug)]
pub(crate) struct ProgressMeter {
    label: &'static str,
    total: u64,
    stride: u64,
    next: u64,
}

impl ProgressMeter {
    pub(crate) fn new(label: &'static str, total: u64) -> Self {
        let stride = (total / 10).max(1);
        Self {
            label,
            total,
            stride,
            next: 0,
        }
    }

    /// Reports `done` completed steps. Returns `true` when a line was logged,
    /// so callers can attach extra detail.
    #[inline]
    pub(crate) fn tick(&mut self, done: u64) -> bool {
        if done < self.next {
            return false;
        }
        log::debug!("{}: {}/{}", self.label, done, self.total);
        self.next = done + self.stride;
        true
    }
}
