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


//! Operator-initiated abort of the run in flight.

use fullload_core::{CancellationSignal, StopReason};
use std::sync::{Arc, Mutex, PoisonError};

/// Raises the signal of whichever run is currently in flight.
///
/// Cloneable and usable from any thread, including a Ctrl-C handler. With no
/// run in flight, [`interrupt`](Self::interrupt) does nothing.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle {
    current: Arc<Mutex<Option<CancellationSignal>>>,
}

impl InterruptHandle {
    /// Creates a handle with no run attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the in-flight run's signal with [`StopReason::ExternalInterrupt`].
    ///
    /// Returns `true` if this call stopped a run.
    pub fn interrupt(&self) -> bool {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match current.as_ref() {
            Some(signal) => {
                let raised = signal.raise(StopReason::ExternalInterrupt);
                if raised {
                    log::warn!("Test interrupted by user.");
                }
                raised
            }
            None => false,
        }
    }

    /// Returns `true` while a run is attached.
    pub fn is_attached(&self) -> bool {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Attaches `signal` until the returned guard is dropped.
    ///
    /// Returns `None`, leaving the attached run untouched, if another run is
    /// already attached.
    pub(crate) fn attach(&self, signal: CancellationSignal) -> Option<AttachedRun<'_>> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.is_some() {
            return None;
        }
        *current = Some(signal);
        Some(AttachedRun { handle: self })
    }
}

/// Detaches the run from its [`InterruptHandle`] on drop.
#[derive(Debug)]
pub(crate) struct AttachedRun<'a> {
    handle: &'a InterruptHandle,
}

impl Drop for AttachedRun<'_> {
    fn drop(&mut self) {
        *self
            .handle
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_without_run_is_noop() {
        let handle = InterruptHandle::new();
        assert!(!handle.interrupt());
    }

    #[test]
    fn test_interrupt_reaches_attached_run_only_while_attached() {
        let handle = InterruptHandle::new();
        let signal = CancellationSignal::new();
        {
            let _attached = handle.attach(signal.clone()).unwrap();
            assert!(handle.clone().is_attached());
        }
        assert!(!handle.is_attached());
        assert!(!handle.interrupt());
        assert!(!signal.is_raised());

        let _attached = handle.attach(signal.clone()).unwrap();
        assert!(handle.interrupt());
        assert_eq!(signal.reason(), Some(StopReason::ExternalInterrupt));
        // A second interrupt is a no-op on an already stopped run.
        assert!(!handle.interrupt());
    }

    #[test]
    fn test_second_attach_keeps_the_first_run_targeted() {
        let handle = InterruptHandle::new();
        let first = CancellationSignal::new();
        let second = CancellationSignal::new();

        let _attached = handle.attach(first.clone()).unwrap();
        assert!(handle.attach(second.clone()).is_none());

        assert!(handle.interrupt());
        assert!(first.is_raised());
        assert!(!second.is_raised());
    }
}
