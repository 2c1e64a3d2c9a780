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


//! Deadline enforcement for timed runs.

use crossbeam_channel::{RecvTimeoutError, Sender};
use fullload_core::{CancellationSignal, StopReason};
use std::thread;
use std::time::{Duration, Instant};

/// How often a waiting governor looks at the signal, so it can exit early
/// once someone else has raised it.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Raises a run's [`CancellationSignal`] once its duration budget elapses.
///
/// The governor lives on its own thread. It exits at the deadline, as soon as
/// the signal is raised by anyone else, or when dismissed.
#[derive(Debug)]
pub struct DurationGovernor {
    dismiss_tx: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl DurationGovernor {
    /// Starts a governor that raises `signal` with
    /// [`StopReason::DeadlineReached`] after `duration`.
    pub fn timed(duration: Duration, signal: CancellationSignal) -> std::io::Result<Self> {
        let deadline = Instant::now() + duration;
        let (dismiss_tx, dismiss_rx) = crossbeam_channel::bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("fullload-governor".to_owned())
            .spawn(move || {
                log::debug!("Duration governor armed for {:?}", duration);
                loop {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        if signal.raise(StopReason::DeadlineReached) {
                            log::info!("Test duration of {:?} reached.", duration);
                        }
                        break;
                    }
                    match dismiss_rx.recv_timeout(remaining.min(POLL_INTERVAL)) {
                        Err(RecvTimeoutError::Timeout) => {
                            if signal.is_raised() {
                                log::debug!("Duration governor: signal raised before deadline");
                                break;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                            log::debug!("Duration governor dismissed");
                            break;
                        }
                    }
                }
            })?;

        Ok(Self {
            dismiss_tx: Some(dismiss_tx),
            handle: Some(handle),
        })
    }

    /// Blocks until the governor has exited, which is at the deadline unless
    /// the signal was raised earlier.
    pub fn wait(mut self) {
        self.join();
    }

    /// Stops the governor without raising the signal and waits for it.
    pub fn dismiss(mut self) {
        if let Some(tx) = self.dismiss_tx.take() {
            let _ = tx.try_send(());
        }
        self.join();
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Duration governor thread panicked");
            }
        }
    }
}

impl Drop for DurationGovernor {
    fn drop(&mut self) {
        // Dropping the sender disconnects the channel and releases the thread.
        self.dismiss_tx.take();
        self.join();
    }
}
